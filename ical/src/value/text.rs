// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Escaping for the TEXT value type as defined in RFC 5545 Section 3.3.11.
//!
//! ```txt
//! text       = *(TSAFE-CHAR / ":" / DQUOTE / ESCAPED-CHAR)
//! ; Folded according to description above
//!
//! ESCAPED-CHAR = ("\\" / "\;" / "\," / "\N" / "\n")
//! ; \\ encodes \, \N or \n encodes newline
//! ; \; encodes ;, \, encodes ,
//! ```

/// Escape a text value for writing.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str(r"\\"),
            ';' => out.push_str(r"\;"),
            ',' => out.push_str(r"\,"),
            '\n' => out.push_str(r"\n"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}

/// Resolve the escapes of a text value.
///
/// Unknown escapes are kept as they are.
#[must_use]
pub fn unescape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(c @ ('\\' | ';' | ',')) => out.push(c),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Split a comma separated list of text values and resolve their escapes.
///
/// Escaped commas do not separate entries.
#[must_use]
pub fn split_text_list(text: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    for c in text.chars() {
        match c {
            ',' if !escaped => {
                items.push(unescape_text(&current));
                current.clear();
                continue;
            }
            '\\' if !escaped => escaped = true,
            _ => escaped = false,
        }
        current.push(c);
    }
    items.push(unescape_text(&current));
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_text() {
        #[rustfmt::skip]
        let cases = [
            ("plain",                  "plain"),
            ("a;b,c",                  r"a\;b\,c"),
            ("back\\slash",            r"back\\slash"),
            ("line\nbreak",            r"line\nbreak"),
            ("crlf\r\nbreak",          r"crlf\nbreak"),
        ];
        for (src, expected) in cases {
            assert_eq!(escape_text(src), expected, "{src:?}");
        }
    }

    #[test]
    fn unescapes_text() {
        #[rustfmt::skip]
        let cases = [
            // example from RFC 5545 Section 3.3.11
            (r"Project XYZ Final Review\nConference Room - 3B\nCome Prepared.",
             "Project XYZ Final Review\nConference Room - 3B\nCome Prepared."),
            // extra tests
            (r"upper\Ncase",           "upper\ncase"),
            (r"keep\x",                r"keep\x"),
            ("trailing\\",             "trailing\\"),
            (r"a\\\;b",                r"a\;b"),
        ];
        for (src, expected) in cases {
            assert_eq!(unescape_text(src), expected, "{src}");
        }
    }

    #[test]
    fn splits_text_list() {
        assert_eq!(split_text_list("APPOINTMENT,EDUCATION"), ["APPOINTMENT", "EDUCATION"]);
        assert_eq!(split_text_list(r"a\,b,c"), ["a,b", "c"]);
        assert_eq!(split_text_list(r"a\\,b"), [r"a\", "b"]);
        assert_eq!(split_text_list(""), [""]);
    }
}
