// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Lexer for iCalendar content lines as defined in RFC 5545 Section 3.1.
//!
//! Folded line breaks (a line break followed by a space or a tab) are skipped,
//! so the spans of consecutive tokens of a folded line are not adjacent while
//! their texts concatenate to the unfolded line.

use std::fmt::{self, Display};

use logos::Logos;

use crate::syntax::Span;

/// Tokenize iCalendar source into tokens with their byte spans.
///
/// Characters the lexer does not know come out as [`Token::Error`].
pub fn tokenize(src: &str) -> impl Iterator<Item = SpannedToken<'_>> {
    Token::lexer(src).spanned().map(|(tok, span)| match tok {
        Ok(tok) => SpannedToken(tok, span),
        Err(()) => SpannedToken(Token::Error, span),
    })
}

/// Token emitted by the iCalendar lexer
#[derive(PartialEq, Eq, Clone, Copy, Logos)]
#[logos(skip r"\r?\n[ \t]")] // skip folding
pub enum Token<'a> {
    /// Double Quote ("), decimal codepoint 22
    #[token(r#"""#)]
    DQuote,

    /// Comma (,), decimal codepoint 44
    #[token(",")]
    Comma,

    /// Colon (:), decimal codepoint 58
    #[token(":")]
    Colon,

    /// Semicolon (;), decimal codepoint 59
    #[token(";")]
    Semicolon,

    /// Equal sign (=), decimal codepoint 61
    #[token("=")]
    Equal,

    /// Printable ASCII characters that are not word characters or separators
    #[regex(r#"[\t !#$%&'()*+./<>?@\[\\\]\^`\{|\}~]+"#)]
    Symbol(&'a str),

    /// Line break, CRLF or a bare LF from lenient producers
    #[regex(r"\r?\n")]
    Newline,

    /// ASCII word characters: 0-9, A-Z, a-z, underscore and hyphen
    #[regex("[0-9A-Za-z_-]+")]
    Word(&'a str),

    /// NON-US-ASCII  = UTF8-2 / UTF8-3 / UTF8-4
    ///    ; UTF8-2, UTF8-3, and UTF8-4 are defined in [RFC3629]
    #[regex(r"[^\x00-\x7F]+")]
    UnicodeText(&'a str),

    /// A control character
    Error,
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DQuote => write!(f, "DQuote"),
            Self::Comma => write!(f, "Comma"),
            Self::Colon => write!(f, "Colon"),
            Self::Semicolon => write!(f, "Semicolon"),
            Self::Equal => write!(f, "Equal"),
            Self::Symbol(s) => write!(f, "Symbol({s})"),
            Self::Newline => write!(f, "Newline"),
            Self::Word(s) => write!(f, "Word({s})"),
            Self::UnicodeText(s) => write!(f, "UnicodeText({s})"),
            Self::Error => write!(f, "Error"),
        }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// A token with its byte span in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken<'src>(pub Token<'src>, pub Span);

#[cfg(test)]
mod tests {
    use super::Token::*;
    use super::*;

    fn tokens(src: &str) -> Vec<Token<'_>> {
        tokenize(src).map(|SpannedToken(tok, _)| tok).collect()
    }

    #[test]
    fn tokenizes_special_ascii_chars() {
        let expected = [
            Semicolon,
            Colon,
            Equal,
            Comma,
            DQuote,
            Symbol(r"\"),
            Word("_"),
        ];
        assert_eq!(tokens(r#";:=,"\_"#), expected);
    }

    #[test]
    fn skips_line_folding() {
        let src = "WORD1\r\n WORD2\r\n\tWORD3\n WORD4\r\nWORD5\nWORD6";
        let expected = [
            Word("WORD1"),
            Word("WORD2"),
            Word("WORD3"),
            Word("WORD4"),
            Newline,
            Word("WORD5"),
            Newline,
            Word("WORD6"),
        ];
        assert_eq!(tokens(src), expected);
    }

    #[test]
    fn tokenizes_escape_sequences() {
        let expected = [
            Symbol(r"\\\"),
            Semicolon,
            Symbol(r"\"),
            Comma,
            Symbol(r"\"),
            Word("N"),
        ];
        assert_eq!(tokens(r"\\\;\,\N"), expected);
    }

    #[test]
    fn tokenizes_words_and_unicode() {
        let expected = [
            Word("ABC_foo-123"),
            Symbol(" "),
            UnicodeText("日本語"),
            Word("Hello"),
        ];
        assert_eq!(tokens("ABC_foo-123 日本語Hello"), expected);
    }

    #[test]
    fn tokenizes_control_chars_as_error() {
        assert_eq!(tokens("\x00"), [Error]);
        assert_eq!(tokens("WORD\x01WORD2"), [Word("WORD"), Error, Word("WORD2")]);
        assert_eq!(tokens("WORD1\rWORD2"), [Word("WORD1"), Error, Word("WORD2")]);
        assert_eq!(tokens("\x7F"), [Error]);
    }

    #[test]
    fn reports_byte_spans() {
        let spans: Vec<_> = tokenize("BEGIN:VCALENDAR\r\n")
            .map(|SpannedToken(_, span)| span)
            .collect();
        assert_eq!(spans, [0..5, 5..6, 6..15, 15..17]);
    }
}
