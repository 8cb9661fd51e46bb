// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! iCalendar (RFC 5545) formatter module.
//!
//! Writes components as CRLF terminated content lines, folding long lines
//! with CRLF followed by a single whitespace character.
//!
//! # Example
//!
//! ```
//! use recal_ical::{format, parse};
//!
//! let text = "BEGIN:VEVENT\r\nUID:1\r\nSUMMARY:Hello\r\nEND:VEVENT\r\n";
//! let component = parse(text).unwrap();
//! assert_eq!(format(&component).unwrap(), text);
//! ```

use std::io::{self, Write};

use crate::calendar::Calendar;
use crate::component::Component;
use crate::keyword::{KW_BEGIN, KW_END};
use crate::property::Property;

/// Format a component with the default options.
///
/// # Errors
///
/// Returns an error if writing to the internal buffer fails.
pub fn format(component: &Component) -> io::Result<String> {
    FormatOptions::default().write_to_string(component)
}

/// Format a calendar with the default options.
///
/// # Errors
///
/// Returns an error if writing to the internal buffer fails.
pub fn format_calendar(calendar: &Calendar) -> io::Result<String> {
    format(calendar.root())
}

/// Formatting options for the iCalendar formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Maximum line length in octets before folding.
    /// - `None`: no line folding
    /// - `Some(n)`: fold lines longer than n octets
    ///
    /// Default: `Some(75)` for RFC 5545 compliance.
    pub folding: Option<usize>,

    /// Line folding style.
    ///
    /// Default: `FoldingStyle::Space` (CRLF + SPACE).
    pub folding_style: FoldingStyle,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            folding: Some(75),
            folding_style: FoldingStyle::default(),
        }
    }
}

impl FormatOptions {
    /// Set the line folding option.
    #[must_use]
    pub const fn folding(mut self, folding: Option<usize>) -> Self {
        self.folding = folding;
        self
    }

    /// Set the line folding style.
    #[must_use]
    pub const fn folding_style(mut self, style: FoldingStyle) -> Self {
        self.folding_style = style;
        self
    }

    /// Write a component to any `Write` implementer.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write(&self, component: &Component, w: &mut impl Write) -> io::Result<()> {
        Formatter::new(w, *self).write_component(component)
    }

    /// Write a component to a `String`.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_to_string(&self, component: &Component) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.write(component, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// Line folding style for RFC 5545 formatting.
///
/// RFC 5545 specifies that folded lines should start with CRLF followed by
/// a whitespace character (SPACE or TAB).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FoldingStyle {
    /// CRLF + SPACE (RFC 5545 default)
    #[default]
    Space,
    /// CRLF + TAB
    Tab,
}

impl FoldingStyle {
    const fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Space => b"\r\n ",
            Self::Tab => b"\r\n\t",
        }
    }
}

/// Both SPACE and TAB are one octet.
const CONTINUATION_LEN: usize = 1;

/// iCalendar formatter that writes to any `Write` implementer.
#[derive(Debug)]
pub struct Formatter<W: Write> {
    writer: W,
    options: FormatOptions,
}

impl<W: Write> Formatter<W> {
    /// Create a new formatter with options.
    #[must_use]
    pub const fn new(writer: W, options: FormatOptions) -> Self {
        Self { writer, options }
    }

    /// Get a reference to the underlying writer.
    #[must_use]
    pub const fn writer(&self) -> &W {
        &self.writer
    }

    /// Consumes this formatter, returning the underlying writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Write a component with its properties and children.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_component(&mut self, component: &Component) -> io::Result<()> {
        self.write_line(&format!("{KW_BEGIN}:{}", component.kind()))?;
        for property in component.properties() {
            self.write_property(property)?;
        }
        for child in component.children() {
            self.write_component(child)?;
        }
        self.write_line(&format!("{KW_END}:{}", component.kind()))
    }

    /// Write one property as a content line.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_property(&mut self, property: &Property) -> io::Result<()> {
        self.write_line(&property.to_string())
    }

    /// Write a logical line, folding it and terminating it with CRLF.
    ///
    /// Folds never split a UTF-8 sequence or an escape sequence.
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut line_length = 0;
        for unit in fold_units(line) {
            if let Some(max_len) = self.options.folding
                && line_length + unit.len() > max_len
                && line_length > CONTINUATION_LEN
            {
                self.writer
                    .write_all(self.options.folding_style.as_bytes())?;
                line_length = CONTINUATION_LEN;
            }
            self.writer.write_all(unit.as_bytes())?;
            line_length += unit.len();
        }
        self.writer.write_all(b"\r\n")
    }
}

/// Split a line into pieces a fold may go between: single characters, or a
/// backslash together with the character it escapes.
fn fold_units(line: &str) -> impl Iterator<Item = &str> {
    let mut chars = line.char_indices().peekable();
    std::iter::from_fn(move || {
        let (start, c) = chars.next()?;
        let mut end = start + c.len_utf8();
        if c == '\\'
            && let Some((i, escaped)) = chars.next()
        {
            end = i + escaped.len_utf8();
        }
        line.get(start..end)
    })
}
