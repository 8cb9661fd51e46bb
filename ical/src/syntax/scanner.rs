// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Scanner turning the token stream into content lines.
//!
//! Per RFC 5545, a content line has the format:
//! ```text
//! contentline = name *(";" param) ":" value CRLF
//! ```
//!
//! The scanner never fails as a whole. A malformed line is returned with its
//! error and scanning resumes on the next line.

use std::iter::Peekable;

use crate::syntax::lexer::{SpannedToken, Token};
use crate::syntax::{ParameterErrorKind, ParseError, Span};

/// A scanned, unfolded content line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Property name as written (e.g., "DTSTART", "SUMMARY")
    pub name: String,

    /// Property parameters in source order
    pub parameters: Vec<ScannedParameter>,

    /// Property value text, escapes still in place
    pub value: String,

    /// Span of the line, without its line break
    pub span: Span,

    /// Error information if scanning this line failed
    pub error: Option<ParseError>,
}

impl ContentLine {
    /// Check if this content line is valid (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// A scanned parameter, `name=value` or `name=value1,value2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedParameter {
    /// Parameter name (e.g., "TZID", "VALUE")
    pub name: String,

    /// Parameter values (comma-separated)
    pub values: Vec<ScannedParameterValue>,

    /// Span of the entire parameter
    pub span: Span,
}

/// A single scanned parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedParameterValue {
    /// The parameter value, without quotes
    pub value: String,

    /// Whether the value was quoted in the source
    pub quoted: bool,

    /// Span of this value, quotes included
    pub span: Span,
}

/// Scan a token stream into content lines.
///
/// Blank lines are skipped. Lines with errors are kept, carrying their
/// error, so the caller decides how to recover.
pub fn scan_content_lines<'src>(
    tokens: impl IntoIterator<Item = SpannedToken<'src>>,
) -> Vec<ContentLine> {
    let mut cursor = Cursor {
        tokens: tokens.into_iter().peekable(),
        end: 0,
    };

    let mut lines = Vec::new();
    while let Some(token) = cursor.peek() {
        if *token == Token::Newline {
            cursor.bump();
            continue;
        }
        lines.push(scan_one_content_line(&mut cursor));
    }
    lines
}

struct Cursor<'src, I: Iterator<Item = SpannedToken<'src>>> {
    tokens: Peekable<I>,
    /// End of the last consumed token
    end: usize,
}

impl<'src, I: Iterator<Item = SpannedToken<'src>>> Cursor<'src, I> {
    fn peek(&mut self) -> Option<&Token<'src>> {
        self.tokens.peek().map(|SpannedToken(token, _)| token)
    }

    fn peek_start(&mut self) -> usize {
        let end = self.end;
        self.tokens.peek().map_or(end, |SpannedToken(_, span)| span.start)
    }

    fn bump(&mut self) -> Option<Token<'src>> {
        let SpannedToken(token, span) = self.tokens.next()?;
        self.end = span.end;
        Some(token)
    }

    /// Consume the rest of the line, returning the end of its content.
    fn skip_line(&mut self) -> usize {
        loop {
            match self.peek() {
                None => return self.end,
                Some(Token::Newline) => {
                    let end = self.end;
                    self.bump();
                    return end;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }
}

fn scan_one_content_line<'src, I>(cursor: &mut Cursor<'src, I>) -> ContentLine
where
    I: Iterator<Item = SpannedToken<'src>>,
{
    let start = cursor.peek_start();
    let mut line = ContentLine {
        name: parse_property_name(cursor),
        parameters: Vec::new(),
        value: String::new(),
        span: start..start,
        error: None,
    };

    if line.name.is_empty() {
        let end = cursor.skip_line();
        line.span = start..end;
        line.error = Some(ParseError::EmptyName { span: start..end });
        return line;
    }

    while cursor.peek() == Some(&Token::Semicolon) {
        cursor.bump();
        let param_start = cursor.peek_start();
        match parse_parameter(cursor) {
            Ok(param) => line.parameters.push(param),
            Err(kind) => {
                let span = param_start..cursor.end.max(param_start);
                line.span = start..cursor.skip_line();
                line.error = Some(ParseError::InvalidParameter { kind, span });
                return line;
            }
        }
    }

    if cursor.peek() == Some(&Token::Colon) {
        cursor.bump();
    } else {
        let at = cursor.peek_start();
        let end = cursor.skip_line();
        line.span = start..end;
        line.error = Some(ParseError::MissingColon {
            span: at..end.max(at),
        });
        return line;
    }

    let (value, error) = parse_value(cursor);
    line.value = value;
    line.error = error;
    line.span = start..cursor.end;
    cursor.bump(); // newline
    line
}

/// Consecutive word tokens, property names can be hyphenated like "PERCENT-COMPLETE".
fn parse_property_name<'src, I>(cursor: &mut Cursor<'src, I>) -> String
where
    I: Iterator<Item = SpannedToken<'src>>,
{
    let mut name = String::new();
    while let Some(&Token::Word(word)) = cursor.peek() {
        name.push_str(word);
        cursor.bump();
    }
    name
}

fn parse_parameter<'src, I>(cursor: &mut Cursor<'src, I>) -> Result<ScannedParameter, ParameterErrorKind>
where
    I: Iterator<Item = SpannedToken<'src>>,
{
    let start = cursor.peek_start();
    let name = parse_property_name(cursor);
    if name.is_empty() {
        return Err(ParameterErrorKind::EmptyName);
    }

    if cursor.peek() != Some(&Token::Equal) {
        return Err(ParameterErrorKind::MissingEquals);
    }
    cursor.bump();

    let mut values = Vec::new();
    loop {
        values.push(parse_parameter_value(cursor)?);
        if cursor.peek() == Some(&Token::Comma) {
            cursor.bump();
        } else {
            break;
        }
    }

    Ok(ScannedParameter {
        name,
        values,
        span: start..cursor.end,
    })
}

fn parse_parameter_value<'src, I>(
    cursor: &mut Cursor<'src, I>,
) -> Result<ScannedParameterValue, ParameterErrorKind>
where
    I: Iterator<Item = SpannedToken<'src>>,
{
    let start = cursor.peek_start();
    let mut value = String::new();

    if cursor.peek() == Some(&Token::DQuote) {
        cursor.bump();
        loop {
            match cursor.peek() {
                Some(Token::DQuote) => {
                    cursor.bump();
                    return Ok(ScannedParameterValue {
                        value,
                        quoted: true,
                        span: start..cursor.end,
                    });
                }
                None | Some(Token::Newline) => return Err(ParameterErrorKind::UnterminatedQuote),
                Some(&token) => {
                    value.push_str(token_to_text(token));
                    cursor.bump();
                }
            }
        }
    }

    while let Some(&token) = cursor.peek() {
        match token {
            Token::Semicolon | Token::Colon | Token::Comma | Token::Newline | Token::DQuote => {
                break;
            }
            _ => {
                value.push_str(token_to_text(token));
                cursor.bump();
            }
        }
    }

    if value.is_empty() {
        return Err(ParameterErrorKind::MissingValue);
    }

    Ok(ScannedParameterValue {
        value,
        quoted: false,
        span: start..cursor.end,
    })
}

/// Everything until the line break.
fn parse_value<'src, I>(cursor: &mut Cursor<'src, I>) -> (String, Option<ParseError>)
where
    I: Iterator<Item = SpannedToken<'src>>,
{
    let mut value = String::new();
    let mut error = None;
    while let Some(&token) = cursor.peek() {
        match token {
            Token::Newline => break,
            Token::Error => {
                let start = cursor.peek_start();
                cursor.bump();
                error.get_or_insert(ParseError::MalformedLine {
                    message: "control character in value".to_owned(),
                    span: start..cursor.end,
                });
            }
            _ => {
                value.push_str(token_to_text(token));
                cursor.bump();
            }
        }
    }
    (value, error)
}

fn token_to_text(token: Token<'_>) -> &str {
    match token {
        Token::Word(s) | Token::Symbol(s) | Token::UnicodeText(s) => s,
        Token::Comma => ",",
        Token::Colon => ":",
        Token::Semicolon => ";",
        Token::Equal => "=",
        Token::DQuote => "\"",
        Token::Newline | Token::Error => "",
    }
}
