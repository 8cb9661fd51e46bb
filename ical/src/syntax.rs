// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Content line syntax of RFC 5545 Section 3.1, without any typing.
//!
//! ```text
//! Source Text → Lexer → Token Stream → Scanner → Content Lines
//! ```

pub mod lexer;
pub mod scanner;

use std::ops::Range;

/// Byte range into the source text.
pub type Span = Range<usize>;

/// Errors found while reading the content line structure of a calendar.
///
/// Errors about a single line are recovered from and retained on the
/// enclosing component, errors about the component nesting abort parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Content line without the `:` separating name and value.
    #[error("missing colon in content line")]
    MissingColon {
        /// Where the colon was expected
        span: Span,
    },

    /// Content line that does not start with a name.
    #[error("content line without a name")]
    EmptyName {
        /// Span of the line
        span: Span,
    },

    /// Malformed parameter.
    #[error("{kind}")]
    InvalidParameter {
        /// What is wrong with the parameter
        kind: ParameterErrorKind,
        /// Span of the parameter
        span: Span,
    },

    /// A known parameter with a value it does not accept, kept verbatim.
    #[error("{reason}")]
    InvalidParameterValue {
        /// Description of the problem
        reason: String,
        /// Span of the parameter
        span: Span,
    },

    /// The same parameter given twice on one content line.
    #[error("duplicate parameter {name}")]
    DuplicateParameter {
        /// Parameter name
        name: String,
        /// Span of the line
        span: Span,
    },

    /// Control characters or other unreadable content.
    #[error("malformed content line: {message}")]
    MalformedLine {
        /// Description of the issue
        message: String,
        /// Span of the offending content
        span: Span,
    },

    /// `END` without a matching `BEGIN`.
    #[error("unmatched END:{name}")]
    UnmatchedEnd {
        /// Component name
        name: String,
        /// Span of the END line
        span: Span,
    },

    /// `BEGIN` that is never closed.
    #[error("unmatched BEGIN:{name}")]
    UnmatchedBegin {
        /// Component name
        name: String,
        /// Span of the BEGIN line
        span: Span,
    },

    /// `END` closing another component than the innermost open one.
    #[error("expected END:{expected}, found END:{found}")]
    MismatchedNesting {
        /// Name of the innermost open component
        expected: String,
        /// Name on the END line
        found: String,
        /// Span of the END line
        span: Span,
    },

    /// `BEGIN` or `END` carrying parameters.
    #[error("BEGIN and END must not have parameters")]
    BeginEndWithParameters {
        /// Span of the line
        span: Span,
    },

    /// Content outside of the root component.
    #[error("unexpected content outside of the root component")]
    TrailingData {
        /// Span of the content
        span: Span,
    },

    /// No component at all.
    #[error("no component found")]
    Empty,

    /// Root component of another kind than expected.
    #[error("expected {expected}, found {found}")]
    UnexpectedComponent {
        /// Expected component name
        expected: String,
        /// Found component name
        found: String,
        /// Span of the BEGIN line
        span: Span,
    },
}

impl ParseError {
    /// Byte range of the source the error is about, if any.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::MissingColon { span }
            | Self::EmptyName { span }
            | Self::InvalidParameter { span, .. }
            | Self::InvalidParameterValue { span, .. }
            | Self::DuplicateParameter { span, .. }
            | Self::MalformedLine { span, .. }
            | Self::UnmatchedEnd { span, .. }
            | Self::UnmatchedBegin { span, .. }
            | Self::MismatchedNesting { span, .. }
            | Self::BeginEndWithParameters { span }
            | Self::TrailingData { span }
            | Self::UnexpectedComponent { span, .. } => Some(span.clone()),
            Self::Empty => None,
        }
    }
}

/// Specific parameter parsing errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParameterErrorKind {
    /// Missing equals sign, `TZID America/New_York`
    #[error("missing equals in parameter")]
    MissingEquals,

    /// Missing parameter value, `TZID=`
    #[error("missing parameter value")]
    MissingValue,

    /// Empty parameter name, `;=value`
    #[error("empty parameter name")]
    EmptyName,

    /// Unterminated quoted string, `PARAM="unclosed value`
    #[error("unterminated quoted string")]
    UnterminatedQuote,
}
