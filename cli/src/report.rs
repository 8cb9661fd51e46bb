// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Source reports of parse errors.

use std::io;

use ariadne::{Color, Label, Report, ReportKind, Source};
use recal_ical::{Component, ParseError, Span};

/// Write a report of `error` against `src`.
pub fn write_parse_error(
    error: &ParseError,
    kind: ReportKind<'_>,
    src: &str,
    w: &mut impl io::Write,
) -> io::Result<()> {
    let Some(span) = error.span() else {
        return writeln!(w, "{error}");
    };
    build(error, kind, span).write(Source::from(src), w)
}

fn build<'a>(error: &ParseError, kind: ReportKind<'a>, span: Span) -> Report<'a, Span> {
    Report::build(kind, span.clone())
        .with_config(ariadne::Config::new().with_index_type(ariadne::IndexType::Byte))
        .with_message(error.to_string())
        .with_label(
            Label::new(span)
                .with_message(label_of(error))
                .with_color(Color::Red),
        )
        .finish()
}

fn label_of(error: &ParseError) -> &'static str {
    match error {
        ParseError::MissingColon { .. } => "expected `:` here",
        ParseError::EmptyName { .. } => "property name missing",
        ParseError::InvalidParameter { .. }
        | ParseError::InvalidParameterValue { .. }
        | ParseError::DuplicateParameter { .. } => "in this parameter",
        ParseError::MalformedLine { .. } => "in this line",
        ParseError::UnmatchedEnd { .. } => "nothing to close",
        ParseError::UnmatchedBegin { .. } => "never closed",
        ParseError::MismatchedNesting { .. } => "closes another component",
        ParseError::BeginEndWithParameters { .. } => "parameters not allowed",
        ParseError::TrailingData { .. } => "after the root component",
        ParseError::UnexpectedComponent { .. } => "root component",
        ParseError::Empty => "",
    }
}

/// Line errors retained on a component and its children, in document order.
pub fn retained_errors(component: &Component) -> Vec<&ParseError> {
    let mut errors: Vec<&ParseError> = component.parse_errors().iter().collect();
    for child in component.children() {
        errors.extend(retained_errors(child));
    }
    errors.sort_by_key(|e| e.span().map_or(0, |s| s.start));
    errors
}
