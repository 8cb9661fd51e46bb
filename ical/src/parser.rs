// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parse calendar text into a component tree.
//!
//! ```text
//! Source Text → Lexer → Scanner → Content Lines → Component Tree
//! ```
//!
//! The tree is built with a stack: `BEGIN:X` pushes a component, property
//! lines go to the component on top and `END:X` pops it into its parent.
//! Problems of single lines are retained on the enclosing component and
//! parsing goes on. Problems of the nesting abort parsing.

use crate::calendar::Calendar;
use crate::component::{Component, ComponentKind};
use crate::keyword::{KW_BEGIN, KW_END, KW_VCALENDAR};
use crate::property::Property;
use crate::syntax::lexer::tokenize;
use crate::syntax::scanner::{ContentLine, scan_content_lines};
use crate::syntax::{ParseError, Span};

/// Parse an iCalendar component from source text.
///
/// The text holds exactly one root component, a `VCALENDAR` or any other.
///
/// ## Errors
///
/// Returns the first structural problem: unbalanced or mismatched
/// `BEGIN`/`END`, content outside of the root, or no component at all.
///
/// ## Examples
///
/// Parsing valid iCalendar source will return the root component
///
/// ```
/// # use recal_ical::parse;
/// let ical_src = "\
/// BEGIN:VCALENDAR\r\n\
/// BEGIN:VEVENT\r\n\
/// SUMMARY:Test Event\r\n\
/// END:VEVENT\r\n\
/// END:VCALENDAR\r\n\
/// ";
/// assert!(parse(ical_src).is_ok());
/// ```
///
/// Parsing invalid iCalendar source will return an error with a span
///
/// ```
/// # use recal_ical::{ParseError, parse};
/// let invalid_ical_src = "\
/// BEGIN:VCALENDAR\r\n\
/// BEGIN:VEVENT\r\n\
/// END:VCALENDAR\r\n\
/// END:VEVENT\r\n\
/// ";
/// let err = parse(invalid_ical_src).unwrap_err();
/// assert!(matches!(err, ParseError::MismatchedNesting { .. }));
/// assert!(err.span().is_some());
/// ```
pub fn parse(src: &str) -> Result<Component, ParseError> {
    let lines = scan_content_lines(tokenize(src));
    tracing::trace!(lines = lines.len(), "scanned content lines");

    let mut stack: Vec<OpenComponent> = Vec::new();
    let mut root: Option<Component> = None;

    for line in lines {
        if line.error.is_none() && line.name.eq_ignore_ascii_case(KW_BEGIN) {
            if !line.parameters.is_empty() {
                return Err(ParseError::BeginEndWithParameters { span: line.span });
            }
            if stack.is_empty() && root.is_some() {
                return Err(ParseError::TrailingData { span: line.span });
            }
            stack.push(OpenComponent {
                component: Component::new(ComponentKind::parse(&line.value)),
                name: line.value,
                span: line.span,
            });
        } else if line.error.is_none() && line.name.eq_ignore_ascii_case(KW_END) {
            if !line.parameters.is_empty() {
                return Err(ParseError::BeginEndWithParameters { span: line.span });
            }
            let Some(open) = stack.pop() else {
                return Err(ParseError::UnmatchedEnd {
                    name: line.value,
                    span: line.span,
                });
            };
            if !open.name.eq_ignore_ascii_case(&line.value) {
                return Err(ParseError::MismatchedNesting {
                    expected: open.name,
                    found: line.value,
                    span: line.span,
                });
            }
            match stack.last_mut() {
                Some(parent) => parent.component.add_child(open.component),
                None => root = Some(open.component),
            }
        } else {
            let Some(open) = stack.last_mut() else {
                return Err(ParseError::TrailingData { span: line.span });
            };
            add_line(&mut open.component, line);
        }
    }

    if let Some(open) = stack.pop() {
        return Err(ParseError::UnmatchedBegin {
            name: open.name,
            span: open.span,
        });
    }
    root.ok_or(ParseError::Empty)
}

/// Parse a `VCALENDAR` and index its components.
///
/// ## Errors
///
/// Everything [`parse`] fails on, and a root of another kind.
pub fn parse_calendar(src: &str) -> Result<Calendar, ParseError> {
    let root = parse(src)?;
    if *root.kind() != ComponentKind::Calendar {
        return Err(ParseError::UnexpectedComponent {
            expected: KW_VCALENDAR.to_owned(),
            found: root.kind().to_string(),
            span: begin_span(src),
        });
    }
    Ok(Calendar::from_root(root))
}

struct OpenComponent {
    component: Component,
    name: String,
    span: Span,
}

fn add_line(component: &mut Component, mut line: ContentLine) {
    match line.error.take() {
        None => {}
        // unreadable characters in the value, the property is still usable
        Some(error @ ParseError::MalformedLine { .. }) if !line.name.is_empty() => {
            component.parse_errors.push(error);
        }
        Some(error) => {
            tracing::debug!(%error, "skipping malformed content line");
            component.parse_errors.push(error);
            return;
        }
    }

    let (property, errors) = Property::from_content_line(&line);
    component.parse_errors.extend(errors);
    component.push_property(property);
}

fn begin_span(src: &str) -> Span {
    let start = src.len() - src.trim_start().len();
    let end = src
        .get(start..)
        .and_then(|rest| rest.find(['\r', '\n']))
        .map_or(src.len(), |i| start + i);
    start..end
}
