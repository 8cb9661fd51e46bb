// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parse, represent, expand and write iCalendar (RFC 5545) data.
//!
//! Text is turned into a tree of [`Component`]s by [`parse`], written back
//! by [`format`], and recurring components expand into their instances
//! through [`Component::occurrences`] and [`Calendar::expand`].

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::option_option,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::match_bool
)]

pub mod calendar;
pub mod component;
pub mod formatter;
pub mod keyword;
pub mod parameter;
mod parser;
pub mod property;
pub mod recurrence;
pub mod syntax;
pub mod value;

pub use crate::calendar::{Calendar, Instance, Series};
pub use crate::component::{Component, ComponentError, ComponentKind};
pub use crate::formatter::{FoldingStyle, FormatOptions, format, format_calendar};
pub use crate::parameter::{
    AlarmTriggerRelationship, CalendarUserType, Encoding, FreeBusyType, Parameter, ParameterKind,
    ParticipationRole, ParticipationStatus, RecurrenceIdRange, RelationshipType,
};
pub use crate::parser::{parse, parse_calendar};
pub use crate::property::{Property, PropertyKind, parse_content_line};
pub use crate::recurrence::{Occurrences, RecurrenceError, RuleIter, same_occurrence};
pub use crate::syntax::{ParseError, Span};
pub use crate::value::{
    RecurrenceFrequency, RecurrenceRule, RuleEnd, Temporal, TemporalTag, Value, ValueDuration,
    ValuePeriod, ValueType, WeekDayNum,
};
