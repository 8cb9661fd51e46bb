// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Property value types and their codecs as defined in RFC 5545 Section 3.3.
//!
//! Every value type exposes a `chumsky` parser working on the unescaped value
//! text of a content line and a `Display` implementation producing the
//! canonical text again. [`Value::parse`] dispatches on the value type of a
//! property.

mod datetime;
mod duration;
mod numeric;
mod period;
mod rrule;
mod temporal;
mod text;

use std::fmt::{self, Display};

use chumsky::prelude::*;

use crate::keyword::{
    KW_BINARY, KW_BOOLEAN, KW_CAL_ADDRESS, KW_DATE, KW_DATETIME, KW_DURATION_TYPE, KW_FLOAT,
    KW_INTEGER, KW_PERIOD, KW_RECUR, KW_TEXT, KW_TIME, KW_URI, KW_UTC_OFFSET,
};

pub use crate::value::datetime::{
    ValueUtcOffset, format_date, format_date_time, format_time, value_date, value_date_time,
    value_time, value_utc_offset,
};
pub use crate::value::duration::{ValueDuration, value_duration};
pub use crate::value::numeric::{Geo, value_boolean, value_float, value_geo, value_integer};
pub use crate::value::period::{PeriodEnd, ValuePeriod, value_period};
pub use crate::value::rrule::{
    ByRule, ByRuleKind, RecurrenceFrequency, RecurrenceRule, RuleEnd, WeekDayNum, value_rrule,
};
pub use crate::value::temporal::{Temporal, TemporalTag};
pub use crate::value::text::{escape_text, split_text_list, unescape_text};

/// Parser extra shared by every value grammar.
pub(crate) type Extra<'src> = extra::Err<Rich<'src, char>>;

/// Value data types defined in RFC 5545 Section 3.3, as named by the `VALUE`
/// parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::IntoStaticStr)]
#[strum(ascii_case_insensitive)]
#[expect(missing_docs)]
pub enum ValueType {
    #[strum(serialize = "BINARY")]
    Binary,
    #[strum(serialize = "BOOLEAN")]
    Boolean,
    #[strum(serialize = "CAL-ADDRESS")]
    CalAddress,
    #[strum(serialize = "DATE")]
    Date,
    #[strum(serialize = "DATE-TIME")]
    DateTime,
    #[strum(serialize = "DURATION")]
    Duration,
    #[strum(serialize = "FLOAT")]
    Float,
    #[strum(serialize = "INTEGER")]
    Integer,
    #[strum(serialize = "PERIOD")]
    Period,
    #[strum(serialize = "RECUR")]
    Recur,
    #[strum(serialize = "TEXT")]
    Text,
    #[strum(serialize = "TIME")]
    Time,
    #[strum(serialize = "URI")]
    Uri,
    #[strum(serialize = "UTC-OFFSET")]
    UtcOffset,
}

impl ValueType {
    /// Keyword used in the `VALUE` parameter.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Binary => KW_BINARY,
            Self::Boolean => KW_BOOLEAN,
            Self::CalAddress => KW_CAL_ADDRESS,
            Self::Date => KW_DATE,
            Self::DateTime => KW_DATETIME,
            Self::Duration => KW_DURATION_TYPE,
            Self::Float => KW_FLOAT,
            Self::Integer => KW_INTEGER,
            Self::Period => KW_PERIOD,
            Self::Recur => KW_RECUR,
            Self::Text => KW_TEXT,
            Self::Time => KW_TIME,
            Self::Uri => KW_URI,
            Self::UtcOffset => KW_UTC_OFFSET,
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed property value.
///
/// List-valued properties (EXDATE, RDATE, CATEGORIES, ...) keep every entry
/// of one content line in a single value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Inline binary content, kept in its encoded form.
    Binary(String),

    /// BOOLEAN value.
    Boolean(bool),

    /// CAL-ADDRESS value, usually a `mailto:` URI.
    CalAddress(String),

    /// DURATION value.
    Duration(ValueDuration),

    /// FLOAT value.
    Float(f64),

    /// The `GEO` property's pair of floats.
    Geo(Geo),

    /// INTEGER value.
    Integer(i32),

    /// PERIOD list.
    Periods(Vec<ValuePeriod>),

    /// RECUR value.
    Recur(RecurrenceRule),

    /// A single DATE or DATE-TIME.
    Temporal(Temporal),

    /// A list of DATE or DATE-TIME values.
    Temporals(Vec<Temporal>),

    /// TEXT value, unescaped.
    Text(String),

    /// A list of TEXT values, unescaped.
    TextList(Vec<String>),

    /// TIME values, with the UTC marker.
    Times(Vec<(jiff::civil::Time, bool)>),

    /// URI value.
    Uri(String),

    /// UTC-OFFSET value.
    UtcOffset(ValueUtcOffset),

    /// Unparsed value text, used for extension properties and for values
    /// that failed to parse.
    Raw(String),
}

impl Value {
    /// Parse the value text of a property.
    ///
    /// `tzid` is the property's `TZID` parameter, `list` tells whether the
    /// property allows a comma separated list of values on one line.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem when the text does not match the
    /// grammar of `value_type`.
    pub fn parse(
        text: &str,
        value_type: ValueType,
        tzid: Option<&str>,
        list: bool,
    ) -> Result<Self, String> {
        match value_type {
            ValueType::Binary => Ok(Self::Binary(text.to_owned())),
            ValueType::Boolean => parse_with(value_boolean(), text).map(Self::Boolean),
            ValueType::CalAddress => Ok(Self::CalAddress(text.to_owned())),
            ValueType::Date | ValueType::DateTime => {
                let values = text
                    .split(',')
                    .map(|item| Temporal::parse(item, value_type, tzid))
                    .collect::<Result<Vec<_>, _>>()?;

                match (list, values.as_slice()) {
                    (true, _) => Ok(Self::Temporals(values)),
                    (false, [single]) => Ok(Self::Temporal(single.clone())),
                    (false, _) => Err("expected a single date or date-time".to_owned()),
                }
            }
            ValueType::Duration => parse_with(value_duration(), text).map(Self::Duration),
            ValueType::Float => parse_with(value_float(), text).map(Self::Float),
            ValueType::Integer => parse_with(value_integer(), text).map(Self::Integer),
            ValueType::Period => text
                .split(',')
                .map(|item| ValuePeriod::parse(item, tzid))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Periods),
            ValueType::Recur => parse_with(value_rrule(), text).map(Self::Recur),
            ValueType::Text if list => Ok(Self::TextList(split_text_list(text))),
            ValueType::Text => Ok(Self::Text(unescape_text(text))),
            ValueType::Time => text
                .split(',')
                .map(|item| parse_with(value_time(), item))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Times),
            ValueType::Uri => Ok(Self::Uri(text.to_owned())),
            ValueType::UtcOffset => parse_with(value_utc_offset(), text).map(Self::UtcOffset),
        }
    }

    /// The single temporal of this value, if any.
    #[must_use]
    pub fn as_temporal(&self) -> Option<&Temporal> {
        match self {
            Self::Temporal(t) => Some(t),
            Self::Temporals(list) => list.first(),
            Self::Periods(list) => list.first().map(|p| &p.start),
            _ => None,
        }
    }

    /// Every temporal carried by this value, period starts included.
    #[must_use]
    pub fn temporals(&self) -> Vec<&Temporal> {
        match self {
            Self::Temporal(t) => vec![t],
            Self::Temporals(list) => list.iter().collect(),
            Self::Periods(list) => list.iter().map(|p| &p.start).collect(),
            _ => Vec::new(),
        }
    }

    /// The text of this value, if it is a TEXT value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Uri(s) | Self::CalAddress(s) | Self::Raw(s) => Some(s),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary(s) | Self::CalAddress(s) | Self::Uri(s) | Self::Raw(s) => f.write_str(s),
            Self::Boolean(true) => f.write_str(crate::keyword::KW_TRUE),
            Self::Boolean(false) => f.write_str(crate::keyword::KW_FALSE),
            Self::Duration(d) => write!(f, "{d}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Geo(geo) => write!(f, "{geo}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Periods(list) => write_list(f, list),
            Self::Recur(rule) => write!(f, "{rule}"),
            Self::Temporal(t) => write!(f, "{t}"),
            Self::Temporals(list) => write_list(f, list),
            Self::Text(s) => f.write_str(&escape_text(s)),
            Self::TextList(list) => {
                let escaped: Vec<_> = list.iter().map(|s| escape_text(s)).collect();
                f.write_str(&escaped.join(","))
            }
            Self::Times(list) => {
                for (i, (time, utc)) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    f.write_str(&format_time(*time, *utc))?;
                }
                Ok(())
            }
            Self::UtcOffset(offset) => write!(f, "{offset}"),
        }
    }
}

fn write_list<T: Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Run a value grammar over the whole of `text`.
pub(crate) fn parse_with<'src, T>(
    parser: impl Parser<'src, &'src str, T, Extra<'src>>,
    text: &'src str,
) -> Result<T, String> {
    parser.parse(text).into_result().map_err(|errs| {
        errs.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    })
}

/// Exactly `n` ASCII digits as an unsigned number.
pub(crate) fn fixed_digits<'src>(n: usize) -> impl Parser<'src, &'src str, u32, Extra<'src>> + Clone
{
    any()
        .filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .exactly(n)
        .to_slice()
        .try_map(|digits: &str, span| {
            lexical::parse::<u32, _>(digits).map_err(|_| Rich::custom(span, "expected digits"))
        })
}

/// One or more ASCII digits, at most ten, as an unsigned number.
pub(crate) fn unsigned<'src>() -> impl Parser<'src, &'src str, u32, Extra<'src>> + Clone {
    any()
        .filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1)
        .at_most(10) // u32 max is 10 digits
        .to_slice()
        .try_map(|digits: &str, span| {
            lexical::parse::<u32, _>(digits)
                .map_err(|_| Rich::custom(span, "number out of range"))
        })
}

/// Optional `+`/`-` sign, `true` when positive.
pub(crate) fn sign<'src>() -> impl Parser<'src, &'src str, bool, Extra<'src>> + Clone {
    choice((just('+').to(true), just('-').to(false)))
        .or_not()
        .map(|sign| sign.unwrap_or(true))
}
