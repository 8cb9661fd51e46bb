// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Period value type parser as defined in RFC 5545 Section 3.3.9.

use std::fmt::{self, Display};

use chumsky::prelude::*;
use jiff::civil::DateTime;

use crate::value::duration::{ValueDuration, value_duration};
use crate::value::{Extra, Temporal, parse_with, value_date_time};

/// Period of Time value defined in RFC 5545 Section 3.3.9
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValuePeriod {
    /// Start of the period
    pub start: Temporal,

    /// End of the period, explicit or as a duration
    pub end: PeriodEnd,
}

/// How a period ends.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PeriodEnd {
    /// `date-time "/" date-time`
    End(Temporal),

    /// `date-time "/" dur-value`
    Duration(ValueDuration),
}

impl ValuePeriod {
    /// Parse a single period, placing local times in `tzid` when given.
    ///
    /// # Errors
    ///
    /// Returns the grammar error when the text is not a period.
    pub fn parse(text: &str, tzid: Option<&str>) -> Result<Self, String> {
        let period = parse_with(value_period(), text)?;
        let Some(tzid) = tzid else {
            return Ok(period);
        };

        let localize = |t: Temporal| match t {
            Temporal::Floating(datetime) => Temporal::Zoned {
                datetime,
                tzid: tzid.to_owned(),
            },
            other => other,
        };
        Ok(Self {
            start: localize(period.start),
            end: match period.end {
                PeriodEnd::End(end) => PeriodEnd::End(localize(end)),
                duration @ PeriodEnd::Duration(_) => duration,
            },
        })
    }

    /// The end of the period as a value of the start's form.
    ///
    /// # Errors
    ///
    /// Returns an error when adding the duration overflows.
    pub fn end_temporal(&self) -> Result<Temporal, jiff::Error> {
        match &self.end {
            PeriodEnd::End(end) => Ok(end.clone()),
            PeriodEnd::Duration(duration) => {
                let civil = self.start.civil().checked_add(duration.to_span()?)?;
                Ok(self.start.with_civil(civil))
            }
        }
    }
}

impl Display for ValuePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.end {
            PeriodEnd::End(end) => write!(f, "{}/{end}", self.start),
            PeriodEnd::Duration(duration) => write!(f, "{}/{duration}", self.start),
        }
    }
}

fn to_temporal((datetime, utc): (DateTime, bool)) -> Temporal {
    if utc {
        Temporal::Utc(datetime)
    } else {
        Temporal::Floating(datetime)
    }
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// period     = period-explicit / period-start
///
/// period-explicit = date-time "/" date-time
/// ; [ISO.8601.2004] complete representation basic format for a
/// ; period of time consisting of a start and end.  The start MUST
/// ; be before the end.
///
/// period-start = date-time "/" dur-value
/// ; [ISO.8601.2004] complete representation basic format for a
/// ; period of time consisting of a start and positive duration
/// ; of time.
/// ```
///
/// Local times come out floating, see [`ValuePeriod::parse`] for zoned
/// periods.
pub fn value_period<'src>() -> impl Parser<'src, &'src str, ValuePeriod, Extra<'src>> + Clone {
    let explicit = value_date_time()
        .then_ignore(just('/'))
        .then(value_date_time())
        .try_map(|(start, end), span| {
            if start.1 != end.1 {
                return Err(Rich::custom(span, "period start and end differ in UTC marker"));
            }
            if end.0 <= start.0 {
                return Err(Rich::custom(span, "period end must be after its start"));
            }
            Ok(ValuePeriod {
                start: to_temporal(start),
                end: PeriodEnd::End(to_temporal(end)),
            })
        });

    let start = value_date_time()
        .then_ignore(just('/'))
        .then(value_duration())
        .try_map(|(start, duration), span| {
            if !duration.is_positive() {
                return Err(Rich::custom(span, "period duration must be positive"));
            }
            Ok(ValuePeriod {
                start: to_temporal(start),
                end: PeriodEnd::Duration(duration),
            })
        });

    choice((explicit, start))
}
