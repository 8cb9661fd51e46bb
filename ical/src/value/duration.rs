// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Duration value type parser as defined in RFC 5545 Section 3.3.6.

use std::fmt::{self, Display};

use chumsky::prelude::*;
use jiff::{SignedDuration, Span};

use crate::value::{Extra, sign, unsigned};

/// Duration Value defined in RFC 5545 Section 3.3.6
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueDuration {
    /// Date and Time Duration
    DateTime {
        /// Whether the duration is positive
        positive: bool,
        /// Day Duration
        day: u32,
        /// Hour Duration
        hour: u32,
        /// Minute Duration
        minute: u32,
        /// Second Duration
        second: u32,
    },

    /// Week Duration
    Week {
        /// Whether the duration is positive
        positive: bool,
        /// Week Duration
        week: u32,
    },
}

impl ValueDuration {
    /// Build the canonical duration for an exact length of time.
    ///
    /// Whole weeks use the week form, anything else the day and time form.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_signed_duration(duration: SignedDuration) -> Self {
        let positive = !duration.is_negative();
        let total = duration.as_secs().unsigned_abs();
        let week_secs = 7 * 86_400;
        if total != 0 && total % week_secs == 0 {
            return Self::Week {
                positive,
                week: (total / week_secs) as u32,
            };
        }

        Self::DateTime {
            positive,
            day: (total / 86_400) as u32,
            hour: (total % 86_400 / 3600) as u32,
            minute: (total % 3600 / 60) as u32,
            second: (total % 60) as u32,
        }
    }

    /// The exact length of this duration, counting a day as 24 hours.
    #[must_use]
    pub fn to_signed_duration(self) -> SignedDuration {
        let (positive, secs) = match self {
            Self::DateTime {
                positive,
                day,
                hour,
                minute,
                second,
            } => (
                positive,
                i64::from(day) * 86_400
                    + i64::from(hour) * 3600
                    + i64::from(minute) * 60
                    + i64::from(second),
            ),
            Self::Week { positive, week } => (positive, i64::from(week) * 7 * 86_400),
        };
        SignedDuration::from_secs(if positive { secs } else { -secs })
    }

    /// The nominal length of this duration, keeping weeks and days as
    /// calendar units so that DST transitions do not change the wall clock.
    ///
    /// # Errors
    ///
    /// Returns an error when a unit is out of the range `jiff` supports.
    pub fn to_span(self) -> Result<Span, jiff::Error> {
        let span = match self {
            Self::DateTime {
                day,
                hour,
                minute,
                second,
                ..
            } => Span::new()
                .try_days(i64::from(day))?
                .try_hours(i64::from(hour))?
                .try_minutes(i64::from(minute))?
                .try_seconds(i64::from(second))?,
            Self::Week { week, .. } => Span::new().try_weeks(i64::from(week))?,
        };
        Ok(if self.is_positive() { span } else { span.negate() })
    }

    /// Whether the duration is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        match self {
            Self::DateTime { positive, .. } | Self::Week { positive, .. } => positive,
        }
    }
}

impl Display for ValueDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_positive() {
            f.write_str("-")?;
        }
        f.write_str("P")?;
        match *self {
            Self::Week { week, .. } => write!(f, "{week}W"),
            Self::DateTime {
                day,
                hour,
                minute,
                second,
                ..
            } => {
                if day > 0 || (hour == 0 && minute == 0 && second == 0) {
                    write!(f, "{day}D")?;
                }
                if hour == 0 && minute == 0 && second == 0 {
                    return Ok(());
                }

                f.write_str("T")?;
                if hour > 0 {
                    write!(f, "{hour}H")?;
                }
                // dur-hour requires a following minute when seconds are present
                if minute > 0 || (hour > 0 && second > 0) {
                    write!(f, "{minute}M")?;
                }
                if second > 0 {
                    write!(f, "{second}S")?;
                }
                Ok(())
            }
        }
    }
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// dur-value  = (["+"] / "-") "P" (dur-date / dur-time / dur-week)
///
/// dur-date   = dur-day [dur-time]
/// dur-time   = "T" (dur-hour / dur-minute / dur-second)
/// dur-week   = 1*DIGIT "W"
/// dur-hour   = 1*DIGIT "H" [dur-minute]
/// dur-minute = 1*DIGIT "M" [dur-second]
/// dur-second = 1*DIGIT "S"
/// dur-day    = 1*DIGIT "D"
/// ```
pub fn value_duration<'src>() -> impl Parser<'src, &'src str, ValueDuration, Extra<'src>> + Clone
{
    let second = unsigned().then_ignore(just('S'));
    let minute = unsigned().then_ignore(just('M'));
    let hour = unsigned().then_ignore(just('H'));

    // dur-minute = 1*DIGIT "M" [dur-second]
    let minute_with_second = minute
        .clone()
        .then(second.clone().or_not())
        .map(|(m, s)| (0, m, s.unwrap_or(0)));

    // dur-hour = 1*DIGIT "H" [dur-minute]
    let hour_with_minute = hour
        .then(minute.then(second.clone().or_not()).or_not())
        .map(|(h, ms)| match ms {
            Some((m, s)) => (h, m, s.unwrap_or(0)),
            None => (h, 0, 0),
        });

    // dur-time = "T" (dur-hour / dur-minute / dur-second)
    let time = just('T').ignore_then(choice((
        hour_with_minute,
        minute_with_second,
        second.map(|s| (0, 0, s)),
    )));

    let date = unsigned()
        .then_ignore(just('D'))
        .then(time.clone().or_not())
        .map(|(day, time)| (day, time.unwrap_or((0, 0, 0))));

    let week = unsigned().then_ignore(just('W'));

    sign().then_ignore(just('P')).then(choice((
        week.map(Err),
        date.map(Ok),
        time.map(|time| Ok((0, time))),
    )))
    .map(|(positive, body)| match body {
        Err(week) => ValueDuration::Week { positive, week },
        Ok((day, (hour, minute, second))) => ValueDuration::DateTime {
            positive,
            day,
            hour,
            minute,
            second,
        },
    })
}
