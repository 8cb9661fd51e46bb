// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! DATE and DATE-TIME values with their four forms.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;
use jiff::{SignedDuration, Timestamp};

use crate::value::datetime::{format_date, format_date_time};
use crate::value::{ValueType, parse_with, value_date, value_date_time};

/// A DATE or DATE-TIME value.
///
/// RFC 5545 knows four forms and properties that are compared with each
/// other (DTSTART, DTEND, EXDATE, RDATE, RECURRENCE-ID) must share the same
/// form, see [`TemporalTag`].
#[derive(Debug, Clone)]
pub enum Temporal {
    /// A whole day, `VALUE=DATE`.
    Date(Date),

    /// Local time without a time zone.
    Floating(DateTime),

    /// UTC time, the value text carries a trailing `Z`.
    Utc(DateTime),

    /// Local time in the zone named by the `TZID` parameter.
    Zoned {
        /// Wall clock time in the zone.
        datetime: DateTime,
        /// Time zone identifier.
        tzid: String,
    },
}

/// The form of a [`Temporal`], compared by the tag-consistency rules.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::IntoStaticStr,
)]
pub enum TemporalTag {
    /// Date only.
    #[strum(serialize = "DATE")]
    Date,
    /// Date with local time.
    #[strum(serialize = "DATE_WITH_LOCAL_TIME")]
    Floating,
    /// Date with UTC time.
    #[strum(serialize = "DATE_WITH_UTC_TIME")]
    Utc,
    /// Date with local time and a time zone.
    #[strum(serialize = "DATE_WITH_LOCAL_TIME_AND_TIME_ZONE")]
    Zoned,
}

impl Temporal {
    /// Parse a single DATE or DATE-TIME value text.
    ///
    /// A trailing `Z` yields a UTC value, otherwise `tzid` decides between a
    /// zoned and a floating value. Eight digit values are read as dates even
    /// when `VALUE=DATE` is missing.
    ///
    /// # Errors
    ///
    /// Returns the grammar error when the text is neither a date nor a
    /// date-time.
    pub fn parse(text: &str, value_type: ValueType, tzid: Option<&str>) -> Result<Self, String> {
        if value_type == ValueType::Date || !text.contains('T') {
            return parse_with(value_date(), text).map(Self::Date);
        }

        let (datetime, utc) = parse_with(value_date_time(), text)?;
        Ok(match (utc, tzid) {
            (true, _) => Self::Utc(datetime),
            (false, Some(tzid)) => Self::Zoned {
                datetime,
                tzid: tzid.to_owned(),
            },
            (false, None) => Self::Floating(datetime),
        })
    }

    /// The form of this value.
    #[must_use]
    pub const fn tag(&self) -> TemporalTag {
        match self {
            Self::Date(_) => TemporalTag::Date,
            Self::Floating(_) => TemporalTag::Floating,
            Self::Utc(_) => TemporalTag::Utc,
            Self::Zoned { .. } => TemporalTag::Zoned,
        }
    }

    /// Whether this is a whole-day value.
    #[must_use]
    pub const fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// The time zone identifier of a zoned value.
    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        match self {
            Self::Zoned { tzid, .. } => Some(tzid),
            _ => None,
        }
    }

    /// The calendar date of this value in its own wall clock.
    #[must_use]
    pub fn date(&self) -> Date {
        self.civil().date()
    }

    /// The wall clock date-time, midnight for whole-day values.
    #[must_use]
    pub fn civil(&self) -> DateTime {
        match self {
            Self::Date(date) => date.to_datetime(Time::midnight()),
            Self::Floating(dt) | Self::Utc(dt) | Self::Zoned { datetime: dt, .. } => *dt,
        }
    }

    /// The time zone used to place this value on the timeline.
    ///
    /// Whole-day and floating values are placed on the UTC timeline. An
    /// unknown zone falls back to UTC as well.
    #[must_use]
    pub fn time_zone(&self) -> TimeZone {
        match self {
            Self::Zoned { tzid, .. } => TimeZone::get(tzid).unwrap_or_else(|_| {
                tracing::trace!(tzid, "unknown time zone, using UTC");
                TimeZone::UTC
            }),
            _ => TimeZone::UTC,
        }
    }

    /// The instant of this value.
    #[must_use]
    pub fn instant(&self) -> Timestamp {
        self.civil()
            .to_zoned(self.time_zone())
            .map_or(Timestamp::MIN, |zoned| zoned.timestamp())
    }

    /// A value of the same form at another wall clock date-time.
    #[must_use]
    pub fn with_civil(&self, datetime: DateTime) -> Self {
        match self {
            Self::Date(_) => Self::Date(datetime.date()),
            Self::Floating(_) => Self::Floating(datetime),
            Self::Utc(_) => Self::Utc(datetime),
            Self::Zoned { tzid, .. } => Self::Zoned {
                datetime,
                tzid: tzid.clone(),
            },
        }
    }

    /// Convert this value into the form of `template`.
    ///
    /// Instants are preserved between UTC and zoned forms. A whole-day value
    /// takes the time of day of `template` when it becomes a date-time.
    #[must_use]
    pub fn retag_like(&self, template: &Self) -> Self {
        let civil = match (self, template) {
            (Self::Date(date), _) => date.to_datetime(template.civil().time()),
            (Self::Utc(_) | Self::Zoned { .. }, Self::Utc(_) | Self::Zoned { .. }) => {
                let tz = template.time_zone();
                tz.to_datetime(self.instant())
            }
            _ => self.civil(),
        };
        template.with_civil(civil)
    }

    /// The same instant as a UTC value. Whole-day values stay as they are.
    #[must_use]
    pub fn to_utc(&self) -> Self {
        match self {
            Self::Date(_) | Self::Utc(_) => self.clone(),
            Self::Floating(dt) => Self::Utc(*dt),
            Self::Zoned { .. } => Self::Utc(TimeZone::UTC.to_datetime(self.instant())),
        }
    }

    /// The last second of this value's day, in the same form.
    #[must_use]
    pub fn end_of_day(&self) -> Self {
        match self {
            Self::Date(_) => self.clone(),
            _ => self.with_civil(self.date().to_datetime(Time::constant(23, 59, 59, 0))),
        }
    }

    /// Shift the wall clock time by `delta`.
    ///
    /// # Errors
    ///
    /// Returns an error when the result is out of range.
    pub fn shifted(&self, delta: SignedDuration) -> Result<Self, jiff::Error> {
        Ok(self.with_civil(self.civil().checked_add(delta)?))
    }

    /// Wall clock difference from `self` to `other`.
    #[must_use]
    pub fn civil_until(&self, other: &Self) -> SignedDuration {
        self.civil().duration_until(other.civil())
    }

    /// Instant difference from `self` to `other`.
    #[must_use]
    pub fn duration_until(&self, other: &Self) -> SignedDuration {
        self.instant().duration_until(other.instant())
    }
}

impl PartialEq for Temporal {
    fn eq(&self, other: &Self) -> bool {
        // equal form, zone and wall clock imply an equal instant
        self.tag() == other.tag() && self.tzid() == other.tzid() && self.civil() == other.civil()
    }
}

impl Eq for Temporal {}

impl PartialOrd for Temporal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Temporal {
    /// Compare by instant, then by form, then by zone and wall clock time.
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant()
            .cmp(&other.instant())
            .then_with(|| self.tag().cmp(&other.tag()))
            .then_with(|| self.tzid().cmp(&other.tzid()))
            .then_with(|| self.civil().cmp(&other.civil()))
    }
}

impl Hash for Temporal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag().hash(state);
        self.tzid().hash(state);
        self.civil().hash(state);
    }
}

impl Display for Temporal {
    /// The value text, without the `TZID` parameter of zoned values.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => f.write_str(&format_date(*date)),
            Self::Floating(dt) | Self::Zoned { datetime: dt, .. } => {
                f.write_str(&format_date_time(*dt, false))
            }
            Self::Utc(dt) => f.write_str(&format_date_time(*dt, true)),
        }
    }
}
