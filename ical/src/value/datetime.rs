// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parsers for the DATE, TIME, DATE-TIME and UTC-OFFSET value types.

use std::fmt::{self, Display};

use chumsky::prelude::*;
use jiff::civil::{Date, DateTime, Time};
use jiff::tz::Offset;

use crate::value::{Extra, fixed_digits};

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// date               = date-value
///
/// date-value         = date-fullyear date-month date-mday
/// date-fullyear      = 4DIGIT
/// date-month         = 2DIGIT        ;01-12
/// date-mday          = 2DIGIT        ;01-28, 01-29, 01-30, 01-31
///                                    ;based on month/year
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn value_date<'src>() -> impl Parser<'src, &'src str, Date, Extra<'src>> + Clone {
    fixed_digits(4)
        .then(fixed_digits(2))
        .then(fixed_digits(2))
        .try_map(|((year, month), day), span| {
            // fixed width keeps every part within the target integer range
            Date::new(year as i16, month as i8, day as i8)
                .map_err(|e| Rich::custom(span, format!("invalid date: {e}")))
        })
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// time         = time-hour time-minute time-second [time-utc]
///
/// time-hour    = 2DIGIT        ;00-23
/// time-minute  = 2DIGIT        ;00-59
/// time-second  = 2DIGIT        ;00-60
/// ;The "60" value is used to account for positive "leap" seconds.
///
/// time-utc     = "Z"
/// ```
///
/// The output pairs the civil time with the presence of the UTC marker. A
/// leap second is contracted to second 59.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn value_time<'src>() -> impl Parser<'src, &'src str, (Time, bool), Extra<'src>> + Clone {
    fixed_digits(2)
        .then(fixed_digits(2))
        .then(fixed_digits(2))
        .then(just('Z').or_not())
        .try_map(|(((hour, minute), second), utc), span| {
            if hour > 23 || minute > 59 || second > 60 {
                return Err(Rich::custom(span, "invalid time"));
            }
            let time = Time::new(hour as i8, minute as i8, second.min(59) as i8, 0)
                .map_err(|e| Rich::custom(span, format!("invalid time: {e}")))?;
            Ok((time, utc.is_some()))
        })
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// date-time  = date "T" time ;As specified in the DATE and TIME
/// ```
pub fn value_date_time<'src>() -> impl Parser<'src, &'src str, (DateTime, bool), Extra<'src>> + Clone
{
    value_date()
        .then_ignore(just('T'))
        .then(value_time())
        .map(|(date, (time, utc))| (date.to_datetime(time), utc))
}

/// UTC Offset Value defined in RFC 5545 Section 3.3.14
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueUtcOffset {
    /// Whether the offset is positive
    pub positive: bool,

    /// Hour, 0-23
    pub hour: u8,

    /// Minute, 0-59
    pub minute: u8,

    /// Second, 0-59, optional
    pub second: Option<u8>,
}

impl ValueUtcOffset {
    /// Convert to a `jiff` offset.
    #[must_use]
    pub fn to_offset(self) -> Offset {
        let seconds = i32::from(self.hour) * 3600
            + i32::from(self.minute) * 60
            + i32::from(self.second.unwrap_or(0));
        let seconds = if self.positive { seconds } else { -seconds };
        Offset::from_seconds(seconds).unwrap_or(Offset::UTC)
    }
}

impl Display for ValueUtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.positive { '+' } else { '-' };
        write!(f, "{sign}{:02}{:02}", self.hour, self.minute)?;
        if let Some(second) = self.second {
            write!(f, "{second:02}")?;
        }
        Ok(())
    }
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// utc-offset = time-numzone
///
/// time-numzone = ("+" / "-") time-hour time-minute [time-second]
/// ```
#[allow(clippy::cast_possible_truncation)]
pub fn value_utc_offset<'src>() -> impl Parser<'src, &'src str, ValueUtcOffset, Extra<'src>> + Clone
{
    choice((just('+').to(true), just('-').to(false)))
        .then(fixed_digits(2))
        .then(fixed_digits(2))
        .then(fixed_digits(2).or_not())
        .try_map(|(((positive, hour), minute), second), span| {
            if hour > 23 || minute > 59 || second.is_some_and(|s| s > 59) {
                return Err(Rich::custom(span, "invalid utc offset"));
            }
            // "-0000" is not a valid offset
            if !positive && hour == 0 && minute == 0 && second.unwrap_or(0) == 0 {
                return Err(Rich::custom(span, "negative zero utc offset"));
            }
            Ok(ValueUtcOffset {
                positive,
                hour: hour as u8,
                minute: minute as u8,
                second: second.map(|s| s as u8),
            })
        })
}

/// Format a date as `YYYYMMDD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    format!("{:04}{:02}{:02}", date.year(), date.month(), date.day())
}

/// Format a time as `hhmmss`, with a trailing `Z` for UTC.
#[must_use]
pub fn format_time(time: Time, utc: bool) -> String {
    let z = if utc { "Z" } else { "" };
    format!(
        "{:02}{:02}{:02}{z}",
        time.hour(),
        time.minute(),
        time.second()
    )
}

/// Format a date-time as `YYYYMMDDThhmmss`, with a trailing `Z` for UTC.
#[must_use]
pub fn format_date_time(datetime: DateTime, utc: bool) -> String {
    format!(
        "{}T{}",
        format_date(datetime.date()),
        format_time(datetime.time(), utc)
    )
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};

    use super::*;
    use crate::value::parse_with;

    #[test]
    fn parses_date() {
        #[rustfmt::skip]
        let success_cases = [
            // examples from RFC 5545 Section 3.3.4
            ("19970714", date(1997, 7, 14)),
            // extra tests
            ("20240101", date(2024, 1, 1)),
            ("20000229", date(2000, 2, 29)), // leap year
        ];
        for (src, expected) in success_cases {
            assert_eq!(parse_with(value_date(), src).unwrap(), expected);
        }

        let fail_cases = [
            "20241301",  // invalid month
            "20240001",  // invalid month
            "19970230",  // invalid date
            "abcd1234",  // invalid characters
            "2024011",   // invalid length
            "202401011", // invalid length
        ];
        for src in fail_cases {
            assert!(parse_with(value_date(), src).is_err(), "Parse {src} should fail");
        }
    }

    #[test]
    fn parses_date_time() {
        #[rustfmt::skip]
        let success_cases = [
            // examples from RFC 5545 Section 3.3.5
            ("19980118T230000",  (date(1998, 1, 18).at(23, 0, 0, 0), false)),
            ("19980119T070000Z", (date(1998, 1, 19).at(7, 0, 0, 0), true)),
            ("19970630T235960Z", (date(1997, 6, 30).at(23, 59, 59, 0), true)), // leap second
        ];
        for (src, expected) in success_cases {
            assert_eq!(parse_with(value_date_time(), src).unwrap(), expected, "{src}");
        }

        let fail_cases = [
            "19980119T230000-0800", // invalid time format
            "19970714 133000",      // missing 'T'
            "19970714T250000",      // invalid hour
            "19970714T126000",      // invalid minute
            "19970714T123461",      // invalid second
        ];
        for src in fail_cases {
            assert!(parse_with(value_date_time(), src).is_err(), "Parse {src} should fail");
        }
    }

    #[test]
    fn parses_time() {
        assert_eq!(
            parse_with(value_time(), "135501Z").unwrap(),
            (time(13, 55, 1, 0), true)
        );
        assert!(parse_with(value_time(), "120000ZZ").is_err());
        assert!(parse_with(value_time(), "").is_err());
    }

    #[test]
    fn parses_utc_offset() {
        #[rustfmt::skip]
        let success_cases = [
            // examples from RFC 5545 Section 3.3.14
            ("-0500",   ValueUtcOffset { positive: false, hour: 5, minute: 0, second: None }),
            ("+0100",   ValueUtcOffset { positive: true, hour: 1, minute: 0, second: None }),
            // extra tests
            ("-123456", ValueUtcOffset { positive: false, hour: 12, minute: 34, second: Some(56) }),
        ];
        for (src, expected) in success_cases {
            let offset = parse_with(value_utc_offset(), src).unwrap();
            assert_eq!(offset, expected);
            assert_eq!(offset.to_string(), src);
        }

        for src in ["0500", "+2400", "-1260", "-0000", "+120"] {
            assert!(parse_with(value_utc_offset(), src).is_err(), "Parse {src} should fail");
        }
    }

    #[test]
    fn converts_utc_offset() {
        let offset = parse_with(value_utc_offset(), "-0530").unwrap();
        assert_eq!(offset.to_offset().seconds(), -(5 * 3600 + 30 * 60));
    }

    #[test]
    fn formats_date_time() {
        let dt = date(2015, 11, 9).at(10, 0, 0, 0);
        assert_eq!(format_date_time(dt, false), "20151109T100000");
        assert_eq!(format_date_time(dt, true), "20151109T100000Z");
        assert_eq!(format_date(dt.date()), "20151109");
    }
}
