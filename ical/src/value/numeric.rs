// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parsers for the BOOLEAN, FLOAT and INTEGER value types and the GEO pair.

use std::fmt::{self, Display};

use chumsky::prelude::*;

use crate::keyword::{KW_FALSE, KW_TRUE};
use crate::value::Extra;

fn digits<'src>() -> impl Parser<'src, &'src str, &'src str, Extra<'src>> + Clone {
    any()
        .filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1)
        .to_slice()
}

fn signed_slice<'src, P>(body: P) -> impl Parser<'src, &'src str, &'src str, Extra<'src>> + Clone
where
    P: Parser<'src, &'src str, (), Extra<'src>> + Clone,
{
    one_of("+-").or_not().ignore_then(body).to_slice()
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// float      = (["+"] / "-") 1*DIGIT ["." 1*DIGIT]
/// ```
pub fn value_float<'src>() -> impl Parser<'src, &'src str, f64, Extra<'src>> + Clone {
    let body = digits()
        .then(just('.').then(digits()).or_not())
        .ignored();

    signed_slice(body).try_map(|text: &str, span| {
        // lexical does not accept a leading plus
        let text = text.strip_prefix('+').unwrap_or(text);
        match lexical::parse::<f64, _>(text) {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(Rich::custom(span, "float out of range")),
        }
    })
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// integer    = (["+"] / "-") 1*DIGIT
/// ```
pub fn value_integer<'src>() -> impl Parser<'src, &'src str, i32, Extra<'src>> + Clone {
    signed_slice(digits().ignored()).try_map(|text: &str, span| {
        let text = text.strip_prefix('+').unwrap_or(text);
        lexical::parse::<i32, _>(text).map_err(|_| Rich::custom(span, "integer out of range"))
    })
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// boolean    = "TRUE" / "FALSE"
/// ```
///
/// Matched case-insensitively.
pub fn value_boolean<'src>() -> impl Parser<'src, &'src str, bool, Extra<'src>> + Clone {
    any()
        .filter(char::is_ascii_alphabetic)
        .repeated()
        .at_least(1)
        .to_slice()
        .try_map(|word: &str, span| {
            if word.eq_ignore_ascii_case(KW_TRUE) {
                Ok(true)
            } else if word.eq_ignore_ascii_case(KW_FALSE) {
                Ok(false)
            } else {
                Err(Rich::custom(span, format!("expected TRUE or FALSE, found {word}")))
            }
        })
}

/// The value of the GEO property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geo {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl Display for Geo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.latitude, self.longitude)
    }
}

/// Format Definition:
///
/// ```txt
/// geovalue   = float ";" float
/// ;Latitude and Longitude components
/// ```
pub fn value_geo<'src>() -> impl Parser<'src, &'src str, Geo, Extra<'src>> + Clone {
    value_float()
        .then_ignore(just(';'))
        .then(value_float())
        .try_map(|(latitude, longitude), span| {
            if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                return Err(Rich::custom(span, "geographic position out of range"));
            }
            Ok(Geo {
                latitude,
                longitude,
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::parse_with;

    #[test]
    fn parses_float() {
        #[rustfmt::skip]
        let success_cases = [
            // examples from RFC 5545 Section 3.3.7
            ("1000000.0000001", 1_000_000.000_000_1),
            ("1.333",           1.333),
            ("-3.14",           -3.14),
            // extra tests
            ("+2.5",            2.5),
            ("42",              42.0),
        ];
        for (src, expected) in success_cases {
            let f = parse_with(value_float(), src).unwrap();
            assert!((f - expected).abs() < 1e-9, "Parse {src} got {f}");
        }

        for src in ["", ".5", "1.", "1.2.3", "abc", "1e5"] {
            assert!(parse_with(value_float(), src).is_err(), "Parse {src} should fail");
        }
    }

    #[test]
    fn parses_integer() {
        #[rustfmt::skip]
        let success_cases = [
            // examples from RFC 5545 Section 3.3.8
            ("1234567890",  1_234_567_890),
            ("-1234567890", -1_234_567_890),
            ("+1234567890", 1_234_567_890),
            ("432109876",   432_109_876),
            // extra tests
            ("0",           0),
        ];
        for (src, expected) in success_cases {
            assert_eq!(parse_with(value_integer(), src).unwrap(), expected, "{src}");
        }

        for src in ["", "+", "1.0", "2147483648", "12a"] {
            assert!(parse_with(value_integer(), src).is_err(), "Parse {src} should fail");
        }
    }

    #[test]
    fn parses_boolean() {
        assert_eq!(parse_with(value_boolean(), "TRUE"), Ok(true));
        assert_eq!(parse_with(value_boolean(), "false"), Ok(false));
        assert!(parse_with(value_boolean(), "yes").is_err());
    }

    #[test]
    fn parses_geo() {
        let geo = parse_with(value_geo(), "37.386013;-122.082932").unwrap();
        assert!((geo.latitude - 37.386_013).abs() < 1e-9);
        assert!((geo.longitude + 122.082_932).abs() < 1e-9);
        assert_eq!(geo.to_string(), "37.386013;-122.082932");

        for src in ["37.386013", "91.0;0.0", "0.0;181.0", "1;2;3"] {
            assert!(parse_with(value_geo(), src).is_err(), "Parse {src} should fail");
        }
    }
}
