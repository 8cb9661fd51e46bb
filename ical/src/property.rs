// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Typed properties, one per content line.
//!
//! A [`Property`] couples a name, its parameters and one typed [`Value`].
//! Which value types a property accepts is looked up in the static table of
//! [`PropertyKind`].

mod kind;

use std::fmt::{self, Display};

use crate::parameter::{Parameter, ParameterKind};
use crate::syntax::ParseError;
use crate::syntax::lexer::tokenize;
use crate::syntax::scanner::{ContentLine, scan_content_lines};
use crate::value::{Temporal, Value, ValueType, parse_with, value_geo};

pub use crate::property::kind::{Occurrence, PropertyKind};

/// Name of a property, known to RFC 5545 or an extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyName {
    /// A property defined in RFC 5545
    Known(PropertyKind),

    /// Experimental `X-` or unknown IANA property, name as written
    Other(String),
}

impl PropertyName {
    /// Resolve a property name, ignoring ASCII case for known names.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        name.parse::<PropertyKind>()
            .map_or_else(|()| Self::Other(name.to_owned()), Self::Known)
    }

    /// The kind of a known property.
    #[must_use]
    pub const fn kind(&self) -> Option<PropertyKind> {
        match self {
            Self::Known(kind) => Some(*kind),
            Self::Other(_) => None,
        }
    }

    /// The name text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(kind) => kind.name(),
            Self::Other(name) => name,
        }
    }
}

impl Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PropertyKind> for PropertyName {
    fn from(kind: PropertyKind) -> Self {
        Self::Known(kind)
    }
}

/// A property value that does not match its value type.
///
/// The raw text is kept so the property serializes as it was read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {property} value {raw_text:?}: {reason}")]
pub struct ValueParseError {
    /// Property name
    pub property: String,
    /// Value text as found in the content line
    pub raw_text: String,
    /// Description of the problem
    pub reason: String,
}

/// A parameter attached twice to the same property.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate parameter {name}")]
pub struct DuplicateParameterError {
    /// Parameter name
    pub name: String,
}

/// A property with its parameters and typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    name: PropertyName,
    parameters: Vec<Parameter>,
    value: Value,
    error: Option<ValueParseError>,
}

impl Property {
    /// Create a property of a known kind.
    ///
    /// `VALUE` and `TZID` parameters follow the form of temporal values.
    #[must_use]
    pub fn new(kind: PropertyKind, value: Value) -> Self {
        Self::with_name(PropertyName::Known(kind), value)
    }

    /// Create a property with any name.
    #[must_use]
    pub fn with_name(name: PropertyName, value: Value) -> Self {
        let mut property = Self {
            name,
            parameters: Vec::new(),
            value,
            error: None,
        };
        property.sync_value_parameters();
        property
    }

    /// Create a property holding one DATE or DATE-TIME.
    #[must_use]
    pub fn temporal(kind: PropertyKind, value: Temporal) -> Self {
        Self::new(kind, Value::Temporal(value))
    }

    /// Create a TEXT property.
    #[must_use]
    pub fn text(kind: PropertyKind, text: impl Into<String>) -> Self {
        Self::new(kind, Value::Text(text.into()))
    }

    /// Build a property from a scanned content line.
    ///
    /// A value that does not parse is kept as raw text with a
    /// [`ValueParseError`]. Parameter problems are returned next to the
    /// property: a duplicate parameter is dropped, a known parameter with an
    /// invalid value is kept verbatim.
    #[must_use]
    pub fn from_content_line(line: &ContentLine) -> (Self, Vec<ParseError>) {
        let mut errors = Vec::new();
        let mut parameters: Vec<Parameter> = Vec::with_capacity(line.parameters.len());
        for scanned in &line.parameters {
            if parameters.iter().any(|p| p.is_named(&scanned.name)) {
                errors.push(ParseError::DuplicateParameter {
                    name: scanned.name.clone(),
                    span: scanned.span.clone(),
                });
                continue;
            }

            let values: Vec<_> = scanned.values.iter().map(|v| v.value.clone()).collect();
            let parameter = Parameter::parse(&scanned.name, values.clone()).unwrap_or_else(|reason| {
                errors.push(ParseError::InvalidParameterValue {
                    reason,
                    span: scanned.span.clone(),
                });
                Parameter::Other {
                    name: scanned.name.clone(),
                    values,
                }
            });
            parameters.push(parameter);
        }

        let mut property = Self {
            name: PropertyName::parse(&line.name),
            parameters,
            value: Value::Raw(String::new()),
            error: None,
        };
        match property.parse_value(&line.value) {
            Ok(value) => property.value = value,
            Err(reason) => {
                tracing::debug!(property = %property.name, %reason, "keeping raw property value");
                property.value = Value::Raw(line.value.clone());
                property.error = Some(ValueParseError {
                    property: property.name.to_string(),
                    raw_text: line.value.clone(),
                    reason,
                });
            }
        }
        (property, errors)
    }

    fn parse_value(&self, text: &str) -> Result<Value, String> {
        let Some(kind) = self.kind() else {
            return Ok(Value::Raw(text.to_owned()));
        };

        let value_type = self
            .value_type()
            .unwrap_or_else(|| kind.default_value_type());
        if !kind.value_types().contains(&value_type) {
            return Err(format!("value type {value_type} is not allowed for {kind}"));
        }

        match kind {
            PropertyKind::Geo => parse_with(value_geo(), text).map(Value::Geo),
            // structured text, kept as written
            PropertyKind::RequestStatus => Ok(Value::Raw(text.to_owned())),
            _ => Value::parse(text, value_type, self.tzid(), kind.is_list()),
        }
    }

    /// The property name.
    #[must_use]
    pub const fn name(&self) -> &PropertyName {
        &self.name
    }

    /// The kind of a known property.
    #[must_use]
    pub const fn kind(&self) -> Option<PropertyKind> {
        self.name.kind()
    }

    /// Whether this property is of the given kind.
    #[must_use]
    pub fn is(&self, kind: PropertyKind) -> bool {
        self.kind() == Some(kind)
    }

    /// The typed value, raw text when parsing failed.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// The value parse error, if the value did not match its type.
    #[must_use]
    pub const fn error(&self) -> Option<&ValueParseError> {
        self.error.as_ref()
    }

    /// The single temporal value of a well-formed property.
    #[must_use]
    pub fn as_temporal(&self) -> Option<&Temporal> {
        match self.error {
            Some(_) => None,
            None => self.value.as_temporal(),
        }
    }

    /// Replace the value, clearing any parse error.
    ///
    /// `VALUE` and `TZID` parameters follow the form of temporal values.
    pub fn set_value(&mut self, value: Value) {
        self.value = value;
        self.error = None;
        self.sync_value_parameters();
    }

    /// Parameters in insertion order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Look up a parameter by name, ignoring ASCII case.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.is_named(name))
    }

    /// The `TZID` parameter.
    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        self.parameters.iter().find_map(|p| match p {
            Parameter::TimeZoneIdentifier(tzid) => Some(tzid.as_str()),
            _ => None,
        })
    }

    /// The explicit `VALUE` parameter.
    #[must_use]
    pub fn value_type(&self) -> Option<ValueType> {
        self.parameters.iter().find_map(|p| match p {
            Parameter::ValueType(value_type) => Some(*value_type),
            _ => None,
        })
    }

    /// Attach a parameter.
    ///
    /// # Errors
    ///
    /// Fails when a parameter with the same name is already attached.
    pub fn add_parameter(&mut self, parameter: Parameter) -> Result<(), DuplicateParameterError> {
        if self.parameter(parameter.name()).is_some() {
            return Err(DuplicateParameterError {
                name: parameter.name().to_owned(),
            });
        }
        self.parameters.push(parameter);
        Ok(())
    }

    /// Attach a parameter, builder style.
    ///
    /// # Errors
    ///
    /// Fails when a parameter with the same name is already attached.
    pub fn with_parameter(mut self, parameter: Parameter) -> Result<Self, DuplicateParameterError> {
        self.add_parameter(parameter)?;
        Ok(self)
    }

    /// Attach a parameter, replacing one with the same name in place.
    pub fn set_parameter(&mut self, parameter: Parameter) {
        match self.parameters.iter_mut().find(|p| p.is_named(parameter.name())) {
            Some(existing) => *existing = parameter,
            None => self.parameters.push(parameter),
        }
    }

    /// Detach a parameter by name.
    pub fn remove_parameter(&mut self, name: &str) -> Option<Parameter> {
        let pos = self.parameters.iter().position(|p| p.is_named(name))?;
        Some(self.parameters.remove(pos))
    }

    /// Keep `VALUE` and `TZID` consistent with a temporal value.
    fn sync_value_parameters(&mut self) {
        let (value_type, tzid) = match &self.value {
            Value::Temporal(t) => temporal_parameters(t),
            Value::Temporals(list) => match list.first() {
                Some(t) => temporal_parameters(t),
                None => return,
            },
            Value::Periods(list) => match list.first() {
                Some(p) => (ValueType::Period, p.start.tzid().map(str::to_owned)),
                None => return,
            },
            _ => return,
        };

        let default = self
            .kind()
            .map_or(ValueType::DateTime, PropertyKind::default_value_type);
        if value_type == default {
            self.remove_parameter(ParameterKind::ValueType.name());
        } else {
            self.set_parameter(Parameter::ValueType(value_type));
        }

        match tzid {
            Some(tzid) => self.set_parameter(Parameter::TimeZoneIdentifier(tzid)),
            None => {
                self.remove_parameter(ParameterKind::TimeZoneIdentifier.name());
            }
        }
    }
}

fn temporal_parameters(t: &Temporal) -> (ValueType, Option<String>) {
    let value_type = if t.is_date() {
        ValueType::Date
    } else {
        ValueType::DateTime
    };
    (value_type, t.tzid().map(str::to_owned))
}

impl Display for Property {
    /// Writes the unfolded content line, without the line break.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for parameter in &self.parameters {
            write!(f, ";{parameter}")?;
        }
        write!(f, ":{}", self.value)
    }
}

/// Parse a single, possibly folded, content line into a property.
///
/// A value that does not match its type is not an error here, see
/// [`Property::error`].
///
/// # Errors
///
/// Returns the first syntax or parameter problem of the line.
pub fn parse_content_line(line: &str) -> Result<Property, ParseError> {
    let mut lines = scan_content_lines(tokenize(line)).into_iter();
    let Some(content) = lines.next() else {
        return Err(ParseError::Empty);
    };
    if let Some(extra) = lines.next() {
        return Err(ParseError::TrailingData { span: extra.span });
    }
    if let Some(error) = content.error {
        return Err(error);
    }

    let (property, errors) = Property::from_content_line(&content);
    errors.into_iter().next().map_or(Ok(property), Err)
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::value::RecurrenceFrequency;

    #[test]
    fn parses_zoned_date_time() {
        let property = parse_content_line("DTSTART;TZID=America/New_York:20250101T090000").unwrap();
        assert!(property.is(PropertyKind::DtStart));
        assert_eq!(
            property.as_temporal(),
            Some(&Temporal::Zoned {
                datetime: date(2025, 1, 1).at(9, 0, 0, 0),
                tzid: "America/New_York".to_owned(),
            })
        );
        assert_eq!(
            property.to_string(),
            "DTSTART;TZID=America/New_York:20250101T090000"
        );
    }

    #[test]
    fn parses_dates_with_and_without_value_parameter() {
        for src in ["DTSTART;VALUE=DATE:20250101", "DTSTART:20250101"] {
            let property = parse_content_line(src).unwrap();
            assert_eq!(
                property.as_temporal(),
                Some(&Temporal::Date(date(2025, 1, 1))),
                "{src}"
            );
        }
    }

    #[test]
    fn parses_list_values() {
        let exdate = parse_content_line("EXDATE:20250101T090000Z,20250102T090000Z").unwrap();
        assert_eq!(exdate.value().temporals().len(), 2);

        let categories = parse_content_line(r"CATEGORIES:WORK,FUN\,TOO").unwrap();
        assert_eq!(
            categories.value(),
            &Value::TextList(vec!["WORK".to_owned(), "FUN,TOO".to_owned()])
        );

        let rdate = parse_content_line("RDATE;VALUE=PERIOD:19960403T020000Z/19960403T040000Z").unwrap();
        assert!(matches!(rdate.value(), Value::Periods(list) if list.len() == 1));
    }

    #[test]
    fn parses_rrule_and_geo() {
        let rrule = parse_content_line("RRULE:FREQ=WEEKLY;COUNT=10").unwrap();
        assert!(matches!(rrule.value(), Value::Recur(rule) if rule.freq == RecurrenceFrequency::Weekly));

        let geo = parse_content_line("GEO:37.386013;-122.082932").unwrap();
        assert!(matches!(geo.value(), Value::Geo(_)));
        assert_eq!(geo.to_string(), "GEO:37.386013;-122.082932");
    }

    #[test]
    fn keeps_raw_text_of_invalid_values() {
        let property = parse_content_line("DTSTART:2025-01-01").unwrap();
        let error = property.error().unwrap();
        assert_eq!(error.property, "DTSTART");
        assert_eq!(error.raw_text, "2025-01-01");
        assert_eq!(property.value(), &Value::Raw("2025-01-01".to_owned()));
        assert_eq!(property.to_string(), "DTSTART:2025-01-01");

        let disallowed = parse_content_line("SUMMARY;VALUE=INTEGER:1").unwrap();
        assert!(disallowed.error().is_some());
    }

    #[test]
    fn keeps_extension_properties_verbatim() {
        let src = r"X-WR-CALNAME;X-FOO=bar:My\, Calendar";
        let property = parse_content_line(src).unwrap();
        assert_eq!(property.name(), &PropertyName::Other("X-WR-CALNAME".to_owned()));
        assert_eq!(property.value(), &Value::Raw(r"My\, Calendar".to_owned()));
        assert_eq!(property.to_string(), src);
    }

    #[test]
    fn rejects_malformed_lines() {
        #[rustfmt::skip]
        let fail_cases = [
            "DTSTART 20250101",                     // missing colon
            ":20250101",                            // missing name
            "DTSTART;TZID=A;TZID=B:20250101T000000", // duplicate parameter
            "ATTENDEE;RSVP=maybe:mailto:a@b.c",     // invalid parameter value
            "SUMMARY:a\r\nSUMMARY:b",               // two lines
            "",
        ];
        for src in fail_cases {
            assert!(parse_content_line(src).is_err(), "Parse {src:?} should fail");
        }
    }

    #[test]
    fn unfolds_before_parsing() {
        let property = parse_content_line("DESCRIPTION:Hello\r\n  World").unwrap();
        assert_eq!(property.value(), &Value::Text("Hello World".to_owned()));
    }

    #[test]
    fn manages_parameters() {
        let mut property = Property::text(PropertyKind::Summary, "Lunch");
        property
            .add_parameter(Parameter::Language("en".to_owned()))
            .unwrap();
        assert_eq!(
            property.add_parameter(Parameter::Language("de".to_owned())),
            Err(DuplicateParameterError {
                name: "LANGUAGE".to_owned()
            })
        );
        assert_eq!(property.to_string(), "SUMMARY;LANGUAGE=en:Lunch");
        assert!(property.remove_parameter("language").is_some());
        assert!(property.parameters().is_empty());
    }

    #[test]
    fn syncs_temporal_parameters() {
        let mut property = Property::temporal(
            PropertyKind::DtStart,
            Temporal::Zoned {
                datetime: date(2025, 3, 1).at(8, 0, 0, 0),
                tzid: "Europe/Berlin".to_owned(),
            },
        );
        assert_eq!(property.to_string(), "DTSTART;TZID=Europe/Berlin:20250301T080000");

        property.set_value(Value::Temporal(Temporal::Date(date(2025, 3, 1))));
        assert_eq!(property.to_string(), "DTSTART;VALUE=DATE:20250301");

        property.set_value(Value::Temporal(Temporal::Utc(date(2025, 3, 1).at(8, 0, 0, 0))));
        assert_eq!(property.to_string(), "DTSTART:20250301T080000Z");
    }
}
