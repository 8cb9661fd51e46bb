// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Property parameters as defined in RFC 5545 Section 3.2.

mod kind;

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::keyword::{
    KW_CUTYPE_GROUP, KW_CUTYPE_INDIVIDUAL, KW_CUTYPE_RESOURCE, KW_CUTYPE_ROOM, KW_CUTYPE_UNKNOWN,
    KW_ENCODING_8BIT, KW_ENCODING_BASE64, KW_FALSE, KW_FBTYPE_BUSY, KW_FBTYPE_BUSY_TENTATIVE,
    KW_FBTYPE_BUSY_UNAVAILABLE, KW_FBTYPE_FREE, KW_PARTSTAT_ACCEPTED, KW_PARTSTAT_COMPLETED,
    KW_PARTSTAT_DECLINED, KW_PARTSTAT_DELEGATED, KW_PARTSTAT_IN_PROCESS, KW_PARTSTAT_NEEDS_ACTION,
    KW_PARTSTAT_TENTATIVE, KW_RANGE_THISANDFUTURE, KW_RELATED_END, KW_RELATED_START,
    KW_RELTYPE_CHILD, KW_RELTYPE_PARENT, KW_RELTYPE_SIBLING, KW_ROLE_CHAIR,
    KW_ROLE_NON_PARTICIPANT, KW_ROLE_OPT_PARTICIPANT, KW_ROLE_REQ_PARTICIPANT, KW_TRUE,
};
use crate::value::ValueType;

pub use crate::parameter::kind::ParameterKind;

macro_rules! define_param_enum {
    (
        $(#[$meta:meta])*
        enum $Name:ident {
            $(
                $(#[$vmeta:meta])*
                $Variant:ident => $kw:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[allow(missing_docs)]
        pub enum $Name {
            $(
                $(#[$vmeta])*
                $Variant,
            )*
        }

        impl FromStr for $Name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($kw) {
                        return Ok(Self::$Variant);
                    }
                )*
                Err(())
            }
        }

        impl Display for $Name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(
                        Self::$Variant => $kw.fmt(f),
                    )*
                }
            }
        }
    };
}

macro_rules! define_param_enum_with_other {
    (
        $(#[$meta:meta])*
        enum $Name:ident {
            $(
                $(#[$vmeta:meta])*
                $Variant:ident => $kw:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        #[allow(missing_docs)]
        pub enum $Name {
            $(
                $(#[$vmeta])*
                $Variant,
            )*
            /// Experimental `X-` value or an IANA registered value unknown here
            Other(String),
        }

        impl From<&str> for $Name {
            fn from(s: &str) -> Self {
                $(
                    if s.eq_ignore_ascii_case($kw) {
                        return Self::$Variant;
                    }
                )*
                Self::Other(s.to_owned())
            }
        }

        impl Display for $Name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(
                        Self::$Variant => $kw.fmt(f),
                    )*
                    Self::Other(s) => s.fmt(f),
                }
            }
        }
    };
}

define_param_enum_with_other! {
    /// Calendar user type, RFC 5545 Section 3.2.3
    enum CalendarUserType {
        Individual => KW_CUTYPE_INDIVIDUAL,
        Group      => KW_CUTYPE_GROUP,
        Resource   => KW_CUTYPE_RESOURCE,
        Room       => KW_CUTYPE_ROOM,
        Unknown    => KW_CUTYPE_UNKNOWN,
    }
}

define_param_enum! {
    /// Inline encoding, RFC 5545 Section 3.2.7
    enum Encoding {
        Bit8   => KW_ENCODING_8BIT,
        Base64 => KW_ENCODING_BASE64,
    }
}

define_param_enum_with_other! {
    /// Free/busy time type, RFC 5545 Section 3.2.9
    enum FreeBusyType {
        Free            => KW_FBTYPE_FREE,
        Busy            => KW_FBTYPE_BUSY,
        BusyUnavailable => KW_FBTYPE_BUSY_UNAVAILABLE,
        BusyTentative   => KW_FBTYPE_BUSY_TENTATIVE,
    }
}

define_param_enum_with_other! {
    /// Participation status, RFC 5545 Section 3.2.12
    enum ParticipationStatus {
        NeedsAction => KW_PARTSTAT_NEEDS_ACTION,
        Accepted    => KW_PARTSTAT_ACCEPTED,
        Declined    => KW_PARTSTAT_DECLINED,
        Tentative   => KW_PARTSTAT_TENTATIVE,
        Delegated   => KW_PARTSTAT_DELEGATED,
        Completed   => KW_PARTSTAT_COMPLETED,
        InProcess   => KW_PARTSTAT_IN_PROCESS,
    }
}

define_param_enum! {
    /// Recurrence identifier range, RFC 5545 Section 3.2.13
    enum RecurrenceIdRange {
        ThisAndFuture => KW_RANGE_THISANDFUTURE,
    }
}

define_param_enum! {
    /// Alarm trigger relationship, RFC 5545 Section 3.2.14
    enum AlarmTriggerRelationship {
        Start => KW_RELATED_START,
        End   => KW_RELATED_END,
    }
}

define_param_enum_with_other! {
    /// Relationship type, RFC 5545 Section 3.2.15
    enum RelationshipType {
        Parent  => KW_RELTYPE_PARENT,
        Child   => KW_RELTYPE_CHILD,
        Sibling => KW_RELTYPE_SIBLING,
    }
}

define_param_enum_with_other! {
    /// Participation role, RFC 5545 Section 3.2.16
    enum ParticipationRole {
        Chair          => KW_ROLE_CHAIR,
        ReqParticipant => KW_ROLE_REQ_PARTICIPANT,
        OptParticipant => KW_ROLE_OPT_PARTICIPANT,
        NonParticipant => KW_ROLE_NON_PARTICIPANT,
    }
}

/// A typed property parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    /// `ALTREP`, alternate text representation URI
    AlternateText(String),

    /// `CN`, common name
    CommonName(String),

    /// `CUTYPE`
    CalendarUserType(CalendarUserType),

    /// `DELEGATED-FROM`, calendar user addresses
    Delegators(Vec<String>),

    /// `DELEGATED-TO`, calendar user addresses
    Delegatees(Vec<String>),

    /// `DIR`, directory entry reference URI
    Directory(String),

    /// `ENCODING`
    Encoding(Encoding),

    /// `FMTTYPE`, media type
    FormatType(String),

    /// `FBTYPE`
    FreeBusyType(FreeBusyType),

    /// `LANGUAGE`, language tag
    Language(String),

    /// `MEMBER`, group or list addresses
    Members(Vec<String>),

    /// `PARTSTAT`
    ParticipationStatus(ParticipationStatus),

    /// `RANGE`
    RecurrenceIdRange(RecurrenceIdRange),

    /// `RELATED`
    AlarmTriggerRelationship(AlarmTriggerRelationship),

    /// `RELTYPE`
    RelationshipType(RelationshipType),

    /// `ROLE`
    ParticipationRole(ParticipationRole),

    /// `RSVP`
    Rsvp(bool),

    /// `SENT-BY`, calendar user address
    SentBy(String),

    /// `TZID`, time zone identifier
    TimeZoneIdentifier(String),

    /// `VALUE`, value data type of the property
    ValueType(ValueType),

    /// Experimental `X-` or unknown IANA parameter, kept verbatim
    Other {
        /// Parameter name as written
        name: String,
        /// Parameter values
        values: Vec<String>,
    },
}

impl Parameter {
    /// Build a typed parameter from its name and values.
    ///
    /// Unknown names become [`Parameter::Other`].
    ///
    /// # Errors
    ///
    /// Returns a description of the problem when a known parameter gets a
    /// value it does not accept or more values than it takes.
    pub fn parse(name: &str, mut values: Vec<String>) -> Result<Self, String> {
        let Ok(kind) = name.parse::<ParameterKind>() else {
            return Ok(Self::Other {
                name: name.to_owned(),
                values,
            });
        };

        if kind.is_list() {
            return Ok(match kind {
                ParameterKind::Delegators => Self::Delegators(values),
                ParameterKind::Delegatees => Self::Delegatees(values),
                _ => Self::Members(values),
            });
        }

        let value = match (values.pop(), values.is_empty()) {
            (Some(value), true) => value,
            (Some(_), false) => return Err(format!("parameter {kind} takes a single value")),
            (None, _) => return Err(format!("parameter {kind} needs a value")),
        };

        let invalid = || format!("invalid value {value} for parameter {kind}");
        Ok(match kind {
            ParameterKind::AlternateText => Self::AlternateText(value),
            ParameterKind::CommonName => Self::CommonName(value),
            ParameterKind::CalendarUserType => Self::CalendarUserType(value.as_str().into()),
            ParameterKind::Directory => Self::Directory(value),
            ParameterKind::Encoding => Self::Encoding(value.parse().map_err(|()| invalid())?),
            ParameterKind::FormatType => Self::FormatType(value),
            ParameterKind::FreeBusyType => Self::FreeBusyType(value.as_str().into()),
            ParameterKind::Language => Self::Language(value),
            ParameterKind::ParticipationStatus => Self::ParticipationStatus(value.as_str().into()),
            ParameterKind::RecurrenceIdRange => {
                Self::RecurrenceIdRange(value.parse().map_err(|()| invalid())?)
            }
            ParameterKind::AlarmTriggerRelationship => {
                Self::AlarmTriggerRelationship(value.parse().map_err(|()| invalid())?)
            }
            ParameterKind::RelationshipType => Self::RelationshipType(value.as_str().into()),
            ParameterKind::ParticipationRole => Self::ParticipationRole(value.as_str().into()),
            ParameterKind::Rsvp if value.eq_ignore_ascii_case(KW_TRUE) => Self::Rsvp(true),
            ParameterKind::Rsvp if value.eq_ignore_ascii_case(KW_FALSE) => Self::Rsvp(false),
            ParameterKind::Rsvp => return Err(invalid()),
            ParameterKind::SentBy => Self::SentBy(value),
            ParameterKind::TimeZoneIdentifier => Self::TimeZoneIdentifier(value),
            ParameterKind::ValueType => Self::ValueType(value.parse().map_err(|_| invalid())?),
            ParameterKind::Delegators => Self::Delegators(vec![value]),
            ParameterKind::Delegatees => Self::Delegatees(vec![value]),
            ParameterKind::Members => Self::Members(vec![value]),
        })
    }

    /// The kind of this parameter, `None` for extension parameters.
    #[must_use]
    pub const fn kind(&self) -> Option<ParameterKind> {
        Some(match self {
            Self::AlternateText(_) => ParameterKind::AlternateText,
            Self::CommonName(_) => ParameterKind::CommonName,
            Self::CalendarUserType(_) => ParameterKind::CalendarUserType,
            Self::Delegators(_) => ParameterKind::Delegators,
            Self::Delegatees(_) => ParameterKind::Delegatees,
            Self::Directory(_) => ParameterKind::Directory,
            Self::Encoding(_) => ParameterKind::Encoding,
            Self::FormatType(_) => ParameterKind::FormatType,
            Self::FreeBusyType(_) => ParameterKind::FreeBusyType,
            Self::Language(_) => ParameterKind::Language,
            Self::Members(_) => ParameterKind::Members,
            Self::ParticipationStatus(_) => ParameterKind::ParticipationStatus,
            Self::RecurrenceIdRange(_) => ParameterKind::RecurrenceIdRange,
            Self::AlarmTriggerRelationship(_) => ParameterKind::AlarmTriggerRelationship,
            Self::RelationshipType(_) => ParameterKind::RelationshipType,
            Self::ParticipationRole(_) => ParameterKind::ParticipationRole,
            Self::Rsvp(_) => ParameterKind::Rsvp,
            Self::SentBy(_) => ParameterKind::SentBy,
            Self::TimeZoneIdentifier(_) => ParameterKind::TimeZoneIdentifier,
            Self::ValueType(_) => ParameterKind::ValueType,
            Self::Other { .. } => return None,
        })
    }

    /// The parameter name as written.
    #[must_use]
    pub fn name(&self) -> &str {
        match (self.kind(), self) {
            (Some(kind), _) => kind.name(),
            (None, Self::Other { name, .. }) => name,
            (None, _) => "",
        }
    }

    /// Whether this parameter has the given name, ignoring ASCII case.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name().eq_ignore_ascii_case(name)
    }

    /// The values of this parameter as text.
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        match self {
            Self::AlternateText(s)
            | Self::CommonName(s)
            | Self::Directory(s)
            | Self::FormatType(s)
            | Self::Language(s)
            | Self::SentBy(s)
            | Self::TimeZoneIdentifier(s) => vec![s.clone()],
            Self::Delegators(list) | Self::Delegatees(list) | Self::Members(list) => list.clone(),
            Self::Other { values, .. } => values.clone(),
            Self::CalendarUserType(v) => vec![v.to_string()],
            Self::Encoding(v) => vec![v.to_string()],
            Self::FreeBusyType(v) => vec![v.to_string()],
            Self::ParticipationStatus(v) => vec![v.to_string()],
            Self::RecurrenceIdRange(v) => vec![v.to_string()],
            Self::AlarmTriggerRelationship(v) => vec![v.to_string()],
            Self::RelationshipType(v) => vec![v.to_string()],
            Self::ParticipationRole(v) => vec![v.to_string()],
            Self::Rsvp(true) => vec![KW_TRUE.to_owned()],
            Self::Rsvp(false) => vec![KW_FALSE.to_owned()],
            Self::ValueType(v) => vec![v.to_string()],
        }
    }
}

impl Display for Parameter {
    /// Writes `NAME=value[,value]`, quoting where needed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let always_quote = self.kind().is_some_and(ParameterKind::is_uri);
        write!(f, "{}=", self.name())?;
        for (i, value) in self.values().iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }

            // DQUOTE cannot be represented in a parameter value
            let value = value.replace('"', "");
            if always_quote || value.contains([':', ';', ',']) {
                write!(f, "\"{value}\"")?;
            } else {
                f.write_str(&value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(name: &str, values: &[&str]) -> Result<Parameter, String> {
        Parameter::parse(name, values.iter().map(|&v| v.to_owned()).collect())
    }

    #[test]
    fn parses_typed_parameters() {
        assert_eq!(
            parse("TZID", &["America/New_York"]),
            Ok(Parameter::TimeZoneIdentifier("America/New_York".to_owned()))
        );
        assert_eq!(
            parse("partstat", &["accepted"]),
            Ok(Parameter::ParticipationStatus(ParticipationStatus::Accepted))
        );
        assert_eq!(
            parse("CUTYPE", &["X-ROBOT"]),
            Ok(Parameter::CalendarUserType(CalendarUserType::Other(
                "X-ROBOT".to_owned()
            )))
        );
        assert_eq!(parse("RSVP", &["TRUE"]), Ok(Parameter::Rsvp(true)));
        assert_eq!(parse("VALUE", &["DATE"]), Ok(Parameter::ValueType(ValueType::Date)));
        assert_eq!(
            parse("MEMBER", &["mailto:a@example.com", "mailto:b@example.com"])
                .map(|p| p.values().len()),
            Ok(2)
        );
        assert_eq!(
            parse("X-FOO", &["a", "b"]),
            Ok(Parameter::Other {
                name: "X-FOO".to_owned(),
                values: vec!["a".to_owned(), "b".to_owned()],
            })
        );
    }

    #[test]
    fn rejects_invalid_values() {
        #[rustfmt::skip]
        let fail_cases: [(&str, &[&str]); 5] = [
            ("ENCODING", &["QUOTED-PRINTABLE"]),
            ("RANGE",    &["THISANDPRIOR"]),
            ("RSVP",     &["maybe"]),
            ("VALUE",    &["DATETIME"]),
            ("TZID",     &["A", "B"]),
        ];
        for (name, values) in fail_cases {
            assert!(parse(name, values).is_err(), "Parse {name}={values:?} should fail");
        }
    }

    #[test]
    fn quotes_values_on_display() {
        #[rustfmt::skip]
        let cases = [
            (Parameter::TimeZoneIdentifier("Europe/Berlin".to_owned()), "TZID=Europe/Berlin"),
            (Parameter::CommonName("Doe; John".to_owned()),             "CN=\"Doe; John\""),
            (Parameter::CommonName("Say \"hi\"".to_owned()),            "CN=Say hi"),
            (Parameter::SentBy("mailto:a@example.com".to_owned()),      "SENT-BY=\"mailto:a@example.com\""),
            (Parameter::Directory("ldap".to_owned()),                   "DIR=\"ldap\""),
            (Parameter::Rsvp(false),                                    "RSVP=FALSE"),
            (
                Parameter::Delegatees(vec!["mailto:a@x".to_owned(), "mailto:b@x".to_owned()]),
                "DELEGATED-TO=\"mailto:a@x\",\"mailto:b@x\"",
            ),
        ];
        for (param, expected) in cases {
            assert_eq!(param.to_string(), expected);
        }
    }
}
