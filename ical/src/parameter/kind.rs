// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use crate::keyword::{
    KW_ALTREP, KW_CN, KW_CUTYPE, KW_DELEGATED_FROM, KW_DELEGATED_TO, KW_DIR, KW_ENCODING,
    KW_FBTYPE, KW_FMTTYPE, KW_LANGUAGE, KW_MEMBER, KW_PARTSTAT, KW_RANGE, KW_RELATED, KW_RELTYPE,
    KW_ROLE, KW_RSVP, KW_SENT_BY, KW_TZID, KW_VALUE,
};

macro_rules! impl_parameter_kind_mapping {
    (
        $(#[$attr:meta])*
        enum $ty:ident {
            $(
                $variant:ident => $kw:ident
            ),+ $(,)?
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $(#[$attr])*
        pub enum $ty {
            $(
                $variant,
            )+
        }

        impl $ty {
            /// Returns the name keyword for the parameter type
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(
                        Self::$variant => $kw,
                    )+
                }
            }
        }

        impl FromStr for $ty {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($kw) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(())
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.name().fmt(f)
            }
        }
    };
}

impl_parameter_kind_mapping! {
    /// Kinds of iCalendar parameters
    #[expect(missing_docs)]
    enum ParameterKind {
        AlternateText            => KW_ALTREP,
        CommonName               => KW_CN,
        CalendarUserType         => KW_CUTYPE,
        Delegators               => KW_DELEGATED_FROM,
        Delegatees               => KW_DELEGATED_TO,
        Directory                => KW_DIR,
        Encoding                 => KW_ENCODING,
        FormatType               => KW_FMTTYPE,
        FreeBusyType             => KW_FBTYPE,
        Language                 => KW_LANGUAGE,
        Members                  => KW_MEMBER,
        ParticipationStatus      => KW_PARTSTAT,
        RecurrenceIdRange        => KW_RANGE,
        AlarmTriggerRelationship => KW_RELATED,
        RelationshipType         => KW_RELTYPE,
        ParticipationRole        => KW_ROLE,
        Rsvp                     => KW_RSVP,
        SentBy                   => KW_SENT_BY,
        TimeZoneIdentifier       => KW_TZID,
        ValueType                => KW_VALUE,
    }
}

impl ParameterKind {
    /// Parameters whose values are URIs or calendar user addresses, always
    /// written quoted.
    #[must_use]
    pub const fn is_uri(self) -> bool {
        matches!(
            self,
            Self::AlternateText
                | Self::Directory
                | Self::SentBy
                | Self::Delegators
                | Self::Delegatees
                | Self::Members
        )
    }

    /// Parameters that take a comma separated list of values.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::Delegators | Self::Delegatees | Self::Members)
    }
}
