// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Property kinds and their static table of value types and cardinality.
//!
//! This module defines the `PropertyKind` enum that represents all standard
//! iCalendar properties defined in RFC 5545, along with their allowed value
//! types. The first listed value type is the default one.

use std::fmt;
use std::str::FromStr;

use crate::keyword::{
    KW_ACTION, KW_ATTACH, KW_ATTENDEE, KW_CALSCALE, KW_CATEGORIES, KW_CLASS, KW_COMMENT,
    KW_COMPLETED, KW_CONTACT, KW_CREATED, KW_DESCRIPTION, KW_DTEND, KW_DTSTAMP, KW_DTSTART, KW_DUE,
    KW_DURATION, KW_EXDATE, KW_FREEBUSY, KW_GEO, KW_LAST_MODIFIED, KW_LOCATION, KW_METHOD,
    KW_ORGANIZER, KW_PERCENT_COMPLETE, KW_PRIORITY, KW_PRODID, KW_RDATE, KW_RECURRENCE_ID,
    KW_RELATED_TO, KW_REPEAT, KW_REQUEST_STATUS, KW_RESOURCES, KW_RRULE, KW_SEQUENCE, KW_STATUS,
    KW_SUMMARY, KW_TRANSP, KW_TRIGGER, KW_TZID, KW_TZNAME, KW_TZOFFSETFROM, KW_TZOFFSETTO,
    KW_TZURL, KW_UID, KW_URL, KW_VERSION,
};
use crate::value::ValueType;

/// How often a property may appear in a component and whether one line
/// carries a comma separated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    /// At most once
    Once,
    /// Any number of times
    Many,
    /// Any number of times, each line holding a list of values
    ManyList,
}

/// Macro to define `PropertyKind` with associated value types.
///
/// Usage: `property_kind!(Variant => KW => &[...], Occurrence, ...)`
macro_rules! property_kind {
    (
        $(
            $(#[$attr:meta])*
            $variant:ident => $kw:ident => $value_types:expr, $occurrence:ident $(,)?
        )*
    ) => {
        /// Kind of iCalendar property.
        /// Represents all standard properties defined in RFC 5545.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[expect(missing_docs)]
        pub enum PropertyKind {
            $(
                $(#[$attr])*
                $variant,
            )*
        }

        impl PropertyKind {
            /// Returns the name keyword of the property.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $kw,)*
                }
            }

            /// Returns the allowed value types, the default one first.
            #[must_use]
            pub const fn value_types(self) -> &'static [ValueType] {
                match self {
                    $(Self::$variant => $value_types,)*
                }
            }

            /// Returns how often the property may appear.
            #[must_use]
            pub const fn occurrence(self) -> Occurrence {
                match self {
                    $(Self::$variant => Occurrence::$occurrence,)*
                }
            }
        }

        impl FromStr for PropertyKind {
            type Err = ();

            /// Property names are case-insensitive per RFC 5545
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($kw) {
                        return Ok(Self::$variant);
                    }
                )*
                Err(())
            }
        }

        #[cfg(test)]
        const KINDS: &[PropertyKind] = &[
            $(
                PropertyKind::$variant,
            )*
        ];
    };
}

impl PropertyKind {
    /// The value type used when no `VALUE` parameter is given.
    #[must_use]
    pub const fn default_value_type(self) -> ValueType {
        match self.value_types().first() {
            Some(value_type) => *value_type,
            None => ValueType::Text,
        }
    }

    /// Whether one content line carries a comma separated list of values.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self.occurrence(), Occurrence::ManyList)
    }

    /// Whether the property may appear more than once in a component.
    #[must_use]
    pub const fn is_repeatable(self) -> bool {
        !matches!(self.occurrence(), Occurrence::Once)
    }

    /// Whether the value is a DATE or DATE-TIME that shares the form of the
    /// DTSTART in the same component.
    ///
    /// RECURRENCE-ID is not one of them: it follows the DTSTART of the series.
    #[must_use]
    pub const fn is_temporal(self) -> bool {
        matches!(
            self,
            Self::DtStart | Self::DtEnd | Self::Due | Self::ExDate | Self::RDate
        )
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

// Define PropertyKind with all RFC 5545 properties and their value types
property_kind! {
    // 3.7.1.  Calendar Scale
    CalScale    => KW_CALSCALE  => &[ValueType::Text], Once,
    // 3.7.2.  Method
    Method      => KW_METHOD    => &[ValueType::Text], Once,
    // 3.7.3.  Product Identifier
    ProdId      => KW_PRODID    => &[ValueType::Text], Once,
    // 3.7.4.  Version
    Version     => KW_VERSION   => &[ValueType::Text], Once,
    // 3.8.1.1.  Attachment
    Attach      => KW_ATTACH    => &[ValueType::Uri, ValueType::Binary], Many,
    // 3.8.1.2.  Categories
    Categories  => KW_CATEGORIES => &[ValueType::Text], ManyList,
    // 3.8.1.3.  Classification
    Class       => KW_CLASS     => &[ValueType::Text], Once,
    // 3.8.1.4.  Comment
    Comment     => KW_COMMENT   => &[ValueType::Text], Many,
    // 3.8.1.5.  Description
    Description => KW_DESCRIPTION => &[ValueType::Text], Once,
    // 3.8.1.6.  Geographic Position
    Geo         => KW_GEO       => &[ValueType::Float], Once,
    // 3.8.1.7.  Location
    Location    => KW_LOCATION  => &[ValueType::Text], Once,
    // 3.8.1.8.  Percent Complete
    PercentComplete => KW_PERCENT_COMPLETE => &[ValueType::Integer], Once,
    // 3.8.1.9.  Priority
    Priority    => KW_PRIORITY  => &[ValueType::Integer], Once,
    // 3.8.1.10.  Resources
    Resources   => KW_RESOURCES => &[ValueType::Text], ManyList,
    // 3.8.1.11.  Status
    Status      => KW_STATUS    => &[ValueType::Text], Once,
    // 3.8.1.12.  Summary
    Summary     => KW_SUMMARY   => &[ValueType::Text], Once,
    // 3.8.2.1.  Date-Time Completed
    Completed   => KW_COMPLETED => &[ValueType::DateTime], Once,
    // 3.8.2.2.  Date-Time End
    DtEnd       => KW_DTEND     => &[ValueType::DateTime, ValueType::Date], Once,
    // 3.8.2.3.  Date-Time Due
    Due         => KW_DUE       => &[ValueType::DateTime, ValueType::Date], Once,
    // 3.8.2.4.  Date-Time Start
    DtStart     => KW_DTSTART   => &[ValueType::DateTime, ValueType::Date], Once,
    // 3.8.2.5.  Duration
    Duration    => KW_DURATION  => &[ValueType::Duration], Once,
    // 3.8.2.6.  Free/Busy Time
    FreeBusy    => KW_FREEBUSY  => &[ValueType::Period], ManyList,
    // 3.8.2.7.  Time Transparency
    Transp      => KW_TRANSP    => &[ValueType::Text], Once,
    // 3.8.3.1.  Time Zone Identifier
    TzId        => KW_TZID      => &[ValueType::Text], Once,
    // 3.8.3.2.  Time Zone Name
    TzName      => KW_TZNAME    => &[ValueType::Text], Many,
    // 3.8.3.3.  Time Zone Offset From
    TzOffsetFrom => KW_TZOFFSETFROM => &[ValueType::UtcOffset], Once,
    // 3.8.3.4.  Time Zone Offset To
    TzOffsetTo  => KW_TZOFFSETTO => &[ValueType::UtcOffset], Once,
    // 3.8.3.5.  Time Zone URL
    TzUrl       => KW_TZURL     => &[ValueType::Uri], Once,
    // 3.8.4.1.  Attendee
    Attendee    => KW_ATTENDEE  => &[ValueType::CalAddress], Many,
    // 3.8.4.2.  Contact
    Contact     => KW_CONTACT   => &[ValueType::Text], Many,
    // 3.8.4.3.  Organizer
    Organizer   => KW_ORGANIZER => &[ValueType::CalAddress], Once,
    // 3.8.4.4.  Recurrence ID
    RecurrenceId => KW_RECURRENCE_ID => &[ValueType::DateTime, ValueType::Date], Once,
    // 3.8.4.5.  Related To
    RelatedTo   => KW_RELATED_TO => &[ValueType::Text], Many,
    // 3.8.4.6.  Uniform Resource Locator
    Url         => KW_URL       => &[ValueType::Uri], Once,
    // 3.8.4.7.  Unique Identifier
    Uid         => KW_UID       => &[ValueType::Text], Once,
    // 3.8.5.1.  Exception Date-Times
    ExDate      => KW_EXDATE    => &[ValueType::DateTime, ValueType::Date], ManyList,
    // 3.8.5.2.  Recurrence Date-Times
    RDate       => KW_RDATE     => &[ValueType::DateTime, ValueType::Date, ValueType::Period], ManyList,
    // 3.8.5.3.  Recurrence Rule
    RRule       => KW_RRULE     => &[ValueType::Recur], Once,
    // 3.8.6.1.  Action
    Action      => KW_ACTION    => &[ValueType::Text], Once,
    // 3.8.6.2.  Repeat Count
    Repeat      => KW_REPEAT    => &[ValueType::Integer], Once,
    // 3.8.6.3.  Trigger
    Trigger     => KW_TRIGGER   => &[ValueType::Duration, ValueType::DateTime], Once,
    // 3.8.7.1.  Date-Time Created
    Created     => KW_CREATED   => &[ValueType::DateTime], Once,
    // 3.8.7.2.  Date-Time Stamp
    DtStamp     => KW_DTSTAMP   => &[ValueType::DateTime], Once,
    // 3.8.7.3.  Last Modified
    LastModified => KW_LAST_MODIFIED => &[ValueType::DateTime], Once,
    // 3.8.7.4.  Sequence Number
    Sequence    => KW_SEQUENCE  => &[ValueType::Integer], Once,
    // 3.8.8.3.  Request Status
    RequestStatus => KW_REQUEST_STATUS => &[ValueType::Text], Many,
}
