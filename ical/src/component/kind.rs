// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Component kinds and their capability table, RFC 5545 Section 3.6.

use std::fmt;

use crate::keyword::{
    KW_DAYLIGHT, KW_STANDARD, KW_VALARM, KW_VCALENDAR, KW_VEVENT, KW_VFREEBUSY, KW_VJOURNAL,
    KW_VTIMEZONE, KW_VTODO,
};
use crate::property::PropertyKind;

/// Kind of a calendar component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// `VCALENDAR`, the root of every calendar object
    Calendar,
    /// `VEVENT`
    Event,
    /// `VTODO`
    Todo,
    /// `VJOURNAL`
    Journal,
    /// `VFREEBUSY`
    FreeBusy,
    /// `VTIMEZONE`
    TimeZone,
    /// `STANDARD` sub-component of `VTIMEZONE`
    Standard,
    /// `DAYLIGHT` sub-component of `VTIMEZONE`
    Daylight,
    /// `VALARM`
    Alarm,
    /// Experimental `X-` or unknown IANA component, name as written
    Other(String),
}

/// What a component kind requires and allows, data driven.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ComponentSpec {
    /// Properties that must be present
    pub required: &'static [PropertyKind],
    /// Properties repeatable here although singular elsewhere
    pub repeatable: &'static [PropertyKind],
    /// Pairs of properties that must not both be present
    pub exclusive: &'static [(PropertyKind, PropertyKind)],
    /// Pairs of properties that need each other
    pub together: &'static [(PropertyKind, PropertyKind)],
    /// Properties that need another property
    pub depends: &'static [(PropertyKind, PropertyKind)],
}

const EMPTY: ComponentSpec = ComponentSpec {
    required: &[],
    repeatable: &[],
    exclusive: &[],
    together: &[],
    depends: &[],
};

const CALENDAR: ComponentSpec = ComponentSpec {
    required: &[PropertyKind::ProdId, PropertyKind::Version],
    ..EMPTY
};

const EVENT: ComponentSpec = ComponentSpec {
    required: &[PropertyKind::DtStamp, PropertyKind::Uid],
    exclusive: &[(PropertyKind::DtEnd, PropertyKind::Duration)],
    ..EMPTY
};

const TODO: ComponentSpec = ComponentSpec {
    required: &[PropertyKind::DtStamp, PropertyKind::Uid],
    exclusive: &[(PropertyKind::Due, PropertyKind::Duration)],
    depends: &[(PropertyKind::Duration, PropertyKind::DtStart)],
    ..EMPTY
};

const JOURNAL: ComponentSpec = ComponentSpec {
    required: &[PropertyKind::DtStamp, PropertyKind::Uid],
    repeatable: &[PropertyKind::Description],
    ..EMPTY
};

const FREEBUSY: ComponentSpec = ComponentSpec {
    required: &[PropertyKind::DtStamp, PropertyKind::Uid],
    ..EMPTY
};

const TIMEZONE: ComponentSpec = ComponentSpec {
    required: &[PropertyKind::TzId],
    ..EMPTY
};

const OBSERVANCE: ComponentSpec = ComponentSpec {
    required: &[
        PropertyKind::DtStart,
        PropertyKind::TzOffsetTo,
        PropertyKind::TzOffsetFrom,
    ],
    ..EMPTY
};

const ALARM: ComponentSpec = ComponentSpec {
    required: &[PropertyKind::Action, PropertyKind::Trigger],
    repeatable: &[PropertyKind::Attach],
    together: &[(PropertyKind::Duration, PropertyKind::Repeat)],
    ..EMPTY
};

impl ComponentKind {
    /// Resolve a component name, ignoring ASCII case for known names.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        [
            Self::Calendar,
            Self::Event,
            Self::Todo,
            Self::Journal,
            Self::FreeBusy,
            Self::TimeZone,
            Self::Standard,
            Self::Daylight,
            Self::Alarm,
        ]
        .into_iter()
        .find(|kind| kind.name().eq_ignore_ascii_case(name))
        .unwrap_or_else(|| Self::Other(name.to_owned()))
    }

    /// The component name as written after `BEGIN:`.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Calendar => KW_VCALENDAR,
            Self::Event => KW_VEVENT,
            Self::Todo => KW_VTODO,
            Self::Journal => KW_VJOURNAL,
            Self::FreeBusy => KW_VFREEBUSY,
            Self::TimeZone => KW_VTIMEZONE,
            Self::Standard => KW_STANDARD,
            Self::Daylight => KW_DAYLIGHT,
            Self::Alarm => KW_VALARM,
            Self::Other(name) => name,
        }
    }

    /// Whether components of this kind may carry a recurrence set.
    #[must_use]
    pub const fn is_recurrable(&self) -> bool {
        matches!(
            self,
            Self::Event | Self::Todo | Self::Journal | Self::Standard | Self::Daylight
        )
    }

    pub(crate) const fn spec(&self) -> &'static ComponentSpec {
        match self {
            Self::Calendar => &CALENDAR,
            Self::Event => &EVENT,
            Self::Todo => &TODO,
            Self::Journal => &JOURNAL,
            Self::FreeBusy => &FREEBUSY,
            Self::TimeZone => &TIMEZONE,
            Self::Standard | Self::Daylight => &OBSERVANCE,
            Self::Alarm => &ALARM,
            Self::Other(_) => &EMPTY,
        }
    }

    /// Whether a property may appear more than once in this kind.
    #[must_use]
    pub fn allows_repeated(&self, kind: PropertyKind) -> bool {
        kind.is_repeatable() || self.spec().repeatable.contains(&kind)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_names() {
        assert_eq!(ComponentKind::parse("vevent"), ComponentKind::Event);
        assert_eq!(ComponentKind::parse("VALARM"), ComponentKind::Alarm);
        assert_eq!(
            ComponentKind::parse("X-THING"),
            ComponentKind::Other("X-THING".to_owned())
        );
        assert_eq!(ComponentKind::TimeZone.to_string(), "VTIMEZONE");
    }

    #[test]
    fn consults_capability_table() {
        assert!(ComponentKind::Journal.allows_repeated(PropertyKind::Description));
        assert!(!ComponentKind::Event.allows_repeated(PropertyKind::Description));
        assert!(ComponentKind::Event.allows_repeated(PropertyKind::Attendee));
        assert!(
            ComponentKind::Todo
                .spec()
                .exclusive
                .contains(&(PropertyKind::Due, PropertyKind::Duration))
        );
    }
}
