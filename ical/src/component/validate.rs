// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Whole-component validation of parsed or built calendars.

use crate::component::{Component, ComponentKind, check_same_form, check_until_form};
use crate::property::PropertyKind;

impl Component {
    /// Check this component and its children against RFC 5545.
    ///
    /// Every message is prefixed with the path of the component it is about,
    /// e.g. `VCALENDAR/VEVENT[uid]: missing required property DTSTAMP`. The
    /// check is pure, calling it again gives the same list.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        self.validate_into(&self.label(), &mut errors);
        errors
    }

    /// Whether [`Component::validate`] finds nothing.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    fn label(&self) -> String {
        match self.uid() {
            Some(uid) => format!("{}[{uid}]", self.kind),
            None => self.kind.to_string(),
        }
    }

    fn validate_into(&self, path: &str, errors: &mut Vec<String>) {
        let mut messages = Vec::new();

        messages.extend(self.parse_errors.iter().map(ToString::to_string));
        messages.extend(
            self.properties
                .iter()
                .filter_map(|p| p.error())
                .map(ToString::to_string),
        );

        self.check_cardinality(&mut messages);
        self.check_temporals(&mut messages);

        if self.kind == ComponentKind::TimeZone
            && !self
                .children
                .iter()
                .any(|c| matches!(c.kind, ComponentKind::Standard | ComponentKind::Daylight))
        {
            messages.push("VTIMEZONE needs at least one STANDARD or DAYLIGHT".to_owned());
        }

        errors.extend(messages.into_iter().map(|m| format!("{path}: {m}")));
        for child in &self.children {
            child.validate_into(&format!("{path}/{}", child.label()), errors);
        }
    }

    fn check_cardinality(&self, messages: &mut Vec<String>) {
        let spec = self.kind.spec();
        let has = |kind| self.property(kind).is_some();

        for &kind in spec.required {
            if !has(kind) {
                messages.push(format!("missing required property {kind}"));
            }
        }

        let mut reported: Vec<PropertyKind> = Vec::new();
        for kind in self.properties.iter().filter_map(|p| p.kind()) {
            if self.kind.allows_repeated(kind) || reported.contains(&kind) {
                continue;
            }
            let count = self.properties_of(kind).count();
            if count > 1 {
                messages.push(format!("property {kind} may appear once, found {count}"));
                reported.push(kind);
            }
        }

        for &(a, b) in spec.exclusive {
            if has(a) && has(b) {
                messages.push(format!("{a} and {b} are mutually exclusive"));
            }
        }
        for &(a, b) in spec.together {
            match (has(a), has(b)) {
                (true, false) => messages.push(format!("{a} requires {b}")),
                (false, true) => messages.push(format!("{b} requires {a}")),
                _ => {}
            }
        }
        for &(a, b) in spec.depends {
            if has(a) && !has(b) {
                messages.push(format!("{a} requires {b}"));
            }
        }
    }

    fn check_temporals(&self, messages: &mut Vec<String>) {
        let Some(start) = self.dtstart() else {
            if self.kind.is_recurrable() && self.property(PropertyKind::RRule).is_some() {
                messages.push("RRULE requires DTSTART".to_owned());
            }
            return;
        };

        for property in &self.properties {
            let Some(kind) = property.kind() else {
                continue;
            };
            if !kind.is_temporal() || kind == PropertyKind::DtStart || property.error().is_some() {
                continue;
            }
            if let Err(err) = check_same_form(kind, &property.value().temporals(), start.tag()) {
                messages.push(err.to_string());
            }
        }

        for (kind, end) in [
            (PropertyKind::DtEnd, self.dtend()),
            (PropertyKind::Due, self.due()),
        ] {
            if let Some(end) = end.filter(|end| end.tag() == start.tag())
                && end.instant() < start.instant()
            {
                messages.push(format!("{kind} is before DTSTART"));
            }
        }

        if let Some(rule) = self.rrule()
            && let Err(err) = check_until_form(start, rule)
        {
            messages.push(err.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use crate::component::{Component, ComponentKind};
    use crate::property::{Property, PropertyKind};
    use crate::value::{RecurrenceFrequency, RecurrenceRule, Temporal, Value};

    fn utc(d: i8, h: i8) -> Temporal {
        Temporal::Utc(date(2025, 3, d).at(h, 0, 0, 0))
    }

    fn event() -> Component {
        let mut event = Component::new(ComponentKind::Event);
        event.push_property(Property::text(PropertyKind::Uid, "a@example.com"));
        event.push_property(Property::temporal(PropertyKind::DtStamp, utc(1, 0)));
        event.push_property(Property::temporal(PropertyKind::DtStart, utc(3, 9)));
        event
    }

    #[test]
    fn accepts_minimal_event() {
        assert_eq!(event().validate(), Vec::<String>::new());
        assert!(event().is_valid());
    }

    #[test]
    fn reports_missing_and_repeated_properties() {
        let mut event = Component::new(ComponentKind::Event);
        event.push_property(Property::text(PropertyKind::Summary, "a"));
        event.push_property(Property::text(PropertyKind::Summary, "b"));
        let errors = event.validate();
        assert!(errors.contains(&"VEVENT: missing required property DTSTAMP".to_owned()));
        assert!(errors.contains(&"VEVENT: missing required property UID".to_owned()));
        assert!(errors.contains(&"VEVENT: property SUMMARY may appear once, found 2".to_owned()));
    }

    #[test]
    fn reports_exclusive_and_paired_properties() {
        let mut event = event();
        event.push_property(Property::temporal(PropertyKind::DtEnd, utc(3, 10)));
        event.push_property(Property::new(
            PropertyKind::Duration,
            Value::Raw("PT1H".to_owned()),
        ));
        assert!(
            event
                .validate()
                .iter()
                .any(|e| e.ends_with("DTEND and DURATION are mutually exclusive"))
        );

        let mut alarm = Component::new(ComponentKind::Alarm);
        alarm.push_property(Property::text(PropertyKind::Action, "DISPLAY"));
        alarm.push_property(Property::new(PropertyKind::Repeat, Value::Integer(2)));
        assert!(
            alarm
                .validate()
                .iter()
                .any(|e| e == "VALARM: REPEAT requires DURATION")
        );
    }

    #[test]
    fn reports_temporal_forms_and_order() {
        let mut event = event();
        event.push_property(Property::temporal(
            PropertyKind::DtEnd,
            Temporal::Date(date(2025, 3, 4)),
        ));
        event.push_property(Property::new(
            PropertyKind::RRule,
            Value::Recur(
                RecurrenceRule::new(RecurrenceFrequency::Daily)
                    .with_until(Temporal::Floating(date(2025, 4, 1).at(0, 0, 0, 0)))
                    .unwrap(),
            ),
        ));
        let errors = event.validate();
        assert_eq!(errors.len(), 2, "{errors:?}");

        let mut backwards = self::event();
        backwards.push_property(Property::temporal(PropertyKind::DtEnd, utc(2, 9)));
        assert_eq!(
            backwards.validate(),
            ["VEVENT[a@example.com]: DTEND is before DTSTART"]
        );
    }

    #[test]
    fn prefixes_nested_paths() {
        let mut calendar = Component::new(ComponentKind::Calendar);
        calendar.push_property(Property::text(PropertyKind::ProdId, "-//test//EN"));
        calendar.push_property(Property::text(PropertyKind::Version, "2.0"));
        let mut event = event();
        event.add_child(Component::new(ComponentKind::Alarm));
        calendar.add_child(event);
        calendar.add_child(Component::new(ComponentKind::TimeZone));

        let errors = calendar.validate();
        assert!(errors.contains(
            &"VCALENDAR/VEVENT[a@example.com]/VALARM: missing required property ACTION".to_owned()
        ));
        assert!(errors.contains(
            &"VCALENDAR/VTIMEZONE: VTIMEZONE needs at least one STANDARD or DAYLIGHT".to_owned()
        ));
    }
}
