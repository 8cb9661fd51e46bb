// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Moving values between the timelines of a series before and after an edit.

use jiff::SignedDuration;
use recal_ical::{
    Component, ComponentKind, PropertyKind, RecurrenceRule, RuleEnd, Temporal, TemporalTag,
    ValueDuration, same_occurrence,
};

use crate::revision::RevisionError;

/// A move from one point of a series to another, possibly changing the form
/// of its values.
#[derive(Debug, Clone)]
pub(crate) struct Shift {
    template: Temporal,
    delta: SignedDuration,
}

impl Shift {
    /// The move that takes `from` to `to`.
    pub(crate) fn between(from: &Temporal, to: &Temporal) -> Self {
        Self {
            delta: from.retag_like(to).civil_until(to),
            template: to.clone(),
        }
    }

    /// Move a value that lives on the old timeline.
    pub(crate) fn apply(&self, value: &Temporal) -> Result<Temporal, RevisionError> {
        Ok(value.retag_like(&self.template).shifted(self.delta)?)
    }
}

/// The form UNTIL must take for a series starting at `start`.
pub(crate) fn until_form(until: &Temporal, start: &Temporal) -> Temporal {
    match start.tag() {
        TemporalTag::Date => Temporal::Date(until.date()),
        TemporalTag::Floating => Temporal::Floating(until.civil()),
        TemporalTag::Utc | TemporalTag::Zoned => until.to_utc(),
    }
}

/// The UNTIL that ends a series right after `previous`, the last instance
/// kept before `selected`.
pub(crate) fn split_until(previous: &Temporal, selected: &Temporal, start: &Temporal) -> Temporal {
    let until = if previous.date() < selected.date() {
        previous.end_of_day()
    } else {
        previous.clone()
    };
    until_form(&until, start)
}

/// Whether `edited` is `original` with at most UNTIL changed in form.
pub(crate) fn same_rule(original: &RecurrenceRule, edited: &RecurrenceRule) -> bool {
    let ends = match (&original.end, &edited.end) {
        (RuleEnd::Until(a), RuleEnd::Until(b)) => same_occurrence(a, b),
        (a, b) => a == b,
    };
    let mut a = original.clone();
    let mut b = edited.clone();
    a.end = RuleEnd::Forever;
    b.end = RuleEnd::Forever;
    ends && a == b
}

/// The property that ends an instance of `component`.
pub(crate) fn end_kind(component: &Component) -> PropertyKind {
    if component.due().is_some() || *component.kind() == ComponentKind::Todo {
        PropertyKind::Due
    } else {
        PropertyKind::DtEnd
    }
}

/// The end of an instance, from DTEND or DUE.
pub(crate) fn instance_end(component: &Component) -> Option<&Temporal> {
    component.dtend().or_else(|| component.due())
}

/// Set the end of an instance in the property `kind`.
pub(crate) fn set_end(
    component: &mut Component,
    kind: PropertyKind,
    end: Temporal,
) -> Result<(), RevisionError> {
    match kind {
        PropertyKind::Due => component.set_due(end)?,
        _ => component.set_dtend(end)?,
    }
    Ok(())
}

/// Move a component to start at `start`.
///
/// The end follows `end` when given and keeps the instance length
/// otherwise. RDATE, EXDATE and UNTIL are converted into the form of the new
/// start but stay where they are in time.
///
/// # Errors
///
/// Fails when a moved value is out of range or the result is inconsistent.
pub fn reschedule(
    component: &mut Component,
    start: Temporal,
    end: Option<Temporal>,
) -> Result<(), RevisionError> {
    let length = component.instance_length();
    let had_end = instance_end(component).is_some();
    let kind = end_kind(component);
    let rule = component.rrule().cloned();
    let rdates: Vec<Temporal> = component.rdates().into_iter().cloned().collect();
    let exdates: Vec<Temporal> = component.exdates().into_iter().cloned().collect();

    for dependent in [
        PropertyKind::DtEnd,
        PropertyKind::Due,
        PropertyKind::RRule,
        PropertyKind::RDate,
        PropertyKind::ExDate,
    ] {
        component.remove_property(dependent);
    }
    component.set_dtstart(start.clone())?;

    match end {
        Some(end) if component.duration().is_some() => {
            let length = start.civil_until(&end);
            component.set_duration(ValueDuration::from_signed_duration(length))?;
        }
        Some(end) => set_end(component, kind, end)?,
        None if had_end => {
            if let Some(length) = length {
                set_end(component, kind, start.shifted(length)?)?;
            }
        }
        None => {}
    }

    if let Some(mut rule) = rule {
        if let Some(until) = rule.until() {
            rule.end = RuleEnd::Until(until_form(until, &start));
        }
        component.set_rrule(rule)?;
    }
    for rdate in rdates {
        component.add_rdate(rdate.retag_like(&start))?;
    }
    for exdate in exdates {
        component.add_exdate(exdate.retag_like(&start))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use recal_ical::RecurrenceFrequency;

    use super::*;

    fn floating(d: i8, h: i8) -> Temporal {
        Temporal::Floating(date(2015, 11, d).at(h, 0, 0, 0))
    }

    #[test]
    fn shifts_and_converts() {
        let shift = Shift::between(&floating(11, 10), &floating(12, 9));
        assert_eq!(shift.apply(&floating(20, 10)).unwrap(), floating(21, 9));

        let to_date = Shift::between(&floating(11, 10), &Temporal::Date(date(2015, 11, 11)));
        assert_eq!(
            to_date.apply(&floating(13, 10)).unwrap(),
            Temporal::Date(date(2015, 11, 13))
        );

        let to_time = Shift::between(&Temporal::Date(date(2015, 11, 9)), &floating(9, 8));
        assert_eq!(
            to_time.apply(&Temporal::Date(date(2015, 11, 11))).unwrap(),
            floating(11, 8)
        );
    }

    #[test]
    fn picks_split_until() {
        let start = floating(9, 10);
        assert_eq!(
            split_until(&floating(10, 10), &floating(11, 10), &start),
            Temporal::Floating(date(2015, 11, 10).at(23, 59, 59, 0))
        );
        // two instances on one day
        assert_eq!(
            split_until(&floating(10, 10), &floating(10, 16), &start),
            floating(10, 10)
        );

        let zoned = Temporal::Zoned {
            datetime: date(2015, 11, 9).at(10, 0, 0, 0),
            tzid: "Europe/Berlin".to_owned(),
        };
        let previous = zoned.shifted(SignedDuration::from_hours(24)).unwrap();
        let selected = zoned.shifted(SignedDuration::from_hours(48)).unwrap();
        assert_eq!(
            split_until(&previous, &selected, &zoned),
            Temporal::Utc(date(2015, 11, 10).at(22, 59, 59, 0))
        );

        let whole_day = Temporal::Date(date(2015, 11, 9));
        assert_eq!(
            split_until(&Temporal::Date(date(2015, 11, 10)), &Temporal::Date(date(2015, 11, 11)), &whole_day),
            Temporal::Date(date(2015, 11, 10))
        );
    }

    #[test]
    fn compares_rules_up_to_until_form() {
        let rule = RecurrenceRule::new(RecurrenceFrequency::Daily)
            .with_until(Temporal::Date(date(2015, 12, 1)))
            .unwrap();
        let timed = RecurrenceRule::new(RecurrenceFrequency::Daily)
            .with_until(Temporal::Floating(date(2015, 12, 1).at(10, 0, 0, 0)))
            .unwrap();
        assert!(same_rule(&rule, &timed));

        let weekly = RecurrenceRule::new(RecurrenceFrequency::Weekly)
            .with_until(Temporal::Date(date(2015, 12, 1)))
            .unwrap();
        assert!(!same_rule(&rule, &weekly));
    }

    #[test]
    fn reschedules_to_whole_days() {
        let rule = RecurrenceRule::new(RecurrenceFrequency::Daily)
            .with_until(Temporal::Floating(date(2015, 11, 20).at(10, 0, 0, 0)))
            .unwrap();
        let mut event = Component::new(ComponentKind::Event)
            .with_dtstart(floating(9, 10))
            .unwrap()
            .with_dtend(floating(9, 11))
            .unwrap()
            .with_rrule(rule)
            .unwrap()
            .with_exdate(floating(12, 10))
            .unwrap();

        let day = Temporal::Date(date(2015, 11, 9));
        reschedule(&mut event, day.clone(), Some(Temporal::Date(date(2015, 11, 10)))).unwrap();
        assert_eq!(event.dtstart(), Some(&day));
        assert_eq!(event.dtend(), Some(&Temporal::Date(date(2015, 11, 10))));
        assert_eq!(
            event.rrule().and_then(RecurrenceRule::until),
            Some(&Temporal::Date(date(2015, 11, 20)))
        );
        assert_eq!(event.exdates(), [&Temporal::Date(date(2015, 11, 12))]);
        assert!(event.validate().iter().all(|m| !m.contains("form")));
    }

    #[test]
    fn reschedule_keeps_length() {
        let mut todo = Component::new(ComponentKind::Todo)
            .with_dtstart(floating(9, 10))
            .unwrap()
            .with_due(floating(9, 12))
            .unwrap();
        reschedule(&mut todo, floating(10, 8), None).unwrap();
        assert_eq!(todo.due(), Some(&floating(10, 10)));
    }
}
