// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use recal_ical::{Component, Property, PropertyKind, Series, Temporal};

use crate::revision::{Clock, RevisionError, Reviser, check_occurrence, recurring_parent};

impl<C: Clock> Reviser<C> {
    /// Edit a single occurrence.
    ///
    /// The edit becomes an override carrying RECURRENCE-ID `original`, or
    /// updates the override already there. The parent is kept as is.
    ///
    /// # Errors
    ///
    /// Fails when the series does not recur or `original` is not one of its
    /// occurrences.
    #[tracing::instrument(skip_all, fields(uid = series.uid(), original = %original))]
    pub fn revise_one(
        &self,
        series: &Series<'_>,
        edited: &Component,
        original: &Temporal,
    ) -> Result<Vec<Component>, RevisionError> {
        let (parent, start) = recurring_parent(series)?;
        let original = original.retag_like(start);
        check_occurrence(series, parent, &original)?;
        let existing = series.override_for(&original);

        let mut child = edited.clone();
        for kind in [
            PropertyKind::RRule,
            PropertyKind::RDate,
            PropertyKind::ExDate,
            PropertyKind::RecurrenceId,
        ] {
            child.remove_property(kind);
        }
        child.set_uid(series.uid())?;
        child.set_recurrence_id(original)?;
        if self.config.relate_overrides {
            relate_to(&mut child, series.uid())?;
        }
        let base = existing.map_or(parent.sequence(), |c| c.sequence().max(parent.sequence()));
        self.touch(&mut child, base)?;

        let mut components = Vec::with_capacity(series.overrides().len() + 2);
        components.push(parent.clone());
        let mut replaced = false;
        for &other in series.overrides() {
            if existing.is_some_and(|e| std::ptr::eq(e, other)) {
                components.push(child.clone());
                replaced = true;
            } else {
                components.push(other.clone());
            }
        }
        if !replaced {
            components.push(child);
        }
        tracing::debug!(replaced, "override written");
        Ok(components)
    }
}

/// Point RELATED-TO at `uid`, once.
pub(crate) fn relate_to(component: &mut Component, uid: &str) -> Result<(), RevisionError> {
    let already = component
        .properties_of(PropertyKind::RelatedTo)
        .any(|p| p.value().as_text() == Some(uid));
    if !already {
        component.add_property(Property::text(PropertyKind::RelatedTo, uid))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use jiff::civil::date;
    use recal_ical::{Calendar, parse_calendar};

    use crate::config::Config;
    use crate::revision::{ChangeScope, instance_of};

    use super::*;

    const MEETING: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//recal//test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:meeting@example.com\r\n\
DTSTAMP:20151101T000000Z\r\n\
DTSTART:20151109T100000\r\n\
DTEND:20151109T110000\r\n\
RRULE:FREQ=DAILY;INTERVAL=2;COUNT=3\r\n\
SUMMARY:Meeting\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    fn floating(d: i8, h: i8, m: i8) -> Temporal {
        Temporal::Floating(date(2015, 11, d).at(h, m, 0, 0))
    }

    fn reviser() -> Reviser<Timestamp> {
        let now: Timestamp = "2015-11-05T12:00:00Z".parse().unwrap();
        Reviser::new(Config::default()).with_clock(now)
    }

    fn revised(calendar: &Calendar, edited: &Component, original: &Temporal) -> Vec<Component> {
        let series = calendar.series("meeting@example.com").unwrap();
        reviser()
            .revise(&series, edited, original, ChangeScope::One)
            .unwrap()
    }

    #[test]
    fn overrides_a_single_occurrence() {
        let calendar = parse_calendar(MEETING).unwrap();
        let series = calendar.series("meeting@example.com").unwrap();
        let original = floating(11, 10, 0);
        let mut edited = instance_of(&series, &original).unwrap();
        edited.set_dtstart(floating(10, 9, 45)).unwrap();
        edited.set_dtend(floating(10, 10, 45)).unwrap();

        let components = revised(&calendar, &edited, &original);
        assert_eq!(components.len(), 2);

        let parent = components.first().unwrap();
        assert_eq!(parent, series.parent().unwrap());
        assert!(parent.exdates().is_empty());

        let child = components.get(1).unwrap();
        assert_eq!(child.uid(), Some("meeting@example.com"));
        assert_eq!(child.recurrence_id(), Some(&original));
        assert_eq!(child.dtstart(), Some(&floating(10, 9, 45)));
        assert_eq!(child.dtend(), Some(&floating(10, 10, 45)));
        assert_eq!(child.sequence(), 1);
        assert!(child.rrule().is_none());
        assert!(child.property(PropertyKind::RelatedTo).is_none());
        assert_eq!(
            child.property(PropertyKind::DtStamp).and_then(Property::as_temporal),
            Some(&Temporal::Utc(date(2015, 11, 5).at(12, 0, 0, 0)))
        );
    }

    #[test]
    fn updates_an_existing_override_in_place() {
        let mut calendar = parse_calendar(MEETING).unwrap();
        let original = floating(11, 10, 0);
        let series = calendar.series("meeting@example.com").unwrap();
        let mut edited = instance_of(&series, &original).unwrap();
        edited.set_summary("Moved").unwrap();
        let first = revised(&calendar, &edited, &original);
        calendar.apply_revision("meeting@example.com", first).unwrap();

        let series = calendar.series("meeting@example.com").unwrap();
        let mut again = instance_of(&series, &original).unwrap();
        assert_eq!(again.summary(), Some("Moved"));
        again.set_summary("Moved twice").unwrap();
        let second = revised(&calendar, &again, &original);

        assert_eq!(second.len(), 2);
        let child = second.get(1).unwrap();
        assert_eq!(child.summary(), Some("Moved twice"));
        assert_eq!(child.sequence(), 2);
    }

    #[test]
    fn relates_overrides_when_configured() {
        let calendar = parse_calendar(MEETING).unwrap();
        let series = calendar.series("meeting@example.com").unwrap();
        let original = floating(13, 10, 0);
        let edited = instance_of(&series, &original).unwrap();
        let config = Config {
            relate_overrides: true,
            ..Config::default()
        };
        let components = Reviser::new(config)
            .revise_one(&series, &edited, &original)
            .unwrap();
        let child = components.last().unwrap();
        let related: Vec<_> = child
            .properties_of(PropertyKind::RelatedTo)
            .filter_map(|p| p.value().as_text())
            .collect();
        assert_eq!(related, ["meeting@example.com"]);
    }

    #[test]
    fn rejects_unknown_occurrences() {
        let calendar = parse_calendar(MEETING).unwrap();
        let series = calendar.series("meeting@example.com").unwrap();
        let edited = series.parent().unwrap().clone();
        let err = reviser()
            .revise_one(&series, &edited, &floating(10, 10, 0))
            .unwrap_err();
        assert!(matches!(err, RevisionError::OccurrenceNotFound { .. }), "{err}");
    }
}
