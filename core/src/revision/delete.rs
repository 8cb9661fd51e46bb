// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use recal_ical::{Component, Series, Temporal};

use crate::revision::future::Split;
use crate::revision::{
    Clock, RevisionError, Reviser, check_occurrence, previous_occurrence, recurring_parent,
    same_id,
};

impl<C: Clock> Reviser<C> {
    /// Delete one occurrence by excluding it, dropping its override.
    ///
    /// # Errors
    ///
    /// Fails when the series does not recur or `occurrence` is not one of its
    /// occurrences.
    #[tracing::instrument(skip_all, fields(uid = series.uid(), occurrence = %occurrence))]
    pub fn delete_one(
        &self,
        series: &Series<'_>,
        occurrence: &Temporal,
    ) -> Result<Vec<Component>, RevisionError> {
        let (parent, start) = recurring_parent(series)?;
        let occurrence = occurrence.retag_like(start);
        check_occurrence(series, parent, &occurrence)?;

        let mut head = parent.clone();
        head.add_exdate(occurrence.clone())?;
        self.touch(&mut head, parent.sequence())?;

        let mut components = vec![head];
        components.extend(
            series
                .overrides()
                .iter()
                .filter(|c| !same_id(c, &occurrence))
                .map(|&c| c.clone()),
        );
        Ok(components)
    }

    /// Delete an occurrence and every one after it.
    ///
    /// Deleting from the first occurrence on deletes the series.
    ///
    /// # Errors
    ///
    /// Fails when the series does not recur or `occurrence` is not one of its
    /// occurrences.
    #[tracing::instrument(skip_all, fields(uid = series.uid(), occurrence = %occurrence))]
    pub fn delete_this_and_future(
        &self,
        series: &Series<'_>,
        occurrence: &Temporal,
    ) -> Result<Vec<Component>, RevisionError> {
        let (parent, start) = recurring_parent(series)?;
        let occurrence = occurrence.retag_like(start);
        check_occurrence(series, parent, &occurrence)?;

        let Some(previous) = previous_occurrence(parent, &occurrence)? else {
            return Ok(self.delete_all(series));
        };
        let split = Split::new(parent, start, &occurrence, &previous)?;
        let mut components = vec![self.truncate(parent, &split)?];
        components.extend(
            series
                .overrides()
                .iter()
                .filter(|c| c.recurrence_id().is_some_and(|id| !split.is_after(id)))
                .map(|&c| c.clone()),
        );
        Ok(components)
    }

    /// Delete the whole series, which leaves nothing behind.
    #[must_use]
    pub fn delete_all(&self, series: &Series<'_>) -> Vec<Component> {
        tracing::debug!(uid = series.uid(), "series deleted");
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use jiff::civil::date;
    use recal_ical::{RecurrenceRule, parse_calendar};

    use crate::config::Config;

    use super::*;

    const SERIES: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//recal//test//EN\r\n\
BEGIN:VTODO\r\n\
UID:water@example.com\r\n\
DTSTAMP:20250101T000000Z\r\n\
DTSTART:20250301T080000Z\r\n\
DUE:20250301T090000Z\r\n\
RRULE:FREQ=WEEKLY;COUNT=6\r\n\
SUMMARY:Water the plants\r\n\
END:VTODO\r\n\
BEGIN:VTODO\r\n\
UID:water@example.com\r\n\
DTSTAMP:20250101T000000Z\r\n\
RECURRENCE-ID:20250315T080000Z\r\n\
DTSTART:20250316T080000Z\r\n\
DUE:20250316T090000Z\r\n\
END:VTODO\r\n\
END:VCALENDAR\r\n";

    fn utc(m: i8, d: i8) -> Temporal {
        Temporal::Utc(date(2025, m, d).at(8, 0, 0, 0))
    }

    fn reviser() -> Reviser<Timestamp> {
        let now: Timestamp = "2025-02-01T00:00:00Z".parse().unwrap();
        Reviser::new(Config::default()).with_clock(now)
    }

    #[test]
    fn deletes_one_occurrence() {
        let calendar = parse_calendar(SERIES).unwrap();
        let series = calendar.series("water@example.com").unwrap();
        let components = reviser().delete_one(&series, &utc(3, 15)).unwrap();

        let [parent] = components.as_slice() else {
            panic!("expected the parent only, got {components:?}");
        };
        assert_eq!(parent.exdates(), [&utc(3, 15)]);
        assert_eq!(parent.sequence(), 1);
        assert_eq!(parent.occurrences().unwrap().count(), 5);
    }

    #[test]
    fn deletes_from_an_occurrence_on() {
        let calendar = parse_calendar(SERIES).unwrap();
        let series = calendar.series("water@example.com").unwrap();

        let components = reviser().delete_this_and_future(&series, &utc(3, 22)).unwrap();
        assert_eq!(components.len(), 2);
        let parent = components.first().unwrap();
        let rule = parent.rrule().unwrap();
        assert_eq!(rule.count(), None);
        assert_eq!(rule.until(), Some(&Temporal::Utc(date(2025, 3, 15).at(23, 59, 59, 0))));
        assert_eq!(parent.occurrences().unwrap().count(), 3);

        let components = reviser().delete_this_and_future(&series, &utc(3, 15)).unwrap();
        assert_eq!(components.len(), 1);
    }

    #[test]
    fn deleting_from_the_first_occurrence_deletes_all() {
        let calendar = parse_calendar(SERIES).unwrap();
        let series = calendar.series("water@example.com").unwrap();
        let components = reviser().delete_this_and_future(&series, &utc(3, 1)).unwrap();
        assert!(components.is_empty());
    }

    #[test]
    fn rejects_missing_occurrences() {
        let calendar = parse_calendar(SERIES).unwrap();
        let series = calendar.series("water@example.com").unwrap();
        let err = reviser().delete_one(&series, &utc(3, 2)).unwrap_err();
        assert!(matches!(err, RevisionError::OccurrenceNotFound { .. }));
    }
}
