// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrence sets of components.
//!
//! The recurrence set of a component is its RRULE expansion merged with
//! RDATE, minus EXDATE and minus the RECURRENCE-ID of overrides. DTSTART is
//! always the first instance unless excluded. Every stream is lazy and comes
//! out strictly increasing.

mod cache;
mod expand;

use std::iter::Peekable;
use std::vec;

use jiff::civil::Time;
use jiff::{SignedDuration, Timestamp};

use crate::component::Component;
use crate::value::{RecurrenceRule, Temporal};

pub(crate) use crate::recurrence::cache::RecurrenceCache;
pub use crate::recurrence::expand::RuleIter;

/// Errors of recurrence rules and recurrence queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecurrenceError {
    /// The component has no usable DTSTART.
    #[error("recurrence needs a DTSTART")]
    MissingStart,

    /// COUNT and UNTIL set on one rule.
    #[error("COUNT and UNTIL are mutually exclusive")]
    CountUntilExclusion,

    /// INTERVAL of zero.
    #[error("INTERVAL must be at least 1")]
    ZeroInterval,

    /// No series with the UID in the calendar.
    #[error("no component with UID {0}")]
    UnknownUid(String),
}

/// Largest distance of a zone from UTC.
const DAY_SLACK_HOURS: i64 = 14;

/// Whether two values denote the same instance of a series.
///
/// Date-times compare by instant. A date against a date-time matches every
/// instance on that civil day.
#[must_use]
pub fn same_occurrence(a: &Temporal, b: &Temporal) -> bool {
    match (a.is_date(), b.is_date()) {
        (false, false) => a.instant() == b.instant(),
        _ => a.date() == b.date(),
    }
}

/// The recurrence set of a component, in increasing order.
#[derive(Debug, Clone)]
pub struct Occurrences {
    rule: Option<RuleIter>,
    dates: Peekable<vec::IntoIter<Temporal>>,
    excluded: Vec<Temporal>,
    last: Option<Timestamp>,
}

impl Iterator for Occurrences {
    type Item = Temporal;

    fn next(&mut self) -> Option<Temporal> {
        loop {
            // on equal instants the rule wins and keeps the DTSTART form
            let from_rule = match (self.rule.as_mut().and_then(RuleIter::peek), self.dates.peek()) {
                (Some(a), Some(b)) => a.instant() <= b.instant(),
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => return None,
            };
            let next = if from_rule {
                self.rule.as_mut().and_then(Iterator::next)
            } else {
                self.dates.next()
            }?;

            let instant = next.instant();
            if self.last.is_some_and(|last| instant <= last) {
                continue;
            }
            self.last = Some(instant);
            if self.excluded.iter().any(|x| same_occurrence(x, &next)) {
                continue;
            }
            return Some(next);
        }
    }
}

impl Component {
    /// The whole recurrence set, DTSTART first.
    ///
    /// A component without RRULE and RDATE has DTSTART as its only instance.
    ///
    /// # Errors
    ///
    /// Returns [`RecurrenceError::MissingStart`] without DTSTART.
    pub fn occurrences(&self) -> Result<Occurrences, RecurrenceError> {
        self.occurrences_with(None, Vec::new())
    }

    /// The recurrence set from the first instance at or after `from`.
    ///
    /// Resumes from the checkpoints of earlier queries instead of expanding
    /// the rule from DTSTART again.
    ///
    /// # Errors
    ///
    /// Returns [`RecurrenceError::MissingStart`] without DTSTART.
    pub fn occurrences_from(&self, from: &Temporal) -> Result<Occurrences, RecurrenceError> {
        self.occurrences_with(Some(from), Vec::new())
    }

    /// Instances starting in `[start, end)`, compared by instant.
    ///
    /// # Errors
    ///
    /// Returns [`RecurrenceError::MissingStart`] without DTSTART.
    pub fn stream_occurrences(
        &self,
        start: &Temporal,
        end: &Temporal,
    ) -> Result<impl Iterator<Item = Temporal> + use<>, RecurrenceError> {
        let end = end.instant();
        Ok(self
            .occurrences_from(start)?
            .take_while(move |t| t.instant() < end))
    }

    /// Whether `candidate` is an instance of the recurrence set.
    ///
    /// # Errors
    ///
    /// Returns [`RecurrenceError::MissingStart`] without DTSTART.
    pub fn is_occurrence(&self, candidate: &Temporal) -> Result<bool, RecurrenceError> {
        let whole_days = self.dtstart().is_some_and(Temporal::is_date);
        if !candidate.is_date() && !whole_days {
            return Ok(self
                .occurrences_from(candidate)?
                .next()
                .is_some_and(|t| same_occurrence(&t, candidate)));
        }

        // any instance on the civil day matches, wherever its zone puts it
        let day = candidate.date();
        let from = Temporal::Utc(day.to_datetime(Time::midnight()))
            .shifted(SignedDuration::from_hours(-DAY_SLACK_HOURS))
            .unwrap_or_else(|_| candidate.clone());
        Ok(self
            .occurrences_from(&from)?
            .take_while(|t| t.date() <= day)
            .any(|t| t.date() == day))
    }

    /// The recurrence set minus `excluded`, from `from` on.
    pub(crate) fn occurrences_with(
        &self,
        from: Option<&Temporal>,
        excluded: Vec<Temporal>,
    ) -> Result<Occurrences, RecurrenceError> {
        let start = self.dtstart().ok_or(RecurrenceError::MissingStart)?;
        let from = from.map(Temporal::instant);

        let rule = self.rrule().map(|rule| self.rule_iter(start, rule, from));
        let mut dates: Vec<Temporal> = self.rdates().into_iter().cloned().collect();
        if rule.is_none() {
            dates.insert(0, start.clone());
        }
        if let Some(from) = from {
            dates.retain(|t| t.instant() >= from);
        }
        dates.sort_by_key(Temporal::instant);

        let mut excluded = excluded;
        excluded.extend(self.exdates().into_iter().cloned());

        Ok(Occurrences {
            rule,
            dates: dates.into_iter().peekable(),
            excluded,
            last: None,
        })
    }

    fn rule_iter(&self, start: &Temporal, rule: &RecurrenceRule, from: Option<Timestamp>) -> RuleIter {
        let Some(from) = from else {
            return RuleIter::new(start, rule);
        };

        let mut cache = self.cache.borrow_mut();
        if cache.as_ref().is_some_and(|c| !c.is_for(start, rule)) {
            tracing::trace!(kind = %self.kind, "recurrence cache is stale, rebuilding");
            *cache = None;
        }
        cache
            .get_or_insert_with(|| RecurrenceCache::new(start, rule))
            .iter_from(from)
    }
}
