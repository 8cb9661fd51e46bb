// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use recal_ical::{Component, PropertyKind, RecurrenceRule, RuleEnd, RuleIter, Series, Temporal};

use crate::revision::one::relate_to;
use crate::revision::timeline::{Shift, same_rule, split_until, until_form};
use crate::revision::{
    Clock, RevisionError, Reviser, all, check_occurrence, previous_occurrence, recurring_parent,
};

impl<C: Clock> Reviser<C> {
    /// Edit an occurrence and every one after it.
    ///
    /// The series ends right before `original` and a new series, with a fresh
    /// UID and RELATED-TO the old one, starts at the edited occurrence. An
    /// edit of the first occurrence changes the whole series.
    ///
    /// # Errors
    ///
    /// Fails when the series does not recur or `original` is not one of its
    /// occurrences.
    #[tracing::instrument(skip_all, fields(uid = series.uid(), original = %original))]
    pub fn revise_this_and_future(
        &self,
        series: &Series<'_>,
        edited: &Component,
        original: &Temporal,
    ) -> Result<Vec<Component>, RevisionError> {
        self.revise_this_and_future_with(series, edited, original, true)
    }

    pub(super) fn revise_this_and_future_with(
        &self,
        series: &Series<'_>,
        edited: &Component,
        original: &Temporal,
        keep_overrides: bool,
    ) -> Result<Vec<Component>, RevisionError> {
        let (parent, start) = recurring_parent(series)?;
        let original = original.retag_like(start);
        check_occurrence(series, parent, &original)?;

        let Some(previous) = previous_occurrence(parent, &original)? else {
            tracing::debug!("first occurrence, revising the whole series");
            let snapshot = all::series_snapshot(series, edited, &original)?;
            if edited.rrule().is_none() {
                return self.become_non_recurring(series, &snapshot);
            }
            return self.revise_all_with(series, &snapshot, keep_overrides);
        };

        let split = Split::new(parent, start, &original, &previous)?;
        let head = self.truncate(parent, &split)?;
        let new_uid = self.config.new_uid();
        let edited_start = edited.dtstart().ok_or(RevisionError::MissingStart)?;
        let shift = Shift::between(&original, edited_start);

        let mut tail = edited.clone();
        for kind in [
            PropertyKind::RecurrenceId,
            PropertyKind::RRule,
            PropertyKind::RDate,
            PropertyKind::ExDate,
        ] {
            tail.remove_property(kind);
        }
        tail.set_uid(new_uid.as_str())?;
        relate_to(&mut tail, series.uid())?;
        tail.set_sequence(0)?;
        self.stamp(&mut tail)?;
        if let Some(rule) = tail_rule(parent.rrule(), edited.rrule(), &split, edited_start)? {
            tail.set_rrule(rule)?;
        }
        for rdate in parent.rdates().into_iter().filter(|t| split.is_after(t)) {
            tail.add_rdate(shift.apply(rdate)?)?;
        }
        for exdate in parent.exdates().into_iter().filter(|t| split.is_after(t)) {
            tail.add_exdate(shift.apply(exdate)?)?;
        }

        let mut components = vec![head];
        let mut moved = vec![];
        for &existing in series.overrides() {
            let Some(id) = existing.recurrence_id() else {
                continue;
            };
            if !split.is_after(id) {
                components.push(existing.clone());
            } else if keep_overrides {
                let mut child = existing.clone();
                child.set_uid(new_uid.as_str())?;
                child.set_recurrence_id(shift.apply(id)?)?;
                if self.config.relate_overrides {
                    child.remove_property(PropertyKind::RelatedTo);
                    relate_to(&mut child, &new_uid)?;
                }
                self.touch(&mut child, 0)?;
                moved.push(child);
            }
        }
        tracing::debug!(%new_uid, moved = moved.len(), "series split");
        components.push(tail);
        components.extend(moved);
        Ok(components)
    }

    /// The parent ending right before the split.
    pub(super) fn truncate(
        &self,
        parent: &Component,
        split: &Split,
    ) -> Result<Component, RevisionError> {
        let mut head = parent.clone();
        head.remove_property(PropertyKind::RRule);
        head.remove_property(PropertyKind::RDate);
        head.remove_property(PropertyKind::ExDate);
        if let Some(rule) = split.head_rule.clone() {
            head.set_rrule(rule)?;
        }
        for rdate in parent.rdates().into_iter().filter(|t| !split.is_after(t)) {
            head.add_rdate(rdate.clone())?;
        }
        for exdate in parent.exdates().into_iter().filter(|t| !split.is_after(t)) {
            head.add_exdate(exdate.clone())?;
        }
        self.touch(&mut head, parent.sequence())?;
        Ok(head)
    }
}

/// Where a series is cut in two.
#[derive(Debug)]
pub(super) struct Split {
    at: jiff::Timestamp,
    /// The rule of the part before, `None` when only RDATEs remain.
    head_rule: Option<RecurrenceRule>,
    /// Rule instances before the cut, counted when the rule has COUNT so the
    /// tail can keep the remainder.
    before: u32,
}

impl Split {
    pub(super) fn new(
        parent: &Component,
        start: &Temporal,
        selected: &Temporal,
        previous: &Temporal,
    ) -> Result<Self, RevisionError> {
        let at = selected.instant();
        let Some(rule) = parent.rrule() else {
            return Ok(Self {
                at,
                head_rule: None,
                before: 0,
            });
        };

        let mut before = 0;
        if rule.count().is_some() {
            let instances = RuleIter::new(start, rule).take_while(|t| t.instant() < at).count();
            before = u32::try_from(instances).unwrap_or(u32::MAX);
        }
        // the head always ends with UNTIL, COUNT only carries over to the tail
        let head_rule = if rule.count().is_some() && before == 0 {
            None
        } else {
            let mut rule = rule.clone();
            rule.end = RuleEnd::Until(split_until(previous, selected, start));
            Some(rule)
        };
        Ok(Self {
            at,
            head_rule,
            before,
        })
    }

    /// Whether a value belongs to the part from the cut on.
    pub(super) fn is_after(&self, value: &Temporal) -> bool {
        value.instant() >= self.at
    }
}

/// The rule of the new series starting at `start`.
fn tail_rule(
    original: Option<&RecurrenceRule>,
    edited: Option<&RecurrenceRule>,
    split: &Split,
    start: &Temporal,
) -> Result<Option<RecurrenceRule>, RevisionError> {
    let Some(edited) = edited else {
        return Ok(None);
    };
    let mut rule = edited.clone();
    match original {
        Some(original) if same_rule(original, edited) => match &original.end {
            RuleEnd::Count(count) => match count.saturating_sub(split.before) {
                0 => return Ok(None),
                remaining => rule = rule.with_count(remaining)?,
            },
            RuleEnd::Until(until) => rule.end = RuleEnd::Until(until_form(until, start)),
            RuleEnd::Forever => {}
        },
        _ => {
            if let Some(until) = edited.until() {
                rule.end = RuleEnd::Until(until_form(until, start));
            }
        }
    }
    Ok(Some(rule))
}
