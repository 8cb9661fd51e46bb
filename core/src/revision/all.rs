// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use recal_ical::{Component, PropertyKind, RuleEnd, Series, Temporal};

use crate::revision::timeline::{Shift, instance_end, reschedule, same_rule, until_form};
use crate::revision::{Clock, RevisionError, Reviser, check_occurrence, parent_of};

impl<C: Clock> Reviser<C> {
    /// Replace the whole series by `edited`, a new version of the parent.
    ///
    /// The move of DTSTART is applied to the RECURRENCE-ID of every override.
    /// Overrides that no longer match an occurrence are dropped.
    ///
    /// # Errors
    ///
    /// Fails when the series has no parent or a value moves out of range.
    #[tracing::instrument(skip_all, fields(uid = series.uid()))]
    pub fn revise_all(
        &self,
        series: &Series<'_>,
        edited: &Component,
    ) -> Result<Vec<Component>, RevisionError> {
        let parent = parent_of(series)?;
        if parent.rrule().is_some() && edited.rrule().is_none() {
            return self.become_non_recurring(series, edited);
        }
        self.revise_all_with(series, edited, true)
    }

    pub(super) fn revise_all_with(
        &self,
        series: &Series<'_>,
        edited: &Component,
        keep_overrides: bool,
    ) -> Result<Vec<Component>, RevisionError> {
        let parent = parent_of(series)?;
        let old_start = parent.dtstart().ok_or(RevisionError::MissingStart)?;
        let new_start = edited.dtstart().ok_or(RevisionError::MissingStart)?;
        let shift = Shift::between(old_start, new_start);

        let mut head = edited.clone();
        head.remove_property(PropertyKind::RecurrenceId);
        head.set_uid(series.uid())?;
        self.touch(&mut head, parent.sequence())?;

        let mut components = vec![];
        if keep_overrides {
            for &existing in series.overrides() {
                let Some(id) = existing.recurrence_id() else {
                    continue;
                };
                let moved = shift.apply(id)?;
                if !head.is_occurrence(&moved)? {
                    tracing::debug!(recurrence_id = %id, "override no longer matches, dropped");
                    continue;
                }
                let mut child = existing.clone();
                child.set_recurrence_id(moved)?;
                self.touch(&mut child, head.sequence() - 1)?;
                components.push(child);
            }
        }
        components.insert(0, head);
        Ok(components)
    }

    /// The series collapses into the one edited instance.
    pub(super) fn become_non_recurring(
        &self,
        series: &Series<'_>,
        edited: &Component,
    ) -> Result<Vec<Component>, RevisionError> {
        let parent = parent_of(series)?;
        let start = edited.dtstart().cloned().ok_or(RevisionError::MissingStart)?;
        let end = instance_end(edited).cloned();

        let mut single = edited.clone();
        for kind in [
            PropertyKind::RecurrenceId,
            PropertyKind::RRule,
            PropertyKind::RDate,
            PropertyKind::ExDate,
        ] {
            single.remove_property(kind);
        }
        reschedule(&mut single, start, end)?;
        single.set_uid(series.uid())?;
        self.touch(&mut single, parent.sequence())?;
        tracing::debug!(dropped = series.overrides().len(), "series no longer recurs");
        Ok(vec![single])
    }
}

/// Turn the edit of one occurrence into a new version of the parent.
///
/// The parent moves by as much as the occurrence did. Its RDATE and EXDATE
/// move along, as does UNTIL when the rule is otherwise unchanged. Everything
/// else comes from `edited`.
pub(super) fn series_snapshot(
    series: &Series<'_>,
    edited: &Component,
    original: &Temporal,
) -> Result<Component, RevisionError> {
    let parent = parent_of(series)?;
    let start = parent.dtstart().ok_or(RevisionError::MissingStart)?;
    let original = original.retag_like(start);
    check_occurrence(series, parent, &original)?;

    let edited_start = edited.dtstart().ok_or(RevisionError::MissingStart)?;
    let shift = Shift::between(&original, edited_start);
    let new_start = shift.apply(start)?;
    let new_end = match edited.instance_length() {
        Some(length) if instance_end(edited).is_some() => Some(new_start.shifted(length)?),
        _ => None,
    };

    let rule = match (parent.rrule(), edited.rrule()) {
        (Some(old), Some(new)) if same_rule(old, new) => {
            let mut rule = old.clone();
            if let RuleEnd::Until(until) = &old.end {
                rule.end = RuleEnd::Until(until_form(&shift.apply(until)?, &new_start));
            }
            Some(rule)
        }
        (_, Some(new)) => {
            let mut rule = new.clone();
            if let RuleEnd::Until(until) = &new.end {
                rule.end = RuleEnd::Until(until_form(until, &new_start));
            }
            Some(rule)
        }
        (_, None) => None,
    };

    let mut snapshot = edited.clone();
    for kind in [
        PropertyKind::RecurrenceId,
        PropertyKind::RRule,
        PropertyKind::RDate,
        PropertyKind::ExDate,
    ] {
        snapshot.remove_property(kind);
    }
    reschedule(&mut snapshot, new_start, new_end)?;
    if let Some(rule) = rule {
        snapshot.set_rrule(rule)?;
    }
    for rdate in parent.rdates() {
        snapshot.add_rdate(shift.apply(rdate)?)?;
    }
    for exdate in parent.exdates() {
        snapshot.add_exdate(shift.apply(exdate)?)?;
    }
    Ok(snapshot)
}
