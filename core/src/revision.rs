// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Edits of recurring series.
//!
//! An edit names the occurrence it was made on and a scope. The reviser turns
//! the series, a parent with its overrides, into the components that
//! represent it afterwards:
//!
//! - [`ChangeScope::One`] adds or updates an override for the occurrence.
//! - [`ChangeScope::All`] rewrites the parent and moves every override along.
//! - [`ChangeScope::ThisAndFuture`] ends the series before the occurrence and
//!   starts a new series, with a fresh UID, at the edited occurrence.
//!
//! The result replaces the series in its calendar, see
//! [`Calendar::apply_revision`](recal_ical::Calendar::apply_revision).

mod all;
mod delete;
mod future;
mod one;
mod timeline;

use jiff::Timestamp;
use jiff::tz::TimeZone;
use recal_ical::{
    Component, ComponentError, PropertyKind, RecurrenceError, RuleEnd, Series, Temporal,
    same_occurrence,
};

use crate::config::Config;

pub use crate::revision::timeline::reschedule;

/// Errors of a single revision. The series is left as it was.
#[derive(Debug, thiserror::Error)]
pub enum RevisionError {
    /// The series has overrides only.
    #[error("series {0} has no parent component")]
    MissingParent(String),

    /// A component without DTSTART.
    #[error("component has no DTSTART")]
    MissingStart,

    /// The scope needs a recurring series.
    #[error("series {0} does not recur")]
    NotRecurring(String),

    /// The edited occurrence is not an instance of the series.
    #[error("{occurrence} is not an occurrence of {uid}")]
    OccurrenceNotFound {
        /// Series UID
        uid: String,
        /// The occurrence as written in iCalendar
        occurrence: String,
    },

    /// A change left a component inconsistent.
    #[error(transparent)]
    Component(#[from] ComponentError),

    /// The series could not be expanded.
    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),

    /// A date-time moved out of range.
    #[error("date-time out of range: {0}")]
    Range(#[from] jiff::Error),
}

/// Which occurrences an edit applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum ChangeScope {
    /// Only the edited occurrence.
    #[default]
    One,

    /// Every occurrence, overrides move with the series.
    All,

    /// Every occurrence, overrides are dropped.
    AllIgnoreRecurrences,

    /// The edited occurrence and every later one.
    ThisAndFuture,

    /// The edited occurrence and every later one, later overrides are dropped.
    ThisAndFutureIgnoreRecurrences,
}

impl ChangeScope {
    const fn keeps_overrides(self) -> bool {
        matches!(self, Self::One | Self::All | Self::ThisAndFuture)
    }
}

/// Source of the current time, stamped into DTSTAMP.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A fixed instant is a clock that never moves.
impl Clock for Timestamp {
    fn now(&self) -> Timestamp {
        *self
    }
}

/// Applies edits to series.
#[derive(Debug, Clone)]
pub struct Reviser<C = SystemClock> {
    config: Config,
    clock: C,
}

impl Reviser {
    /// A reviser on the system clock.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            config,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> Reviser<C> {
    /// Replace the clock.
    #[must_use]
    pub fn with_clock<D: Clock>(self, clock: D) -> Reviser<D> {
        Reviser {
            config: self.config,
            clock,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Apply an edit of `original` with the given scope.
    ///
    /// `edited` is a snapshot of the edited occurrence: its DTSTART and end
    /// are the new start and end of that occurrence and its RRULE is the rule
    /// the series follows from then on. See [`instance_of`] for a starting
    /// point. RDATE, EXDATE and RECURRENCE-ID of the snapshot are ignored.
    ///
    /// # Errors
    ///
    /// See [`RevisionError`].
    #[tracing::instrument(skip_all, fields(uid = series.uid(), original = %original))]
    pub fn revise(
        &self,
        series: &Series<'_>,
        edited: &Component,
        original: &Temporal,
        scope: ChangeScope,
    ) -> Result<Vec<Component>, RevisionError> {
        match scope {
            ChangeScope::One => self.revise_one(series, edited, original),
            ChangeScope::All | ChangeScope::AllIgnoreRecurrences => {
                let parent = parent_of(series)?;
                if parent.rrule().is_some() && edited.rrule().is_none() {
                    return self.become_non_recurring(series, edited);
                }
                let snapshot = all::series_snapshot(series, edited, original)?;
                self.revise_all_with(series, &snapshot, scope.keeps_overrides())
            }
            ChangeScope::ThisAndFuture | ChangeScope::ThisAndFutureIgnoreRecurrences => {
                self.revise_this_and_future_with(series, edited, original, scope.keeps_overrides())
            }
        }
    }

    /// Set DTSTAMP to now.
    fn stamp(&self, component: &mut Component) -> Result<(), RevisionError> {
        let now = Timestamp::from_second(self.clock.now().as_second())?;
        let now = TimeZone::UTC.to_datetime(now);
        component.set_dtstamp(&Temporal::Utc(now))?;
        Ok(())
    }

    /// Raise SEQUENCE above `base` and stamp the component.
    fn touch(&self, component: &mut Component, base: i32) -> Result<(), RevisionError> {
        component.set_sequence(base.max(component.sequence()))?;
        component.increment_sequence()?;
        self.stamp(component)
    }
}

/// A snapshot of one occurrence of a series, ready to be edited and passed
/// to [`Reviser::revise`].
///
/// The snapshot is the override of the occurrence when there is one, else
/// the parent moved to the occurrence without RDATE and EXDATE. Either way it
/// carries the RRULE of the series.
///
/// # Errors
///
/// Fails when the series has no parent or DTSTART, or when the occurrence is
/// not part of it.
pub fn instance_of(series: &Series<'_>, occurrence: &Temporal) -> Result<Component, RevisionError> {
    let parent = parent_of(series)?;
    let start = parent.dtstart().ok_or(RevisionError::MissingStart)?;
    let occurrence = occurrence.retag_like(start);
    check_occurrence(series, parent, &occurrence)?;

    if let Some(existing) = series.override_for(&occurrence) {
        let mut snapshot = existing.clone();
        snapshot.remove_property(PropertyKind::RecurrenceId);
        if let Some(mut rule) = parent.rrule().cloned() {
            let start = snapshot.dtstart().unwrap_or(&occurrence);
            if let Some(until) = rule.until() {
                rule.end = RuleEnd::Until(timeline::until_form(until, start));
            }
            snapshot.set_rrule(rule)?;
        }
        return Ok(snapshot);
    }

    let mut snapshot = parent.clone();
    snapshot.remove_property(PropertyKind::RDate);
    snapshot.remove_property(PropertyKind::ExDate);
    reschedule(&mut snapshot, occurrence, None)?;
    Ok(snapshot)
}

fn parent_of<'a>(series: &Series<'a>) -> Result<&'a Component, RevisionError> {
    series
        .parent()
        .ok_or_else(|| RevisionError::MissingParent(series.uid().to_owned()))
}

fn recurring_parent<'a>(series: &Series<'a>) -> Result<(&'a Component, &'a Temporal), RevisionError> {
    let parent = parent_of(series)?;
    if !parent.is_recurring() {
        return Err(RevisionError::NotRecurring(series.uid().to_owned()));
    }
    let start = parent.dtstart().ok_or(RevisionError::MissingStart)?;
    Ok((parent, start))
}

/// `occurrence` is in the form of the parent DTSTART.
fn check_occurrence(
    series: &Series<'_>,
    parent: &Component,
    occurrence: &Temporal,
) -> Result<(), RevisionError> {
    if series.override_for(occurrence).is_some() || parent.is_occurrence(occurrence)? {
        return Ok(());
    }
    Err(RevisionError::OccurrenceNotFound {
        uid: series.uid().to_owned(),
        occurrence: occurrence.to_string(),
    })
}

/// Whether `component` overrides `occurrence`.
fn same_id(component: &Component, occurrence: &Temporal) -> bool {
    component
        .recurrence_id()
        .is_some_and(|id| same_occurrence(id, occurrence))
}

/// The last instance of the parent before `selected`.
fn previous_occurrence(
    parent: &Component,
    selected: &Temporal,
) -> Result<Option<Temporal>, RevisionError> {
    let until = selected.instant();
    Ok(parent
        .occurrences()?
        .take_while(|t| t.instant() < until)
        .last())
}
