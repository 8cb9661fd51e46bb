// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Resumable expansion state kept on a component.

use jiff::Timestamp;

use crate::recurrence::RuleIter;
use crate::value::{RecurrenceRule, Temporal};

/// Iterator snapshots are kept every this many instants.
const CHECKPOINT_EVERY: usize = 64;

/// Snapshots of the expansion of one (DTSTART, RRULE) pair.
///
/// The cache is keyed by the pair it was built from and thrown away as soon
/// as the component no longer has that pair, so it never has to be told
/// about mutations.
#[derive(Debug, Clone)]
pub(crate) struct RecurrenceCache {
    start: Temporal,
    rule: RecurrenceRule,
    checkpoints: Vec<Checkpoint>,
    frontier: RuleIter,
    frontier_last: Option<Timestamp>,
    produced: usize,
    exhausted: bool,
}

#[derive(Debug, Clone)]
struct Checkpoint {
    /// Last instant produced before this state, none for the fresh state.
    last: Option<Timestamp>,
    iter: RuleIter,
}

impl RecurrenceCache {
    pub(crate) fn new(start: &Temporal, rule: &RecurrenceRule) -> Self {
        let iter = RuleIter::new(start, rule);
        Self {
            start: start.clone(),
            rule: rule.clone(),
            checkpoints: vec![Checkpoint {
                last: None,
                iter: iter.clone(),
            }],
            frontier: iter,
            frontier_last: None,
            produced: 0,
            exhausted: false,
        }
    }

    pub(crate) fn is_for(&self, start: &Temporal, rule: &RecurrenceRule) -> bool {
        self.start == *start && self.rule == *rule
    }

    /// An iterator whose first item is the first instant at or after `from`.
    pub(crate) fn iter_from(&mut self, from: Timestamp) -> RuleIter {
        self.extend_to(from);
        let index = self
            .checkpoints
            .partition_point(|c| c.last.is_none_or(|last| last < from));
        let mut iter = match self.checkpoints.get(index.saturating_sub(1)) {
            Some(checkpoint) => checkpoint.iter.clone(),
            None => RuleIter::new(&self.start, &self.rule),
        };
        iter.skip_before(from);
        iter
    }

    fn extend_to(&mut self, from: Timestamp) {
        while !self.exhausted && self.frontier_last.is_none_or(|last| last < from) {
            let Some(next) = self.frontier.next() else {
                self.exhausted = true;
                break;
            };
            let instant = next.instant();
            self.produced += 1;
            self.frontier_last = Some(instant);
            if self.produced % CHECKPOINT_EVERY == 0 {
                self.checkpoints.push(Checkpoint {
                    last: Some(instant),
                    iter: self.frontier.clone(),
                });
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn checkpoints(&self) -> usize {
        self.checkpoints.len()
    }
}
