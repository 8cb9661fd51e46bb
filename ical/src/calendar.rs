// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! The VCALENDAR root and its UID index.
//!
//! Components hold no references to each other. Everything that relates a
//! series parent to its overrides goes through [`Calendar`], which owns the
//! only mapping from UID to component positions.

use std::collections::BTreeMap;

use crate::component::{Component, ComponentError, ComponentKind};
use crate::keyword::KW_VERSION_2_0;
use crate::property::{Property, PropertyKind};
use crate::recurrence::{RecurrenceError, same_occurrence};
use crate::value::Temporal;

/// A calendar object with an index of its components by UID.
#[derive(Debug, Clone, PartialEq)]
pub struct Calendar {
    root: Component,
    index: BTreeMap<String, Vec<usize>>,
}

/// A parent component and the overrides sharing its UID.
#[derive(Debug, Clone)]
pub struct Series<'a> {
    uid: &'a str,
    parent: Option<&'a Component>,
    overrides: Vec<&'a Component>,
}

/// One instance of a component in a time range.
#[derive(Debug, Clone)]
pub struct Instance<'a> {
    /// The component the instance belongs to, an override when one replaces it.
    pub component: &'a Component,
    /// Start of the instance.
    pub start: Temporal,
    /// End of the instance, when the component has a length.
    pub end: Option<Temporal>,
}

impl Calendar {
    /// An empty calendar with PRODID and VERSION set.
    #[must_use]
    pub fn new(prod_id: impl Into<String>) -> Self {
        let mut root = Component::new(ComponentKind::Calendar);
        root.push_property(Property::text(PropertyKind::ProdId, prod_id));
        root.push_property(Property::text(PropertyKind::Version, KW_VERSION_2_0));
        Self::from_root(root)
    }

    /// Index an existing root component.
    #[must_use]
    pub fn from_root(root: Component) -> Self {
        let mut calendar = Self {
            root,
            index: BTreeMap::new(),
        };
        calendar.reindex();
        calendar
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, child) in self.root.children.iter().enumerate() {
            if let Some(uid) = child.uid() {
                self.index.entry(uid.to_owned()).or_default().push(i);
            }
        }
    }

    /// The VCALENDAR component.
    #[must_use]
    pub const fn root(&self) -> &Component {
        &self.root
    }

    /// Give up the index and return the VCALENDAR component.
    #[must_use]
    pub fn into_root(self) -> Component {
        self.root
    }

    /// Top-level components.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        self.root.children()
    }

    /// Every UID in the calendar, sorted.
    pub fn uids(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// The series with a UID.
    #[must_use]
    pub fn series(&self, uid: &str) -> Option<Series<'_>> {
        let (uid, positions) = self.index.get_key_value(uid)?;
        let mut series = Series {
            uid,
            parent: None,
            overrides: Vec::new(),
        };
        for component in positions.iter().filter_map(|&i| self.root.children.get(i)) {
            if component.is_override() {
                series.overrides.push(component);
            } else if series.parent.is_none() {
                series.parent = Some(component);
            }
        }
        Some(series)
    }

    /// Append a top-level component.
    pub fn add_component(&mut self, component: Component) {
        self.root.children.push(component);
        self.reindex();
    }

    /// Remove every component of a series, returning them.
    pub fn remove_series(&mut self, uid: &str) -> Vec<Component> {
        let (removed, kept) = std::mem::take(&mut self.root.children)
            .into_iter()
            .partition(|c| c.uid() == Some(uid));
        self.root.children = kept;
        self.reindex();
        removed
    }

    /// Replace the series `uid` by the components a revision produced.
    ///
    /// The new components take the place of the first component of the old
    /// series, or go to the end when the UID was unknown.
    ///
    /// # Errors
    ///
    /// Fails, leaving the calendar untouched, when the RECURRENCE-ID of an
    /// override does not have the form of the DTSTART of its parent.
    pub fn apply_revision(
        &mut self,
        uid: &str,
        components: Vec<Component>,
    ) -> Result<(), ComponentError> {
        check_override_forms(&components)?;
        let position = self
            .root
            .children
            .iter()
            .position(|c| c.uid() == Some(uid))
            .unwrap_or(self.root.children.len());
        self.root.children.retain(|c| c.uid() != Some(uid));
        let position = position.min(self.root.children.len());
        self.root.children.splice(position..position, components);
        self.reindex();
        tracing::debug!(uid, "applied revision");
        Ok(())
    }

    /// Instances of the series `uid` starting in `[start, end)`, with the
    /// instances replaced by overrides left out.
    ///
    /// # Errors
    ///
    /// Fails for an unknown UID or a parent without DTSTART.
    pub fn stream_occurrences(
        &self,
        uid: &str,
        start: &Temporal,
        end: &Temporal,
    ) -> Result<impl Iterator<Item = Temporal> + use<>, RecurrenceError> {
        let series = self
            .series(uid)
            .ok_or_else(|| RecurrenceError::UnknownUid(uid.to_owned()))?;
        let parent = series
            .parent
            .ok_or_else(|| RecurrenceError::UnknownUid(uid.to_owned()))?;
        let occurrences = parent.occurrences_with(Some(start), series.override_ids())?;
        let end = end.instant();
        Ok(occurrences.take_while(move |t| t.instant() < end))
    }

    /// Every instance of every event, to-do and journal starting in
    /// `[start, end)`, overrides in place of the instances they replace.
    ///
    /// Components without DTSTART have no instances.
    #[must_use]
    pub fn expand(&self, start: &Temporal, end: &Temporal) -> Vec<Instance<'_>> {
        let (from, until) = (start.instant(), end.instant());
        let mut instances = Vec::new();
        let scheduled = self.root.children.iter().filter(|c| {
            matches!(
                c.kind(),
                ComponentKind::Event | ComponentKind::Todo | ComponentKind::Journal
            )
        });

        for component in scheduled {
            if component.is_override() {
                if let Some(own) = component.dtstart()
                    && own.instant() >= from
                    && own.instant() < until
                {
                    instances.push(Instance::new(component, own.clone()));
                }
                continue;
            }

            let excluded = component
                .uid()
                .and_then(|uid| self.series(uid))
                .map(|series| series.override_ids())
                .unwrap_or_default();
            let Ok(occurrences) = component.occurrences_with(Some(start), excluded) else {
                continue;
            };
            instances.extend(
                occurrences
                    .take_while(|t| t.instant() < until)
                    .map(|t| Instance::new(component, t)),
            );
        }

        instances.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then_with(|| a.component.uid().cmp(&b.component.uid()))
        });
        instances
    }

    /// Validate the calendar, including the checks that need the UID index.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.root.validate();
        for series in self.index.keys().filter_map(|uid| self.series(uid)) {
            let Some(expected) = series.parent.and_then(Component::dtstart).map(Temporal::tag)
            else {
                continue;
            };
            for child in &series.overrides {
                if let Some(id) = child.recurrence_id()
                    && id.tag() != expected
                {
                    errors.push(format!(
                        "{}/{}[{}]: RECURRENCE-ID must have the same form as the DTSTART of its series, expected {expected}, found {}",
                        self.root.kind(),
                        child.kind(),
                        series.uid,
                        id.tag(),
                    ));
                }
            }
        }
        errors
    }
}

/// Overrides must carry their RECURRENCE-ID in the form of the DTSTART of
/// the parent among the same components. Each UID is its own series.
fn check_override_forms(components: &[Component]) -> Result<(), ComponentError> {
    for child in components.iter().filter(|c| c.is_override()) {
        let expected = components
            .iter()
            .find(|c| !c.is_override() && c.uid() == child.uid())
            .and_then(Component::dtstart)
            .map(Temporal::tag);
        if let (Some(expected), Some(id)) = (expected, child.recurrence_id())
            && id.tag() != expected
        {
            return Err(ComponentError::Consistency(format!(
                "RECURRENCE-ID must have the same form as the DTSTART of its series, expected {expected}, found {}",
                id.tag()
            )));
        }
    }
    Ok(())
}

impl<'a> Instance<'a> {
    fn new(component: &'a Component, start: Temporal) -> Self {
        let end = component
            .instance_length()
            .and_then(|length| start.shifted(length).ok());
        Self {
            component,
            start,
            end,
        }
    }
}

impl<'a> Series<'a> {
    /// The shared UID.
    #[must_use]
    pub const fn uid(&self) -> &'a str {
        self.uid
    }

    /// The component without RECURRENCE-ID, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<&'a Component> {
        self.parent
    }

    /// Components with a RECURRENCE-ID.
    #[must_use]
    pub fn overrides(&self) -> &[&'a Component] {
        &self.overrides
    }

    /// The override replacing the instance at `recurrence_id`.
    #[must_use]
    pub fn override_for(&self, recurrence_id: &Temporal) -> Option<&'a Component> {
        self.overrides
            .iter()
            .copied()
            .find(|c| c.recurrence_id().is_some_and(|id| same_occurrence(id, recurrence_id)))
    }

    /// RECURRENCE-ID of every override.
    #[must_use]
    pub fn override_ids(&self) -> Vec<Temporal> {
        self.overrides
            .iter()
            .filter_map(|c| c.recurrence_id())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::value::{RecurrenceFrequency, RecurrenceRule};

    fn floating(d: i8, h: i8) -> Temporal {
        Temporal::Floating(date(2025, 1, d).at(h, 0, 0, 0))
    }

    fn calendar() -> Calendar {
        let parent = Component::new(ComponentKind::Event)
            .with_uid("daily@example.com")
            .unwrap()
            .with_dtstart(floating(1, 9))
            .unwrap()
            .with_dtend(floating(1, 10))
            .unwrap()
            .with_rrule(
                RecurrenceRule::new(RecurrenceFrequency::Daily)
                    .with_count(5)
                    .unwrap(),
            )
            .unwrap();
        let moved = Component::new(ComponentKind::Event)
            .with_uid("daily@example.com")
            .unwrap()
            .with_recurrence_id(floating(2, 9))
            .unwrap()
            .with_dtstart(floating(2, 15))
            .unwrap();
        let single = Component::new(ComponentKind::Event)
            .with_uid("single@example.com")
            .unwrap()
            .with_dtstart(floating(3, 12))
            .unwrap();

        let mut calendar = Calendar::new("-//recal//test//EN");
        calendar.add_component(parent);
        calendar.add_component(moved);
        calendar.add_component(single);
        calendar
    }

    #[test]
    fn indexes_series() {
        let calendar = calendar();
        assert_eq!(
            calendar.uids().collect::<Vec<_>>(),
            ["daily@example.com", "single@example.com"]
        );
        let series = calendar.series("daily@example.com").unwrap();
        assert!(series.parent().is_some());
        assert_eq!(series.overrides().len(), 1);
        assert!(series.override_for(&floating(2, 9)).is_some());
        assert!(calendar.series("missing").is_none());
    }

    #[test]
    fn subtracts_overrides() {
        let calendar = calendar();
        let got: Vec<_> = calendar
            .stream_occurrences("daily@example.com", &floating(1, 0), &floating(31, 0))
            .unwrap()
            .collect();
        assert_eq!(got, [floating(1, 9), floating(3, 9), floating(4, 9), floating(5, 9)]);
        assert!(matches!(
            calendar.stream_occurrences("missing", &floating(1, 0), &floating(2, 0)),
            Err(RecurrenceError::UnknownUid(_))
        ));
    }

    #[test]
    fn expands_with_overrides_in_place() {
        let calendar = calendar();
        let instances = calendar.expand(&floating(2, 0), &floating(4, 0));
        let got: Vec<_> = instances
            .iter()
            .map(|i| (i.start.clone(), i.component.is_override()))
            .collect();
        assert_eq!(
            got,
            [
                (floating(2, 15), true),
                (floating(3, 9), false),
                (floating(3, 12), false)
            ]
        );
        assert_eq!(instances.get(1).unwrap().end, Some(floating(3, 10)));
    }

    #[test]
    fn applies_revisions() {
        let mut calendar = calendar();
        let replacement = Component::new(ComponentKind::Event)
            .with_uid("daily@example.com")
            .unwrap()
            .with_dtstart(floating(6, 9))
            .unwrap();
        calendar.apply_revision("daily@example.com", vec![replacement]).unwrap();

        let series = calendar.series("daily@example.com").unwrap();
        assert!(series.overrides().is_empty());
        assert_eq!(
            calendar.components().first().unwrap().dtstart(),
            Some(&floating(6, 9))
        );
        assert_eq!(calendar.remove_series("single@example.com").len(), 1);
        assert_eq!(calendar.components().len(), 1);
    }

    #[test]
    fn rejects_revisions_with_mismatched_recurrence_id() {
        let mut calendar = calendar();
        let parent = calendar.components().first().cloned().unwrap();
        let mut child = Component::new(ComponentKind::Event)
            .with_uid("daily@example.com")
            .unwrap()
            .with_dtstart(Temporal::Date(date(2025, 1, 3)))
            .unwrap();
        child.set_recurrence_id(Temporal::Date(date(2025, 1, 3))).unwrap();

        let err = calendar
            .apply_revision("daily@example.com", vec![parent.clone(), child.clone()])
            .unwrap_err();
        assert!(matches!(err, ComponentError::Consistency(_)));
        assert_eq!(calendar.series("daily@example.com").unwrap().overrides().len(), 1);

        // the form of the parent decides, not the form of the child
        child.set_recurrence_id(floating(3, 9)).unwrap();
        calendar
            .apply_revision("daily@example.com", vec![parent, child])
            .unwrap();
        let series = calendar.series("daily@example.com").unwrap();
        assert!(series.override_for(&floating(3, 9)).is_some());
    }

    #[test]
    fn validates_recurrence_id_form() {
        let mut calendar = calendar();
        let mut bad = Component::new(ComponentKind::Event);
        bad.push_property(Property::text(PropertyKind::Uid, "daily@example.com"));
        bad.push_property(Property::temporal(
            PropertyKind::RecurrenceId,
            Temporal::Date(date(2025, 1, 3)),
        ));
        calendar.add_component(bad);
        assert!(
            calendar
                .validate()
                .iter()
                .any(|e| e.contains("RECURRENCE-ID must have the same form"))
        );
    }
}
