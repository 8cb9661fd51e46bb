// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Calendar components: ordered properties plus nested sub-components.
//!
//! One [`Component`] type serves every kind. What a kind requires and allows
//! is looked up in a capability table, see [`ComponentKind`]. Mutation goes
//! through explicit methods that fail fast on inconsistent input, while parsed
//! input is kept as it is and checked by [`Component::validate`].

mod kind;
mod validate;

use std::cell::RefCell;
use std::fmt;

use crate::property::{DuplicateParameterError, Property, PropertyKind};
use crate::recurrence::RecurrenceCache;
use crate::syntax::ParseError;
use crate::value::{RecurrenceRule, Temporal, TemporalTag, Value, ValueDuration};

pub use crate::component::kind::ComponentKind;

/// Errors of the fail-fast component setters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComponentError {
    /// The change would leave the component inconsistent.
    #[error("{0}")]
    Consistency(String),

    /// A property that may appear once is already present.
    #[error("{component} already has a {property} property")]
    DuplicateProperty {
        /// Component name
        component: String,
        /// Property name
        property: String,
    },

    /// A parameter attached twice.
    #[error(transparent)]
    DuplicateParameter(#[from] DuplicateParameterError),

    /// Both properties of an exclusive pair.
    #[error("{first} and {second} are mutually exclusive in {component}")]
    MutuallyExclusive {
        /// Component name
        component: String,
        /// The property already present
        first: PropertyKind,
        /// The property being added
        second: PropertyKind,
    },
}

/// A calendar component.
pub struct Component {
    pub(crate) kind: ComponentKind,
    pub(crate) properties: Vec<Property>,
    pub(crate) children: Vec<Component>,
    pub(crate) parse_errors: Vec<ParseError>,
    pub(crate) cache: RefCell<Option<RecurrenceCache>>,
}

impl Component {
    /// Create an empty component.
    #[must_use]
    pub const fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            properties: Vec::new(),
            children: Vec::new(),
            parse_errors: Vec::new(),
            cache: RefCell::new(None),
        }
    }

    /// The kind of this component.
    #[must_use]
    pub const fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// Properties in order.
    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// The first property of a kind.
    #[must_use]
    pub fn property(&self, kind: PropertyKind) -> Option<&Property> {
        self.properties.iter().find(|p| p.is(kind))
    }

    /// All properties of a kind.
    pub fn properties_of(&self, kind: PropertyKind) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(move |p| p.is(kind))
    }

    /// The first property with a name, ignoring ASCII case.
    #[must_use]
    pub fn property_named(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|p| p.name().as_str().eq_ignore_ascii_case(name))
    }

    /// Nested components.
    #[must_use]
    pub fn children(&self) -> &[Component] {
        &self.children
    }

    /// Nested components, mutable.
    pub fn children_mut(&mut self) -> &mut Vec<Component> {
        &mut self.children
    }

    /// Nest a component.
    pub fn add_child(&mut self, child: Component) {
        self.children.push(child);
    }

    /// Errors found on the lines of this component while parsing.
    #[must_use]
    pub fn parse_errors(&self) -> &[ParseError] {
        &self.parse_errors
    }

    /// Add a property, checking cardinality, exclusive pairs and the form of
    /// temporal values against DTSTART.
    ///
    /// # Errors
    ///
    /// Fails without changing the component when the property would make it
    /// inconsistent.
    pub fn add_property(&mut self, property: Property) -> Result<(), ComponentError> {
        if let Some(kind) = property.kind() {
            if !self.kind.allows_repeated(kind) && self.property(kind).is_some() {
                return Err(ComponentError::DuplicateProperty {
                    component: self.kind.to_string(),
                    property: kind.to_string(),
                });
            }
            self.check_exclusive(kind)?;
            self.check_temporal_form(&property)?;
        }
        self.properties.push(property);
        Ok(())
    }

    /// Replace every property of the same name, keeping the position of the
    /// first one.
    ///
    /// # Errors
    ///
    /// Fails without changing the component when the property would make it
    /// inconsistent.
    pub fn set_property(&mut self, property: Property) -> Result<(), ComponentError> {
        if let Some(kind) = property.kind() {
            self.check_exclusive(kind)?;
            self.check_temporal_form(&property)?;
        }

        let name = property.name().clone();
        let position = self.properties.iter().position(|p| *p.name() == name);
        self.properties.retain(|p| *p.name() != name);
        match position {
            Some(position) => self.properties.insert(position, property),
            None => self.properties.push(property),
        }
        Ok(())
    }

    /// Remove every property of a kind, returning them.
    pub fn remove_property(&mut self, kind: PropertyKind) -> Vec<Property> {
        let (removed, kept) = std::mem::take(&mut self.properties)
            .into_iter()
            .partition(|p| p.is(kind));
        self.properties = kept;
        removed
    }

    /// Remove every property with a name, ignoring ASCII case.
    pub fn remove_property_named(&mut self, name: &str) -> Vec<Property> {
        let (removed, kept) = std::mem::take(&mut self.properties)
            .into_iter()
            .partition(|p| p.name().as_str().eq_ignore_ascii_case(name));
        self.properties = kept;
        removed
    }

    /// Push a property without any check, used for parsed input.
    pub(crate) fn push_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    fn check_exclusive(&self, kind: PropertyKind) -> Result<(), ComponentError> {
        for &(a, b) in self.kind.spec().exclusive {
            let other = match kind {
                k if k == a => b,
                k if k == b => a,
                _ => continue,
            };
            if self.property(other).is_some() {
                return Err(ComponentError::MutuallyExclusive {
                    component: self.kind.to_string(),
                    first: other,
                    second: kind,
                });
            }
        }
        Ok(())
    }

    fn check_temporal_form(&self, property: &Property) -> Result<(), ComponentError> {
        let Some(kind) = property.kind().filter(|k| k.is_temporal()) else {
            return Ok(());
        };
        let values = property.value().temporals();

        if kind == PropertyKind::DtStart {
            let Some(start) = values.first() else {
                return Ok(());
            };
            for other in self.properties.iter().filter(|p| !p.is(PropertyKind::DtStart)) {
                if let Some(other_kind) = other.kind().filter(|k| k.is_temporal()) {
                    check_same_form(other_kind, &other.value().temporals(), start.tag())?;
                }
            }
            if let Some(rule) = self.rrule() {
                check_until_form(start, rule)?;
            }
            return Ok(());
        }

        match self.dtstart() {
            Some(start) => check_same_form(kind, &values, start.tag()),
            None => Ok(()),
        }
    }

    /// Identifier of the series this component belongs to.
    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.property(PropertyKind::Uid)?.value().as_text()
    }

    /// Summary text.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.property(PropertyKind::Summary)?.value().as_text()
    }

    /// Start of the component, the first instance of a recurrence set.
    #[must_use]
    pub fn dtstart(&self) -> Option<&Temporal> {
        self.property(PropertyKind::DtStart)?.as_temporal()
    }

    /// Explicit end.
    #[must_use]
    pub fn dtend(&self) -> Option<&Temporal> {
        self.property(PropertyKind::DtEnd)?.as_temporal()
    }

    /// Due time of a to-do.
    #[must_use]
    pub fn due(&self) -> Option<&Temporal> {
        self.property(PropertyKind::Due)?.as_temporal()
    }

    /// Duration of the component.
    #[must_use]
    pub fn duration(&self) -> Option<ValueDuration> {
        match self.property(PropertyKind::Duration)?.value() {
            Value::Duration(duration) => Some(*duration),
            _ => None,
        }
    }

    /// Recurrence rule.
    #[must_use]
    pub fn rrule(&self) -> Option<&RecurrenceRule> {
        match self.property(PropertyKind::RRule)?.value() {
            Value::Recur(rule) => Some(rule),
            _ => None,
        }
    }

    /// Every EXDATE entry.
    #[must_use]
    pub fn exdates(&self) -> Vec<&Temporal> {
        self.temporal_entries(PropertyKind::ExDate)
    }

    /// Every RDATE entry, the start of period entries.
    #[must_use]
    pub fn rdates(&self) -> Vec<&Temporal> {
        self.temporal_entries(PropertyKind::RDate)
    }

    fn temporal_entries(&self, kind: PropertyKind) -> Vec<&Temporal> {
        self.properties_of(kind)
            .filter(|p| p.error().is_none())
            .flat_map(|p| p.value().temporals())
            .collect()
    }

    /// The original start of the instance an override replaces.
    #[must_use]
    pub fn recurrence_id(&self) -> Option<&Temporal> {
        self.property(PropertyKind::RecurrenceId)?.as_temporal()
    }

    /// Revision sequence number, 0 when absent.
    #[must_use]
    pub fn sequence(&self) -> i32 {
        match self.property(PropertyKind::Sequence).map(Property::value) {
            Some(Value::Integer(sequence)) => *sequence,
            _ => 0,
        }
    }

    /// Whether the component has a recurrence rule or recurrence dates.
    #[must_use]
    pub fn is_recurring(&self) -> bool {
        self.property(PropertyKind::RRule).is_some() || self.property(PropertyKind::RDate).is_some()
    }

    /// Whether the component replaces one instance of a series.
    #[must_use]
    pub fn is_override(&self) -> bool {
        self.property(PropertyKind::RecurrenceId).is_some()
    }

    /// How long each instance lasts: DTEND or DUE minus DTSTART, or DURATION.
    #[must_use]
    pub fn instance_length(&self) -> Option<jiff::SignedDuration> {
        if let Some(duration) = self.duration() {
            return Some(duration.to_signed_duration());
        }
        let start = self.dtstart()?;
        let end = self.dtend().or_else(|| self.due())?;
        Some(start.civil_until(end))
    }

    /// Set DTSTART.
    ///
    /// # Errors
    ///
    /// Fails when other temporal properties have another form.
    pub fn set_dtstart(&mut self, start: Temporal) -> Result<(), ComponentError> {
        self.set_property(Property::temporal(PropertyKind::DtStart, start))
    }

    /// Set DTEND.
    ///
    /// # Errors
    ///
    /// Fails when DURATION is present or the form differs from DTSTART.
    pub fn set_dtend(&mut self, end: Temporal) -> Result<(), ComponentError> {
        self.set_property(Property::temporal(PropertyKind::DtEnd, end))
    }

    /// Set DUE.
    ///
    /// # Errors
    ///
    /// Fails when DURATION is present or the form differs from DTSTART.
    pub fn set_due(&mut self, due: Temporal) -> Result<(), ComponentError> {
        self.set_property(Property::temporal(PropertyKind::Due, due))
    }

    /// Set DURATION.
    ///
    /// # Errors
    ///
    /// Fails when DTEND or DUE is present.
    pub fn set_duration(&mut self, duration: ValueDuration) -> Result<(), ComponentError> {
        self.set_property(Property::new(PropertyKind::Duration, Value::Duration(duration)))
    }

    /// Set RRULE.
    ///
    /// # Errors
    ///
    /// Fails when the form of UNTIL does not suit DTSTART.
    pub fn set_rrule(&mut self, rule: RecurrenceRule) -> Result<(), ComponentError> {
        if let Some(start) = self.dtstart() {
            check_until_form(start, &rule)?;
        }
        self.set_property(Property::new(PropertyKind::RRule, Value::Recur(rule)))
    }

    /// Exclude an instance, appending to an EXDATE line of the same form.
    ///
    /// # Errors
    ///
    /// Fails when the form differs from DTSTART.
    pub fn add_exdate(&mut self, exdate: Temporal) -> Result<(), ComponentError> {
        self.add_temporal_entry(PropertyKind::ExDate, exdate)
    }

    /// Add an extra instance, appending to an RDATE line of the same form.
    ///
    /// # Errors
    ///
    /// Fails when the form differs from DTSTART.
    pub fn add_rdate(&mut self, rdate: Temporal) -> Result<(), ComponentError> {
        self.add_temporal_entry(PropertyKind::RDate, rdate)
    }

    fn add_temporal_entry(&mut self, kind: PropertyKind, entry: Temporal) -> Result<(), ComponentError> {
        let property = Property::new(kind, Value::Temporals(vec![entry.clone()]));
        self.check_temporal_form(&property)?;

        let same_line = self.properties.iter_mut().find(|p| {
            p.is(kind)
                && p.error().is_none()
                && matches!(p.value(), Value::Temporals(list)
                    if list.first().is_some_and(|t| t.tag() == entry.tag() && t.tzid() == entry.tzid()))
        });
        match same_line {
            Some(line) => {
                if let Value::Temporals(list) = line.value() {
                    let mut list = list.clone();
                    list.push(entry);
                    line.set_value(Value::Temporals(list));
                }
            }
            None => self.properties.push(property),
        }
        Ok(())
    }

    /// Set RECURRENCE-ID.
    ///
    /// The form is checked against the DTSTART of the series, see
    /// [`Calendar::validate`](crate::Calendar::validate).
    ///
    /// # Errors
    ///
    /// Never fails today, kept fallible like the other setters.
    pub fn set_recurrence_id(&mut self, id: Temporal) -> Result<(), ComponentError> {
        self.set_property(Property::temporal(PropertyKind::RecurrenceId, id))
    }

    /// Set UID.
    ///
    /// # Errors
    ///
    /// Never fails today, kept fallible like the other setters.
    pub fn set_uid(&mut self, uid: impl Into<String>) -> Result<(), ComponentError> {
        self.set_property(Property::text(PropertyKind::Uid, uid))
    }

    /// Set SUMMARY.
    ///
    /// # Errors
    ///
    /// Never fails today, kept fallible like the other setters.
    pub fn set_summary(&mut self, summary: impl Into<String>) -> Result<(), ComponentError> {
        self.set_property(Property::text(PropertyKind::Summary, summary))
    }

    /// Set DTSTAMP, converted to UTC.
    ///
    /// # Errors
    ///
    /// Fails when the stamp is a date.
    pub fn set_dtstamp(&mut self, stamp: &Temporal) -> Result<(), ComponentError> {
        if stamp.is_date() {
            return Err(ComponentError::Consistency(
                "DTSTAMP must be a date-time".to_owned(),
            ));
        }
        self.set_property(Property::temporal(PropertyKind::DtStamp, stamp.to_utc()))
    }

    /// Set SEQUENCE.
    ///
    /// # Errors
    ///
    /// Fails for negative numbers.
    pub fn set_sequence(&mut self, sequence: i32) -> Result<(), ComponentError> {
        if sequence < 0 {
            return Err(ComponentError::Consistency(
                "SEQUENCE must not be negative".to_owned(),
            ));
        }
        self.set_property(Property::new(PropertyKind::Sequence, Value::Integer(sequence)))
    }

    /// Increment SEQUENCE by one.
    ///
    /// # Errors
    ///
    /// Fails when the sequence would overflow.
    pub fn increment_sequence(&mut self) -> Result<(), ComponentError> {
        let next = self
            .sequence()
            .checked_add(1)
            .ok_or_else(|| ComponentError::Consistency("SEQUENCE overflows".to_owned()))?;
        self.set_sequence(next)
    }

    /// Builder for [`Component::add_property`].
    ///
    /// # Errors
    ///
    /// See [`Component::add_property`].
    pub fn with_property(mut self, property: Property) -> Result<Self, ComponentError> {
        self.add_property(property)?;
        Ok(self)
    }

    /// Builder for [`Component::set_uid`].
    ///
    /// # Errors
    ///
    /// See [`Component::set_uid`].
    pub fn with_uid(mut self, uid: impl Into<String>) -> Result<Self, ComponentError> {
        self.set_uid(uid)?;
        Ok(self)
    }

    /// Builder for [`Component::set_summary`].
    ///
    /// # Errors
    ///
    /// See [`Component::set_summary`].
    pub fn with_summary(mut self, summary: impl Into<String>) -> Result<Self, ComponentError> {
        self.set_summary(summary)?;
        Ok(self)
    }

    /// Builder for [`Component::set_dtstart`].
    ///
    /// # Errors
    ///
    /// See [`Component::set_dtstart`].
    pub fn with_dtstart(mut self, start: Temporal) -> Result<Self, ComponentError> {
        self.set_dtstart(start)?;
        Ok(self)
    }

    /// Builder for [`Component::set_dtend`].
    ///
    /// # Errors
    ///
    /// See [`Component::set_dtend`].
    pub fn with_dtend(mut self, end: Temporal) -> Result<Self, ComponentError> {
        self.set_dtend(end)?;
        Ok(self)
    }

    /// Builder for [`Component::set_due`].
    ///
    /// # Errors
    ///
    /// See [`Component::set_due`].
    pub fn with_due(mut self, due: Temporal) -> Result<Self, ComponentError> {
        self.set_due(due)?;
        Ok(self)
    }

    /// Builder for [`Component::set_duration`].
    ///
    /// # Errors
    ///
    /// See [`Component::set_duration`].
    pub fn with_duration(mut self, duration: ValueDuration) -> Result<Self, ComponentError> {
        self.set_duration(duration)?;
        Ok(self)
    }

    /// Builder for [`Component::set_rrule`].
    ///
    /// # Errors
    ///
    /// See [`Component::set_rrule`].
    pub fn with_rrule(mut self, rule: RecurrenceRule) -> Result<Self, ComponentError> {
        self.set_rrule(rule)?;
        Ok(self)
    }

    /// Builder for [`Component::add_exdate`].
    ///
    /// # Errors
    ///
    /// See [`Component::add_exdate`].
    pub fn with_exdate(mut self, exdate: Temporal) -> Result<Self, ComponentError> {
        self.add_exdate(exdate)?;
        Ok(self)
    }

    /// Builder for [`Component::add_rdate`].
    ///
    /// # Errors
    ///
    /// See [`Component::add_rdate`].
    pub fn with_rdate(mut self, rdate: Temporal) -> Result<Self, ComponentError> {
        self.add_rdate(rdate)?;
        Ok(self)
    }

    /// Builder for [`Component::set_recurrence_id`].
    ///
    /// # Errors
    ///
    /// See [`Component::set_recurrence_id`].
    pub fn with_recurrence_id(mut self, id: Temporal) -> Result<Self, ComponentError> {
        self.set_recurrence_id(id)?;
        Ok(self)
    }

    /// Builder for [`Component::set_sequence`].
    ///
    /// # Errors
    ///
    /// See [`Component::set_sequence`].
    pub fn with_sequence(mut self, sequence: i32) -> Result<Self, ComponentError> {
        self.set_sequence(sequence)?;
        Ok(self)
    }

    /// Builder for [`Component::set_dtstamp`].
    ///
    /// # Errors
    ///
    /// See [`Component::set_dtstamp`].
    pub fn with_dtstamp(mut self, stamp: &Temporal) -> Result<Self, ComponentError> {
        self.set_dtstamp(stamp)?;
        Ok(self)
    }

    /// Builder for [`Component::add_child`].
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.add_child(child);
        self
    }
}

fn check_same_form(
    kind: PropertyKind,
    values: &[&Temporal],
    expected: TemporalTag,
) -> Result<(), ComponentError> {
    match values.iter().find(|t| t.tag() != expected) {
        Some(t) => Err(ComponentError::Consistency(format!(
            "{kind} must have the same form as DTSTART, expected {expected}, found {}",
            t.tag()
        ))),
        None => Ok(()),
    }
}

/// The form UNTIL must have for a DTSTART: a date for a date, floating for
/// floating and UTC for UTC or zoned starts.
pub(crate) const fn until_tag_for(start: TemporalTag) -> TemporalTag {
    match start {
        TemporalTag::Date => TemporalTag::Date,
        TemporalTag::Floating => TemporalTag::Floating,
        TemporalTag::Utc | TemporalTag::Zoned => TemporalTag::Utc,
    }
}

fn check_until_form(start: &Temporal, rule: &RecurrenceRule) -> Result<(), ComponentError> {
    let expected = until_tag_for(start.tag());
    match rule.until() {
        Some(until) if until.tag() != expected => Err(ComponentError::Consistency(format!(
            "UNTIL must be {expected} for a DTSTART of form {}, found {}",
            start.tag(),
            until.tag()
        ))),
        _ => Ok(()),
    }
}

impl Clone for Component {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            properties: self.properties.clone(),
            children: self.children.clone(),
            parse_errors: self.parse_errors.clone(),
            cache: RefCell::new(None),
        }
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.properties == other.properties
            && self.children == other.children
            && self.parse_errors == other.parse_errors
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("kind", &self.kind)
            .field("properties", &self.properties)
            .field("children", &self.children)
            .field("parse_errors", &self.parse_errors)
            .finish_non_exhaustive()
    }
}
