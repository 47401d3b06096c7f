//! Field schema: the static, ordered catalogue of form fields.
//!
//! A schema is built once at startup and never changes afterwards. Besides the
//! descriptors it owns the report layout, which is an ordering of its own:
//! the report groups fields differently from the entry form.

use crate::key::FieldKey;
use crate::snapshot::Snapshot;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// How a field's raw value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text, rendered as typed.
    Text,
    /// Whole number, rendered rounded to the nearest integer.
    Integer,
    /// Measurement, rendered with exactly one fractional digit.
    Decimal,
}

impl FieldKind {
    /// Returns true for kinds that carry a numeric value.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Decimal)
    }
}

/// Inclusive advisory bounds for a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if `value` lies within `[min, max]`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Describes a single form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Unique key, also the persisted property name.
    pub key: FieldKey,
    /// Label used on report lines.
    pub label: String,
    /// Label shown next to the input on the entry form.
    pub form_label: String,
    /// Value interpretation.
    pub kind: FieldKind,
    /// Unit appended after the bracketed value on report lines.
    pub unit: Option<String>,
    /// Advisory bounds.
    pub range: Option<FieldRange>,
    /// Position in entry and navigation order.
    pub order: u32,
}

impl FieldDescriptor {
    /// Creates a descriptor with matching report and form labels.
    #[must_use]
    pub fn new(key: impl Into<FieldKey>, label: impl Into<String>, kind: FieldKind, order: u32) -> Self {
        let label = label.into();
        Self {
            key: key.into(),
            form_label: label.clone(),
            label,
            kind,
            unit: None,
            range: None,
            order,
        }
    }

    /// Sets the report unit.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Sets the advisory range.
    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some(FieldRange::new(min, max));
        self
    }

    /// Sets a form label that differs from the report label.
    #[must_use]
    pub fn with_form_label(mut self, form_label: impl Into<String>) -> Self {
        self.form_label = form_label.into();
        self
    }

    /// Returns the unit, or an empty string.
    #[must_use]
    pub fn unit_str(&self) -> &str {
        self.unit.as_deref().unwrap_or("")
    }
}

/// One element of the report layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportItem {
    /// A single field line.
    Field { key: FieldKey },
    /// Two integer fields sharing one line, e.g. `- phases[2]/[10]`.
    Pair {
        label: String,
        first: FieldKey,
        second: FieldKey,
    },
    /// A separator made of `n` line breaks.
    Blank { lines: usize },
}

impl ReportItem {
    #[must_use]
    pub fn field(key: &str) -> Self {
        Self::Field { key: key.into() }
    }

    #[must_use]
    pub fn pair(label: &str, first: &str, second: &str) -> Self {
        Self::Pair {
            label: label.to_string(),
            first: first.into(),
            second: second.into(),
        }
    }

    #[must_use]
    pub const fn blank(lines: usize) -> Self {
        Self::Blank { lines }
    }

    /// Fields rendered by this item.
    #[must_use]
    pub fn field_keys(&self) -> Vec<&FieldKey> {
        match self {
            Self::Field { key } => vec![key],
            Self::Pair { first, second, .. } => vec![first, second],
            Self::Blank { .. } => Vec::new(),
        }
    }
}

/// The ordered field catalogue plus its report layout.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Descriptors sorted by `order`.
    fields: Vec<FieldDescriptor>,
    /// Key to position in `fields`.
    index: HashMap<FieldKey, usize>,
    layout: Vec<ReportItem>,
}

impl FieldSchema {
    /// Builds a schema, checking that keys are unique, that `order` values
    /// are contiguous, and that the layout only names known fields.
    pub fn new(mut fields: Vec<FieldDescriptor>, layout: Vec<ReportItem>) -> Result<Self> {
        fields.sort_by_key(|f| f.order);

        let mut index = HashMap::with_capacity(fields.len());
        for (pos, field) in fields.iter().enumerate() {
            if index.insert(field.key.clone(), pos).is_some() {
                return Err(Error::DuplicateKey(field.key.to_string()));
            }
            if pos > 0 && field.order != fields[pos - 1].order + 1 {
                return Err(Error::BrokenOrder(field.key.to_string()));
            }
        }

        for item in &layout {
            if let Some(missing) = item.field_keys().into_iter().find(|k| !index.contains_key(*k)) {
                return Err(Error::UnknownLayoutField(missing.to_string()));
            }
        }

        Ok(Self {
            fields,
            index,
            layout,
        })
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates descriptors in entry order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    /// Iterates keys in entry order.
    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.fields.iter().map(|f| &f.key)
    }

    /// Looks up a descriptor.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldDescriptor> {
        self.index.get(key).map(|&pos| &self.fields[pos])
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the descriptor with the next-higher `order`, or `None` for the
    /// last field and for unknown keys.
    #[must_use]
    pub fn next_after(&self, key: &str) -> Option<&FieldDescriptor> {
        let pos = *self.index.get(key)?;
        self.fields.get(pos + 1)
    }

    /// The report layout.
    #[must_use]
    pub fn layout(&self) -> &[ReportItem] {
        &self.layout
    }

    /// A snapshot holding an empty string for every field.
    #[must_use]
    pub fn empty_snapshot(&self) -> Snapshot {
        Snapshot::from_values(
            self.fields
                .iter()
                .map(|f| (f.key.clone(), String::new()))
                .collect(),
        )
    }

    /// Builds a snapshot from a map whose key set must equal the schema's.
    pub fn snapshot_from(&self, values: BTreeMap<String, String>) -> Result<Snapshot> {
        if let Some(extra) = values.keys().find(|k| !self.contains(k)) {
            return Err(Error::UnknownField(extra.clone()));
        }
        if let Some(missing) = self.keys().find(|k| !values.contains_key(k.as_str())) {
            return Err(Error::MissingField(missing.to_string()));
        }
        Ok(Snapshot::from_values(
            values.into_iter().map(|(k, v)| (FieldKey::from(k), v)).collect(),
        ))
    }

    /// Builds a snapshot from an arbitrary map: missing fields become empty
    /// and unknown keys are dropped. Used when loading records written by an
    /// older or newer schema.
    #[must_use]
    pub fn normalize(&self, mut values: BTreeMap<String, String>) -> Snapshot {
        let mut snapshot = self.empty_snapshot();
        for key in self.keys() {
            if let Some(value) = values.remove(key.as_str()) {
                snapshot.put(key, value);
            }
        }
        if !values.is_empty() {
            warn!(
                "Dropping {} unknown field(s) from persisted record: {:?}",
                values.len(),
                values.keys().collect::<Vec<_>>()
            );
        }
        snapshot
    }

    /// Checks that a snapshot's key set equals the schema's.
    pub fn validate(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(extra) = snapshot.keys().find(|k| !self.contains(k.as_str())) {
            return Err(Error::UnknownField(extra.to_string()));
        }
        if let Some(missing) = self.keys().find(|k| snapshot.get(k.as_str()).is_none()) {
            return Err(Error::MissingField(missing.to_string()));
        }
        Ok(())
    }
}
