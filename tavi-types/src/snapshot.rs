//! Snapshots of raw field values.

use crate::key::FieldKey;
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// A complete mapping from every schema key to its raw string value.
///
/// Snapshots are only created through a [`FieldSchema`](crate::FieldSchema),
/// so their key set always matches the schema that produced them. Setting a
/// value never adds a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    values: BTreeMap<FieldKey, String>,
}

impl Snapshot {
    pub(crate) fn from_values(values: BTreeMap<FieldKey, String>) -> Self {
        Self { values }
    }

    /// Writes a value for a key that is known to exist.
    pub(crate) fn put(&mut self, key: &FieldKey, value: String) {
        if let Some(slot) = self.values.get_mut(key.as_str()) {
            *slot = value;
        }
    }

    /// Returns the raw value for a key, or `None` for unknown keys.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the raw value for a key, treating unknown keys as empty.
    #[must_use]
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// Replaces the value of an existing key, returning the previous value.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<String> {
        let slot = self
            .values
            .get_mut(key)
            .ok_or_else(|| Error::UnknownField(key.to_string()))?;
        Ok(std::mem::replace(slot, value.into()))
    }

    /// Iterates `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &str)> {
        self.values.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Iterates keys in key order.
    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.values.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns true if every value is the empty string.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.values.values().all(String::is_empty)
    }

    /// Keys whose values differ between `self` and `other`.
    #[must_use]
    pub fn changed_keys(&self, other: &Snapshot) -> Vec<FieldKey> {
        self.values
            .iter()
            .filter(|(k, v)| other.get(k.as_str()) != Some(v.as_str()))
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Converts into a plain string map, the shape of the persisted record.
    #[must_use]
    pub fn into_map(self) -> BTreeMap<String, String> {
        self.values
            .into_iter()
            .map(|(k, v)| (k.as_str().to_string(), v))
            .collect()
    }
}
