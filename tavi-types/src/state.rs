//! Persisted state and its durable record format.

use crate::schema::FieldSchema;
use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the persisted store holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedState {
    /// Last saved field values.
    pub snapshot: Snapshot,
    /// Mail recipients, in the order the user entered them.
    pub recipients: Vec<String>,
    /// When false, field values are never durably persisted.
    pub auto_save_enabled: bool,
}

impl PersistedState {
    /// The state of a fresh install: empty fields, no recipients, autosave on.
    #[must_use]
    pub fn initial(schema: &FieldSchema) -> Self {
        Self {
            snapshot: schema.empty_snapshot(),
            recipients: Vec::new(),
            auto_save_enabled: true,
        }
    }

    /// Rebuilds state from a stored record. Loading is lenient: the record
    /// may come from a different schema revision.
    #[must_use]
    pub fn from_record(schema: &FieldSchema, record: PersistedRecord) -> Self {
        Self {
            snapshot: schema.normalize(record.form_snapshot),
            recipients: record.recipients,
            auto_save_enabled: record.auto_save_enabled,
        }
    }

    /// Converts into the stored record shape.
    #[must_use]
    pub fn to_record(&self) -> PersistedRecord {
        PersistedRecord {
            form_snapshot: self.snapshot.clone().into_map(),
            recipients: self.recipients.clone(),
            auto_save_enabled: self.auto_save_enabled,
        }
    }
}

/// The single durable record, as written to storage.
///
/// ```json
/// { "formSnapshot": { "analyst": "..." }, "recipients": [], "autoSaveEnabled": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRecord {
    #[serde(default)]
    pub form_snapshot: BTreeMap<String, String>,
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default = "default_auto_save")]
    pub auto_save_enabled: bool,
}

fn default_auto_save() -> bool {
    true
}
