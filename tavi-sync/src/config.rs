//! Session configuration.

use crate::error::{SyncError, SyncResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tavi_mail::MailConfig;
use tavi_report::ReportConfig;

/// Timer durations for the sync engine, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Quiet period after the last change before autosave fires.
    pub autosave_debounce_ms: u64,
    /// Extra wait when autosave fires while a field holds focus.
    pub autosave_settle_ms: u64,
    /// Delay between a blur and releasing the focus gate.
    pub blur_grace_ms: u64,
    /// Delay after the gate opens before the post-blur safety flush.
    pub blur_flush_ms: u64,
    /// Input-method settle delay before focus lands on the next field.
    pub navigation_settle_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            autosave_debounce_ms: 500,
            autosave_settle_ms: 200,
            blur_grace_ms: 200,
            blur_flush_ms: 600,
            navigation_settle_ms: 100,
        }
    }
}

/// Everything a [`FormSession`](crate::FormSession) needs besides the
/// schema and the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub sync: SyncConfig,
    pub report: ReportConfig,
    pub mail: MailConfig,
}

impl SessionConfig {
    /// Parses a JSON config. Missing sections and keys take their defaults.
    pub fn from_json(json: &str) -> SyncResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> SyncResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SyncError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }
}
