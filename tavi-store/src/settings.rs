//! The settings writer: recipients and the autosave flag.
//!
//! This path never touches `snapshot`, so it cannot race the sync engine,
//! which owns field data.

use crate::error::StoreResult;
use crate::PersistedStore;
use tavi_types::PersistedState;
use tracing::info;

/// Fields the settings screen may change. `None` leaves a value as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub recipients: Option<Vec<String>>,
    pub auto_save_enabled: Option<bool>,
}

/// Splits a comma-separated recipient list, trimming entries and dropping
/// empty ones.
#[must_use]
pub fn parse_recipients(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

/// Applies a settings update and returns the resulting state.
pub fn apply_settings<S>(store: &S, update: SettingsUpdate) -> StoreResult<PersistedState>
where
    S: PersistedStore + ?Sized,
{
    let mut state = store.get()?;
    if let Some(recipients) = update.recipients {
        state.recipients = recipients;
    }
    if let Some(enabled) = update.auto_save_enabled {
        state.auto_save_enabled = enabled;
    }
    store.set(state.clone())?;
    info!(
        "Saved settings: {} recipient(s), autosave {}",
        state.recipients.len(),
        if state.auto_save_enabled { "on" } else { "off" }
    );
    Ok(state)
}
