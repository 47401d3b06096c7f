//! File-backed store: one JSON record, replaced atomically on every write.

use crate::error::StoreResult;
use crate::listeners::{Listener, Listeners, Subscription};
use crate::PersistedStore;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tavi_types::{FieldSchema, PersistedRecord, PersistedState};
use tracing::{debug, info};

const APP_DIR: &str = "tavi-ct";
const RECORD_FILE: &str = "tavi-ct-form-storage.json";

/// Durable store keeping the record at a single path.
///
/// The state is cached in memory; the file is read on open and on
/// [`reload`](Self::reload), which picks up changes made by another process.
pub struct FileStore {
    path: PathBuf,
    schema: Arc<FieldSchema>,
    cache: Mutex<PersistedState>,
    listeners: Listeners,
}

impl FileStore {
    /// Opens the store at `path`. A missing file yields the initial state;
    /// the file is only created on the first write.
    pub fn open(path: impl Into<PathBuf>, schema: Arc<FieldSchema>) -> StoreResult<Self> {
        let path = path.into();
        let state = match read_record(&path)? {
            Some(record) => {
                info!("Loaded persisted form state from {}", path.display());
                PersistedState::from_record(&schema, record)
            }
            None => {
                info!("No persisted form state at {}, starting empty", path.display());
                PersistedState::initial(&schema)
            }
        };
        Ok(Self {
            path,
            schema,
            cache: Mutex::new(state),
            listeners: Listeners::new(),
        })
    }

    /// Default record location under the platform data directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(APP_DIR).join(RECORD_FILE))
    }

    /// Path of the record file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the record from disk. Subscribers are notified and `true`
    /// is returned when the on-disk state differs from the cached one.
    pub fn reload(&self) -> StoreResult<bool> {
        let state = match read_record(&self.path)? {
            Some(record) => PersistedState::from_record(&self.schema, record),
            None => PersistedState::initial(&self.schema),
        };
        {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if *cache == state {
                return Ok(false);
            }
            *cache = state.clone();
        }
        debug!("Persisted form state changed on disk, notifying subscribers");
        self.listeners.notify(&state);
        Ok(true)
    }
}

impl PersistedStore for FileStore {
    fn get(&self) -> StoreResult<PersistedState> {
        Ok(self.cache.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn set(&self, state: PersistedState) -> StoreResult<()> {
        self.schema.validate(&state.snapshot)?;
        write_record(&self.path, &state.to_record())?;
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = state.clone();
        debug!("Wrote persisted form state to {}", self.path.display());
        self.listeners.notify(&state);
        Ok(())
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.listeners.add(listener)
    }
}

fn read_record(path: &Path) -> StoreResult<Option<PersistedRecord>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Writes to a sibling temp file and renames it over the record, so readers
/// never observe a half-written file.
fn write_record(path: &Path, record: &PersistedRecord) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(record)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
