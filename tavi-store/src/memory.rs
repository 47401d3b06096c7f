//! In-memory store backend.

use crate::error::StoreResult;
use crate::listeners::{Listener, Listeners, Subscription};
use crate::PersistedStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tavi_types::{FieldSchema, PersistedState};

/// A store that lives only as long as the process. Used in tests and when
/// the host provides its own persistence around the core.
pub struct MemoryStore {
    schema: Arc<FieldSchema>,
    state: Mutex<PersistedState>,
    listeners: Listeners,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Creates a store holding the initial state.
    #[must_use]
    pub fn new(schema: Arc<FieldSchema>) -> Self {
        let state = PersistedState::initial(&schema);
        Self::with_state(schema, state)
    }

    /// Creates a store holding `state`.
    #[must_use]
    pub fn with_state(schema: Arc<FieldSchema>, state: PersistedState) -> Self {
        Self {
            schema,
            state: Mutex::new(state),
            listeners: Listeners::new(),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of successful `set` calls.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of active subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl PersistedStore for MemoryStore {
    fn get(&self) -> StoreResult<PersistedState> {
        Ok(self.state.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn set(&self, state: PersistedState) -> StoreResult<()> {
        self.schema.validate(&state.snapshot)?;
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.listeners.notify(&state);
        Ok(())
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.listeners.add(listener)
    }
}
