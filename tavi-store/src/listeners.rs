//! Change listener registry shared by the store backends.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tavi_types::PersistedState;

/// A change listener.
pub type Listener = Arc<dyn Fn(&PersistedState) + Send + Sync>;

#[derive(Default)]
struct Table {
    next_id: u64,
    entries: BTreeMap<u64, Listener>,
}

/// Registered listeners, notified in registration order.
#[derive(Default, Clone)]
pub struct Listeners {
    table: Arc<Mutex<Table>>,
}

impl Listeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener.
    pub fn add(&self, listener: Listener) -> Subscription {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let id = table.next_id;
        table.next_id += 1;
        table.entries.insert(id, listener);
        Subscription {
            id,
            table: Some(Arc::downgrade(&self.table)),
        }
    }

    /// Calls every listener with `state`. The table lock is released before
    /// any listener runs, so listeners may subscribe or unsubscribe.
    pub fn notify(&self, state: &PersistedState) {
        let listeners: Vec<Listener> = self
            .table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .values()
            .cloned()
            .collect();
        for listener in listeners {
            listener(state);
        }
    }

    /// Number of active listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.lock().unwrap_or_else(PoisonError::into_inner).entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle returned by `subscribe`. Unsubscribing is idempotent and also
/// happens on drop.
#[must_use = "dropping a subscription unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    table: Option<Weak<Mutex<Table>>>,
}

impl Subscription {
    /// Removes the listener. Safe to call more than once, and after the
    /// store itself is gone.
    pub fn unsubscribe(&mut self) {
        let Some(table) = self.table.take().and_then(|weak| weak.upgrade()) else {
            return;
        };
        table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .remove(&self.id);
    }

    /// Returns true until `unsubscribe` is called or the handle is dropped.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.table.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
