//! Persisted store for the TAVI CT form.
//!
//! The store holds one [`PersistedState`] and is the only durable shared
//! resource. The core consumes it exclusively through the
//! [`PersistedStore`] contract:
//!
//! - `get` returns the current state
//! - `set` replaces it atomically and notifies subscribers
//! - `subscribe` registers a change listener
//!
//! Two backends are provided: [`MemoryStore`] for tests and embedding, and
//! [`FileStore`], which keeps the single durable JSON record on disk.

mod error;
mod file;
mod listeners;
mod memory;
mod settings;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use listeners::{Listener, Listeners, Subscription};
pub use memory::MemoryStore;
pub use settings::{SettingsUpdate, apply_settings, parse_recipients};

use tavi_types::PersistedState;

/// Durable holder of the persisted state.
///
/// `set` is atomic and synchronous from the caller's point of view: once it
/// returns, `get` observes the new state. Listeners run synchronously inside
/// `set`, after the state is replaced, and must not call back into the store
/// in a way that blocks on the caller.
pub trait PersistedStore: Send + Sync {
    /// Returns the current state.
    fn get(&self) -> StoreResult<PersistedState>;

    /// Replaces the whole state.
    fn set(&self, state: PersistedState) -> StoreResult<()>;

    /// Registers a listener called with every new state. Dropping or
    /// unsubscribing the returned handle removes it.
    fn subscribe(&self, listener: Listener) -> Subscription;
}
