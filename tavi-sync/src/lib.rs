//! Edit buffer synchronization for the TAVI CT form.
//!
//! # Architecture
//!
//! - **Timer**: single-shot deadlines on a caller-supplied millisecond clock
//! - **Gate**: the one suppression state that keeps external snapshot
//!   changes from clobbering in-flight edits
//! - **Autosave**: debounced whole-snapshot writes to the persisted store
//! - **Navigation**: commit-key focus moves along the schema order
//! - **Engine**: the state machine tying them together, free of I/O and
//!   clocks
//! - **Session**: a tokio task that feeds the engine events, store
//!   notifications and timer expiries
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tavi_store::{MemoryStore, PersistedStore};
//! use tavi_sync::{SyncConfig, SyncEngine};
//! use tavi_types::tavi_schema;
//!
//! let schema = Arc::new(tavi_schema());
//! let store = Arc::new(MemoryStore::new(schema.clone()));
//! let mut engine = SyncEngine::new(schema, store.clone(), SyncConfig::default()).unwrap();
//!
//! engine.focus("annulus_area").unwrap();
//! engine.change("annulus_area", "450", 0).unwrap();
//! engine.advance(1_000).unwrap();
//!
//! assert_eq!(store.get().unwrap().snapshot.value("annulus_area"), "450");
//! ```

mod autosave;
mod config;
mod engine;
mod error;
mod event;
mod gate;
mod navigation;
mod session;
mod timer;

pub use autosave::{AutosaveFire, AutosaveScheduler};
pub use config::{SessionConfig, SyncConfig};
pub use engine::SyncEngine;
pub use error::{SyncError, SyncResult};
pub use event::{FieldEvent, Reconciliation, ViewUpdate};
pub use gate::SyncGate;
pub use navigation::NavigationController;
pub use session::{FormSession, SessionHandle, SessionId};
pub use timer::{Deadline, Millis};
