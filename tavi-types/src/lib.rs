//! Core type definitions for the TAVI CT measurement form.
//!
//! This crate defines the data model shared by every other crate:
//! - Field keys and descriptors, collected into an ordered [`FieldSchema`]
//! - The report layout that the serializer walks
//! - [`Snapshot`]s of raw field values, valid only against their schema
//! - The persisted state and its durable record format
//!
//! Values are always raw strings. Numeric interpretation happens at
//! serialization and validation time, never here.

mod catalog;
mod key;
mod schema;
mod snapshot;
mod state;

pub use catalog::tavi_schema;
pub use key::FieldKey;
pub use schema::{FieldDescriptor, FieldKind, FieldRange, FieldSchema, ReportItem};
pub use snapshot::Snapshot;
pub use state::{PersistedRecord, PersistedState};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building schemas or snapshots.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("duplicate field key: {0}")]
    DuplicateKey(String),

    #[error("field order is not contiguous at {0}")]
    BrokenOrder(String),

    #[error("snapshot is missing field: {0}")]
    MissingField(String),

    #[error("report layout references unknown field: {0}")]
    UnknownLayoutField(String),
}
