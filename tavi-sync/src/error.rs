//! Error types for the sync layer.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An event or snapshot did not match the field schema.
    #[error("schema error: {0}")]
    Schema(#[from] tavi_types::Error),

    /// The persisted store failed.
    #[error("store error: {0}")]
    Store(#[from] tavi_store::StoreError),

    /// The send control could not submit.
    #[error("submit error: {0}")]
    Submit(#[from] tavi_mail::SubmitError),

    /// Configuration could not be read.
    #[error("config error: {0}")]
    Config(String),

    /// Configuration could not be parsed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The session task is gone.
    #[error("channel closed")]
    ChannelClosed,
}
