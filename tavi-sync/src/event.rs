//! Messages between the rendering layer and the engine.

use tavi_types::FieldKey;

/// Input from the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    Focus(FieldKey),
    Change { key: FieldKey, value: String },
    Blur(FieldKey),
    /// Enter, or the on-screen "Go" key.
    CommitKey(FieldKey),
}

/// Output to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    /// Move focus to `key`, selecting its whole value when `select_all`.
    FocusField { key: FieldKey, select_all: bool },
    /// These fields took new values from the store.
    FieldsReplaced { keys: Vec<FieldKey> },
    /// Every field was cleared.
    Cleared,
}

/// Result of handling an external snapshot change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// The buffer was merged; `updated` lists the keys whose values changed.
    Merged { updated: Vec<FieldKey> },
    /// The gate was closed; the change will be re-read when it opens.
    Deferred,
    /// The store holds the snapshot this engine last wrote.
    SelfNotification,
    /// The store holds the snapshot the buffer was loaded or merged from,
    /// or only settings changed.
    Unchanged,
}
