use tavi_types::FieldKey;

/// Suppression state for external snapshot changes.
///
/// Reconciliation only runs while the gate is `Idle`. A single tagged value
/// makes combinations such as "resetting while navigating" unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncGate {
    #[default]
    Idle,
    /// A field holds focus.
    Editing(FieldKey),
    /// Focus is moving from one field to the next after a commit key.
    Navigating { from: FieldKey, to: FieldKey },
    /// `clear_all` is writing the empty snapshot.
    Resetting,
}

impl SyncGate {
    /// True when external changes may be reconciled.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// True while a field is focused or focus is in transit.
    #[must_use]
    pub fn holds_focus(&self) -> bool {
        matches!(self, Self::Editing(_) | Self::Navigating { .. })
    }

    /// The logically focused field, if any. While navigating this is the
    /// field being left.
    #[must_use]
    pub fn focused_key(&self) -> Option<&FieldKey> {
        match self {
            Self::Editing(key) | Self::Navigating { from: key, .. } => Some(key),
            Self::Idle | Self::Resetting => None,
        }
    }
}
