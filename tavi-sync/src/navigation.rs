//! Commit-key navigation along the schema order.

use crate::timer::{Deadline, Millis};
use tavi_types::{FieldKey, FieldSchema};

/// Moves focus forward one field per commit key.
///
/// The move is two-step: `begin` arms the settle timer and the engine holds
/// the gate in `Navigating`; `take_due` yields the destination once the
/// input method has had time to settle.
#[derive(Debug, Clone)]
pub struct NavigationController {
    settle: Deadline,
    settle_ms: Millis,
    destination: Option<FieldKey>,
}

impl NavigationController {
    #[must_use]
    pub fn new(settle_ms: Millis) -> Self {
        Self {
            settle: Deadline::default(),
            settle_ms,
            destination: None,
        }
    }

    /// The field after `key`, or `None` when `key` is the last field.
    #[must_use]
    pub fn next_key(schema: &FieldSchema, key: &str) -> Option<FieldKey> {
        schema.next_after(key).map(|d| d.key.clone())
    }

    /// Starts a move to `to`. A second commit before the first lands
    /// replaces it.
    pub fn begin(&mut self, to: FieldKey, now: Millis) {
        self.destination = Some(to);
        self.settle.arm(now + self.settle_ms);
    }

    pub fn cancel(&mut self) {
        self.settle.cancel();
        self.destination = None;
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Millis> {
        self.settle.at()
    }

    #[must_use]
    pub fn destination(&self) -> Option<&FieldKey> {
        self.destination.as_ref()
    }

    /// Returns the destination once the settle delay has elapsed.
    pub fn take_due(&mut self, now: Millis) -> Option<FieldKey> {
        self.settle.take_due(now)?;
        self.destination.take()
    }
}
