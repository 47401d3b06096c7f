//! Debounced autosave.

use crate::config::SyncConfig;
use crate::timer::{Deadline, Millis};

/// Two-phase autosave timer.
///
/// `arm` restarts the debounce, so the last arm wins. When the debounce
/// expires while a field holds focus, a settle phase delays the write so a
/// value is not captured between composition events.
#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    debounce: Deadline,
    settle: Deadline,
    debounce_ms: Millis,
    settle_ms: Millis,
}

/// What to do when the debounce expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosaveFire {
    /// Write the buffer now.
    Write,
    /// Focus is held; the write moved to the settle phase.
    Settling { until: Millis },
}

impl AutosaveScheduler {
    #[must_use]
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            debounce: Deadline::default(),
            settle: Deadline::default(),
            debounce_ms: config.autosave_debounce_ms,
            settle_ms: config.autosave_settle_ms,
        }
    }

    /// Restarts the debounce from `now`, dropping any pending settle.
    pub fn arm(&mut self, now: Millis) {
        self.settle.cancel();
        self.debounce.arm(now + self.debounce_ms);
    }

    /// Cancels both phases. Idempotent.
    pub fn cancel(&mut self) {
        self.debounce.cancel();
        self.settle.cancel();
    }

    /// True while a write is scheduled in either phase.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending() || self.settle.is_pending()
    }

    #[must_use]
    pub fn debounce_at(&self) -> Option<Millis> {
        self.debounce.at()
    }

    #[must_use]
    pub fn settle_at(&self) -> Option<Millis> {
        self.settle.at()
    }

    /// Handles debounce expiry at `at`. Returns `None` if the debounce was
    /// not due.
    pub fn fire_debounce(&mut self, at: Millis, focus_held: bool) -> Option<AutosaveFire> {
        let fired = self.debounce.take_due(at)?;
        if focus_held {
            let until = fired + self.settle_ms;
            self.settle.arm(until);
            Some(AutosaveFire::Settling { until })
        } else {
            Some(AutosaveFire::Write)
        }
    }

    /// Handles settle expiry at `at`. Returns true when the write is due.
    pub fn fire_settle(&mut self, at: Millis) -> bool {
        self.settle.take_due(at).is_some()
    }
}
