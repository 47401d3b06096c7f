//! Single-shot timers on a caller-supplied millisecond clock.
//!
//! The engine never reads a clock itself. Callers pass `now` into every
//! operation and drive expiry through `advance`, which keeps all timing
//! deterministic in tests.

/// Milliseconds on the session clock.
pub type Millis = u64;

/// A cancelable single-shot deadline. Re-arming replaces the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline(Option<Millis>);

impl Deadline {
    /// Arms (or re-arms) the timer to expire at `at`.
    pub fn arm(&mut self, at: Millis) {
        self.0 = Some(at);
    }

    /// Cancels the timer. A no-op if it already fired or was never armed.
    pub fn cancel(&mut self) {
        self.0 = None;
    }

    #[must_use]
    pub fn at(&self) -> Option<Millis> {
        self.0
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.0.is_some()
    }

    /// Disarms and returns the deadline if it has expired by `now`.
    pub fn take_due(&mut self, now: Millis) -> Option<Millis> {
        match self.0 {
            Some(at) if at <= now => self.0.take(),
            _ => None,
        }
    }
}
