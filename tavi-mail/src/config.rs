use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Mail hand-off settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Subject used when the case name is blank.
    pub default_subject: String,
    /// Scheme and host of the mail app deep link.
    pub deep_link_base: String,
    /// How long to wait for the deep link to take over before opening `mailto:`.
    pub fallback_timeout_ms: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            default_subject: "TAVI術前CT所見".to_string(),
            deep_link_base: "googlegmail://co".to_string(),
            fallback_timeout_ms: 1_000,
        }
    }
}

impl MailConfig {
    #[must_use]
    pub fn fallback_timeout(&self) -> Duration {
        Duration::from_millis(self.fallback_timeout_ms)
    }
}
