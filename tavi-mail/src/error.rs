//! Error types for submission and hand-off.

use tavi_report::FieldIssue;
use thiserror::Error;

/// Reasons the send control cannot submit. Both are shown to the user as a
/// blocking notice; neither is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    /// One or more numeric fields fail the shape check.
    #[error("{} field(s) are not valid numbers", .0.len())]
    InvalidFields(Vec<FieldIssue>),

    /// No recipients are configured.
    #[error("no mail recipients configured")]
    MissingRecipients,
}

/// Errors raised while handing a message to the mail client.
#[derive(Debug, Error)]
pub enum HandoffError {
    /// The host failed to open a URL.
    #[error("failed to open {url}: {reason}")]
    Launch { url: String, reason: String },
}
