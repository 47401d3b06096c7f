//! Building the outbound message from the edit buffer.

use crate::config::MailConfig;
use crate::error::SubmitError;
use crate::handoff::HandoffLinks;
use tavi_report::{ReportMode, serialize, validate};
use tavi_types::{FieldSchema, Snapshot};
use tracing::{debug, info};

const SUBJECT_FIELD: &str = "case_name";

/// What asked for the submission.
///
/// The commit key (Enter or an on-screen "Go") only ever navigates; only the
/// explicit send control submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    SendControl,
    CommitKey,
}

/// A composed message, ready for hand-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl Outbound {
    /// Builds the deep link and `mailto:` URLs for this message.
    #[must_use]
    pub fn links(&self, config: &MailConfig) -> HandoffLinks {
        HandoffLinks::build(&self.recipients, &self.subject, &self.body, config)
    }
}

/// Composes the outbound message.
///
/// Returns `Ok(None)` for commit-key triggers. Pattern errors are checked
/// before recipients; range advisories never block.
pub fn compose(
    schema: &FieldSchema,
    snapshot: &Snapshot,
    recipients: &[String],
    trigger: SubmitTrigger,
    mode: ReportMode,
    config: &MailConfig,
) -> Result<Option<Outbound>, SubmitError> {
    if trigger == SubmitTrigger::CommitKey {
        debug!("Commit key does not submit");
        return Ok(None);
    }

    let blocking: Vec<_> = validate(schema, snapshot)
        .into_iter()
        .filter(|issue| issue.is_blocking())
        .collect();
    if !blocking.is_empty() {
        return Err(SubmitError::InvalidFields(blocking));
    }
    if recipients.is_empty() {
        return Err(SubmitError::MissingRecipients);
    }

    let subject = match snapshot.value(SUBJECT_FIELD) {
        "" => config.default_subject.clone(),
        case_name => case_name.to_string(),
    };
    let body = serialize(schema, snapshot, mode);
    info!("Composed report for {} recipient(s)", recipients.len());

    Ok(Some(Outbound {
        recipients: recipients.to_vec(),
        subject,
        body,
    }))
}
