//! Handing a composed message to an external mail client.

use crate::config::MailConfig;
use crate::error::HandoffError;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

/// Where the form is running. Detection is the host's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Desktop,
    Mobile,
}

/// Host application visibility. Turning `Hidden` after a deep link is
/// opened means the mail app took over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Opens URLs in the host environment.
pub trait Launcher: Send + Sync {
    fn open(&self, url: &str) -> Result<(), HandoffError>;
}

/// How a hand-off ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffOutcome {
    /// Desktop: `mailto:` was opened directly.
    Mailto,
    /// Mobile: the deep link took over before the fallback fired.
    DeepLink,
    /// Mobile: the fallback timer expired and `mailto:` was opened.
    Fallback,
}

/// The two URLs a message can be handed off through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffLinks {
    pub deep_link: String,
    pub mailto: String,
}

impl HandoffLinks {
    /// Recipients are joined with `,`. In the deep link the joined list is
    /// percent-encoded; in `mailto:` it is used as is.
    #[must_use]
    pub fn build(recipients: &[String], subject: &str, body: &str, config: &MailConfig) -> Self {
        let to = recipients.join(",");
        let subject = urlencoding::encode(subject);
        let body = urlencoding::encode(body);
        Self {
            deep_link: format!(
                "{}?to={}&subject={subject}&body={body}",
                config.deep_link_base,
                urlencoding::encode(&to)
            ),
            mailto: format!("mailto:{to}?subject={subject}&body={body}"),
        }
    }
}

/// Opens the message in a mail client.
///
/// On mobile the deep link is opened first and raced against `timeout`.
/// If `visibility` turns `Hidden` first the fallback is cancelled;
/// otherwise `mailto:` is opened when the timer expires.
pub async fn hand_off<L>(
    launcher: &L,
    links: &HandoffLinks,
    platform: Platform,
    mut visibility: watch::Receiver<Visibility>,
    timeout: Duration,
) -> Result<HandoffOutcome, HandoffError>
where
    L: Launcher + ?Sized,
{
    if platform == Platform::Desktop {
        launcher.open(&links.mailto)?;
        return Ok(HandoffOutcome::Mailto);
    }

    let _ = visibility.borrow_and_update();
    launcher.open(&links.deep_link)?;

    let fallback = tokio::time::sleep(timeout);
    tokio::pin!(fallback);

    let mut watching = true;
    loop {
        tokio::select! {
            () = &mut fallback => break,
            changed = visibility.changed(), if watching => match changed {
                Ok(()) => {
                    if *visibility.borrow_and_update() == Visibility::Hidden {
                        debug!("Host went hidden, deep link hand-off succeeded");
                        return Ok(HandoffOutcome::DeepLink);
                    }
                }
                // Visibility source is gone; only the timer can end the wait.
                Err(_) => watching = false,
            },
        }
    }

    info!("Deep link hand-off timed out after {timeout:?}, falling back to mailto");
    launcher.open(&links.mailto)?;
    Ok(HandoffOutcome::Fallback)
}
