//! Submission and mail hand-off.
//!
//! [`compose`] turns the edit buffer into an [`Outbound`] message (subject,
//! body, recipients) or a blocking [`SubmitError`]. [`HandoffLinks`] and
//! [`hand_off`] pass that message to an external mail client, trying the
//! app deep link first on mobile and falling back to `mailto:`.

mod compose;
mod config;
mod error;
mod handoff;

pub use compose::{Outbound, SubmitTrigger, compose};
pub use config::MailConfig;
pub use error::{HandoffError, SubmitError};
pub use handoff::{HandoffLinks, HandoffOutcome, Launcher, Platform, Visibility, hand_off};
