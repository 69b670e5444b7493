//! Outbound notifications.
//!
//! - [`delivery`]: external delivery channels (webhook).
//! - [`submission`]: new-submission messages and the fire-and-forget
//!   [`SubmissionNotifier`].

pub mod delivery;
pub mod submission;

pub use delivery::webhook::{WebhookDelivery, WebhookError};
pub use submission::{SubmissionNotice, SubmissionNotifier, WebhookFlavor};
