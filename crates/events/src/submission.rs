//! New-submission webhook messages.
//!
//! Slack receives a block-kit message; Discord webhooks (any URL containing
//! `discord.com`) receive a plain `{ "content": ... }` message.

use std::sync::Arc;

use audition_core::submission::Submission;
use serde_json::{json, Value};

use crate::delivery::webhook::WebhookDelivery;

const HEADLINE: &str = "New interview submission received!";
const BUTTON_LABEL: &str = "View details";

/// Payload dialect expected by the webhook receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookFlavor {
    Slack,
    Discord,
}

impl WebhookFlavor {
    pub fn for_url(url: &str) -> Self {
        if url.contains("discord.com") {
            Self::Discord
        } else {
            Self::Slack
        }
    }
}

/// What an admin needs to know about a fresh submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionNotice {
    pub submission_id: String,
    pub candidate_name: String,
    /// Admin UI page for the submission.
    pub link: String,
}

impl SubmissionNotice {
    pub fn new(base_url: &str, submission: &Submission) -> Self {
        Self {
            submission_id: submission.id.clone(),
            candidate_name: submission.candidate_name.clone(),
            link: format!(
                "{}/admin/submissions/{}",
                base_url.trim_end_matches('/'),
                submission.id
            ),
        }
    }

    pub fn payload(&self, flavor: WebhookFlavor) -> Value {
        match flavor {
            WebhookFlavor::Discord => json!({
                "content": format!(
                    "**{HEADLINE}**\n\n**Candidate**: {}\n**ID**: {}\n\n{}",
                    self.candidate_name, self.submission_id, self.link
                ),
            }),
            WebhookFlavor::Slack => json!({
                "text": format!(
                    "*{HEADLINE}*\n\n*Candidate*: {}\n*ID*: {}\n\n<{}|{BUTTON_LABEL}>",
                    self.candidate_name, self.submission_id, self.link
                ),
                "blocks": [
                    {
                        "type": "section",
                        "text": { "type": "mrkdwn", "text": format!("*{HEADLINE}*") }
                    },
                    {
                        "type": "section",
                        "fields": [
                            { "type": "mrkdwn", "text": format!("*Candidate:*\n{}", self.candidate_name) },
                            { "type": "mrkdwn", "text": format!("*ID:*\n{}", self.submission_id) }
                        ]
                    },
                    {
                        "type": "actions",
                        "elements": [
                            {
                                "type": "button",
                                "text": { "type": "plain_text", "text": BUTTON_LABEL },
                                "url": self.link,
                                "style": "primary"
                            }
                        ]
                    }
                ]
            }),
        }
    }
}

/// Sends new-submission messages without blocking the request that created
/// the submission.
#[derive(Clone)]
pub struct SubmissionNotifier {
    delivery: Arc<WebhookDelivery>,
    base_url: String,
}

impl SubmissionNotifier {
    pub fn new(delivery: WebhookDelivery, base_url: impl Into<String>) -> Self {
        Self {
            delivery: Arc::new(delivery),
            base_url: base_url.into(),
        }
    }

    /// Spawn delivery of a notice for `submission` to `webhook_url`.
    ///
    /// Failures are logged by the spawned task and never reported back.
    pub fn notify_new_submission(
        &self,
        webhook_url: &str,
        submission: &Submission,
    ) -> tokio::task::JoinHandle<()> {
        let notice = SubmissionNotice::new(&self.base_url, submission);
        let payload = notice.payload(WebhookFlavor::for_url(webhook_url));
        let url = webhook_url.to_string();
        let delivery = Arc::clone(&self.delivery);

        tokio::spawn(async move {
            match delivery.deliver(&url, &payload).await {
                Ok(()) => tracing::info!(
                    submission_id = %notice.submission_id,
                    "Sent new-submission webhook"
                ),
                Err(e) => tracing::error!(
                    submission_id = %notice.submission_id,
                    error = %e,
                    "New-submission webhook failed"
                ),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use audition_core::submission::NewSubmission;

    use super::*;

    fn notice() -> SubmissionNotice {
        let input = NewSubmission {
            candidate_name: Some("Mika".into()),
            ..NewSubmission::default()
        };
        let submission = Submission::new("1700000000000".into(), chrono::Utc::now(), input);
        SubmissionNotice::new("https://jobs.example.com/", &submission)
    }

    #[test]
    fn link_points_at_admin_page() {
        assert_eq!(
            notice().link,
            "https://jobs.example.com/admin/submissions/1700000000000"
        );
    }

    #[test]
    fn flavor_detection() {
        assert_eq!(
            WebhookFlavor::for_url("https://discord.com/api/webhooks/1/abc"),
            WebhookFlavor::Discord
        );
        assert_eq!(
            WebhookFlavor::for_url("https://hooks.slack.com/services/T/B/X"),
            WebhookFlavor::Slack
        );
    }

    #[test]
    fn discord_payload_is_plain_content() {
        let payload = notice().payload(WebhookFlavor::Discord);
        let content = payload["content"].as_str().unwrap();
        assert!(content.contains("Mika"));
        assert!(content.contains("/admin/submissions/1700000000000"));
        assert!(payload.get("blocks").is_none());
    }

    #[test]
    fn slack_payload_has_button_block() {
        let payload = notice().payload(WebhookFlavor::Slack);
        let blocks = payload["blocks"].as_array().unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[2]["elements"][0]["url"],
            "https://jobs.example.com/admin/submissions/1700000000000"
        );
    }
}
