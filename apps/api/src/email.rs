//! Fire-and-forget email notifications through the FormSubmit relay.
//!
//! Email is best-effort: a generation or payment succeeds whether or not the
//! notification lands, so `send` returns a bool and logs failures instead of
//! propagating them. Handlers call the notify helpers inside `tokio::spawn`.

use reqwest::Client;
use serde_json::json;
use tracing::{info, warn};

const FORMSUBMIT_ENDPOINT: &str = "https://formsubmit.co/ajax";

#[derive(Clone)]
pub struct Mailer {
    http: Client,
    admin_email: String,
}

impl Mailer {
    pub fn new(http: Client, admin_email: String) -> Self {
        Mailer { http, admin_email }
    }

    /// Sends one message. Returns whether the relay accepted it.
    pub async fn send(&self, to: &str, subject: &str, message: &str) -> bool {
        let result = self
            .http
            .post(format!("{FORMSUBMIT_ENDPOINT}/{to}"))
            .json(&json!({
                "_subject": subject,
                "message": message,
            }))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                info!(to, subject, "notification email sent");
                true
            }
            Ok(response) => {
                warn!(to, status = %response.status(), "email relay rejected message");
                false
            }
            Err(e) => {
                warn!(to, "email relay unreachable: {e}");
                false
            }
        }
    }

    pub async fn notify_resume_ready(&self, to: &str, resume_url: &str) -> bool {
        self.send(
            to,
            "Your tailored resume is ready",
            &format!(
                "Your tailored resume has been generated.\n\nDownload it here: {resume_url}\n\n\
                 Thank you for using TailorCV."
            ),
        )
        .await
    }

    pub async fn notify_payment_submitted(&self, user_email: &str, screenshot_url: &str) -> bool {
        self.send(
            &self.admin_email,
            "New premium payment submitted",
            &format!(
                "A payment screenshot was submitted and is awaiting review.\n\n\
                 User email: {user_email}\nScreenshot: {screenshot_url}"
            ),
        )
        .await
    }
}
