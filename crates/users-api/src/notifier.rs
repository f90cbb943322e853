use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Serialize;

use entity::user;

use crate::config::{ApiConfig, BrevoConfig};
use crate::error::ApiError;

const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";

/// Delivers account e-mails.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Ask `email` to confirm it belongs to `user`.
    async fn send_confirm_email(
        &self,
        user: &user::Model,
        email: &str,
        confirm_url: &str,
    ) -> Result<(), ApiError>;
}

/// Picks Brevo when it is configured, otherwise logs and drops messages.
pub fn notifier_from_config(config: &ApiConfig) -> Arc<dyn Notifier> {
    match &config.brevo {
        Some(brevo) => Arc::new(BrevoNotifier::new(brevo.clone())),
        None => Arc::new(NoopNotifier),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoEmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoSendEmailBody {
    sender: BrevoEmailAddress,
    to: Vec<BrevoEmailAddress>,
    subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    html_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_content: Option<String>,
}

fn confirm_email_text(user: &user::Model, confirm_url: &str) -> String {
    format!(
        "Hello {},\n\nPlease confirm your email address by visiting:\n\n{confirm_url}\n",
        user.fullname
    )
}

pub struct BrevoNotifier {
    config: BrevoConfig,
    client: reqwest::Client,
}

impl BrevoNotifier {
    pub fn new(config: BrevoConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for BrevoNotifier {
    async fn send_confirm_email(
        &self,
        user: &user::Model,
        email: &str,
        confirm_url: &str,
    ) -> Result<(), ApiError> {
        let body = BrevoSendEmailBody {
            sender: BrevoEmailAddress {
                email: self.config.sender_email.clone(),
                name: self.config.sender_name.clone(),
            },
            to: vec![BrevoEmailAddress {
                email: email.to_string(),
                name: Some(user.fullname.clone()),
            }],
            subject: "Confirm your email address".to_string(),
            html_content: None,
            text_content: Some(confirm_email_text(user, confirm_url)),
        };

        let resp = self
            .client
            .post(BREVO_SEND_URL)
            .header("api-key", &self.config.api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Notify(format!("Brevo request failed: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            tracing::info!(user_id = %user.id, "confirmation email sent");
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::Notify(format!(
            "Brevo send failed (status={status}): {body}"
        )))
    }
}

/// Used when no mail provider is configured.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send_confirm_email(
        &self,
        user: &user::Model,
        _email: &str,
        _confirm_url: &str,
    ) -> Result<(), ApiError> {
        tracing::warn!(user_id = %user.id, "no mail provider configured; confirmation email dropped");
        Ok(())
    }
}

/// Keeps every message in memory. Handy in tests and local tooling.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentConfirmation>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentConfirmation {
    pub user_id: String,
    pub email: String,
    pub confirm_url: String,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SentConfirmation> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_confirm_email(
        &self,
        user: &user::Model,
        email: &str,
        confirm_url: &str,
    ) -> Result<(), ApiError> {
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| ApiError::Notify("recording notifier poisoned".to_string()))?;
        sent.push(SentConfirmation {
            user_id: user.id.clone(),
            email: email.to_string(),
            confirm_url: confirm_url.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brevo_body_uses_camel_case_and_skips_empty_parts() {
        let body = BrevoSendEmailBody {
            sender: BrevoEmailAddress {
                email: "noreply@example.org".into(),
                name: None,
            },
            to: vec![],
            subject: "s".into(),
            html_content: None,
            text_content: Some("t".into()),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["textContent"], "t");
        assert!(json.get("htmlContent").is_none());
        assert!(json["sender"].get("name").is_none());
    }
}
