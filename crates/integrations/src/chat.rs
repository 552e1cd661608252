use crate::IntegrationError;

/// Pushes plain-text notifications to the team chat webhook.
///
/// The webhook takes a form-encoded `message` field and a bearer
/// token, which covers LINE Notify and compatible relays.
#[derive(Clone, Debug)]
pub struct ChatClient {
    http: reqwest::Client,
    webhook_url: String,
    token: String,
}

impl ChatClient {
    #[must_use]
    pub fn new(webhook_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            webhook_url: webhook_url.into(),
            token: token.into(),
        }
    }

    pub async fn send_message(&self, message: &str) -> Result<(), IntegrationError> {
        tracing::debug!(url = %self.webhook_url, "sending chat notification");
        let response = self
            .http
            .post(&self.webhook_url)
            .bearer_auth(&self.token)
            .form(&[("message", message)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IntegrationError::Service {
                service: "chat",
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(())
    }
}
