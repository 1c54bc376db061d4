use crate::domain::model::Message;
use crate::domain::ports::Notifier;
use crate::utils::error::{Result, SantaError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Sends messages through an HTTP mail relay.
///
/// Each message becomes one `POST` with a JSON body:
/// `{"from", "to", "to_name", "subject", "body"}`. Basic auth is attached
/// when a username is configured.
pub struct HttpMailer {
    client: Client,
    endpoint: String,
    from: String,
    username: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    from: &'a str,
    to: &'a str,
    to_name: &'a str,
    subject: &'a str,
    body: &'a str,
}

impl HttpMailer {
    pub fn new(endpoint: impl Into<String>, from: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, from, Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        from: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            from: from.into(),
            username: None,
            password: None,
        })
    }

    pub fn with_credentials(mut self, username: Option<String>, password: Option<String>) -> Self {
        self.username = username;
        self.password = password;
        self
    }
}

#[async_trait]
impl Notifier for HttpMailer {
    async fn deliver(&self, message: &Message) -> Result<()> {
        let payload = RelayRequest {
            from: &self.from,
            to: &message.to,
            to_name: &message.to_name,
            subject: &message.subject,
            body: &message.body,
        };

        tracing::debug!("Posting message for {} to {}", message.to, self.endpoint);
        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_ref());
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Relay response status: {}", status);

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(SantaError::DeliveryError {
                recipient: message.to.clone(),
                message: format!("relay returned {}: {}", status, detail.trim()),
            });
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
