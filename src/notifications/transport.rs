//! Transactional-email provider transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::notifications::message::OutboundEmail;

/// A single provider call failed.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider answered with a non-success status. `body` is for server logs only.
    #[error("provider rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers one message through the provider.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, message: &OutboundEmail) -> Result<(), TransportError>;
}

/// Brevo `smtp/email` API client authenticated with an `api-key` header.
pub struct BrevoTransport {
    client: reqwest::Client,
    api_url: String,
    api_key: SecretString,
}

impl BrevoTransport {
    pub fn new(api_url: impl Into<String>, api_key: SecretString, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key,
        })
    }
}

#[async_trait]
impl EmailTransport for BrevoTransport {
    async fn send(&self, message: &OutboundEmail) -> Result<(), TransportError> {
        let response = self
            .client
            .post(&self.api_url)
            .header(ACCEPT, "application/json")
            .header("api-key", self.api_key.expose_secret())
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(TransportError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::message::Contact;
    use httpmock::prelude::*;

    fn message() -> OutboundEmail {
        OutboundEmail {
            sender: None,
            to: vec![Contact {
                email: "ops@example.com".into(),
                name: "Ops".into(),
            }],
            subject: Some("Hi".into()),
            html_content: Some("<p>Hi</p>".into()),
            text_content: None,
            template_id: None,
            params: None,
        }
    }

    fn transport(server: &MockServer) -> BrevoTransport {
        BrevoTransport::new(
            server.url("/v3/smtp/email"),
            SecretString::from("xkeysib-test".to_string()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_sends_json_with_api_key() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v3/smtp/email")
                    .header("api-key", "xkeysib-test")
                    .json_body(serde_json::json!({
                        "to": [{ "email": "ops@example.com", "name": "Ops" }],
                        "subject": "Hi",
                        "htmlContent": "<p>Hi</p>"
                    }));
                then.status(201).json_body(serde_json::json!({ "messageId": "<id@relay>" }));
            })
            .await;

        transport(&server).send(&message()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_provider_rejection_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v3/smtp/email");
                then.status(401).body(r#"{"code":"unauthorized"}"#);
            })
            .await;

        let err = transport(&server).send(&message()).await.unwrap_err();
        assert!(matches!(err, TransportError::Rejected { status: 401, ref body } if body.contains("unauthorized")));
    }
}
