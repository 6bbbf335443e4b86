//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use httpmock::prelude::*;
use httpmock::Mock;
use quote_intake::config::{Credentials, IntakeConfig};
use quote_intake::{IntakeServer, Shutdown};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const ADMIN_TOKEN: &str = "test-admin-token";

/// A running intake server bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST a submission as the given client IP.
    pub async fn submit(&self, client_ip: &str, payload: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/contact"))
            .header("x-forwarded-for", client_ip)
            .json(payload)
            .send()
            .await
            .expect("intake server unreachable")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Build credentials from literal pairs instead of the process environment.
pub fn credentials(pairs: &[(&str, &str)]) -> Credentials {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Credentials::from_lookup(|var| vars.get(var).cloned())
}

/// Config whose providers point at `provider` and whose metrics and logging stay quiet.
pub fn config_for(provider: &MockServer) -> IntakeConfig {
    let mut config = IntakeConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.email.api_url = provider.url("/v3/smtp/email");
    config.captcha.verify_url = provider.url("/recaptcha/api/siteverify");
    config.timeouts.provider_secs = 2;
    config
}

pub async fn spawn_server(config: IntakeConfig, credentials: Credentials) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = IntakeServer::new(config, credentials).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();

    TestServer {
        addr,
        client,
        shutdown,
    }
}

/// Accept every email send the way the provider does.
pub async fn mock_email_ok(provider: &MockServer) -> Mock<'_> {
    provider
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v3/smtp/email")
                .header("api-key", "brevo-test-key");
            then.status(201)
                .json_body(json!({ "messageId": "<201@smtp-relay.mailin.fr>" }));
        })
        .await
}

pub async fn mock_captcha(provider: &MockServer, score: f64) -> Mock<'_> {
    provider
        .mock_async(move |when, then| {
            when.method(POST).path("/recaptcha/api/siteverify");
            then.status(200).json_body(json!({
                "success": true,
                "score": score,
                "action": "submit",
                "error-codes": []
            }));
        })
        .await
}

pub fn valid_submission() -> Value {
    json!({
        "firstName": "Maria",
        "lastName": "Lopez",
        "email": "maria@example.com",
        "phone": "+1 (555) 010-2030",
        "company": "Lopez Holdings",
        "address": "12 Elm St",
        "selectedServices": ["additions", "renovation"],
        "timeline": "3-6 months",
        "budget": "$50k-$100k",
        "projectDetails": "Second storey addition <b>with</b> a new kitchen.",
        "honeypot": ""
    })
}
