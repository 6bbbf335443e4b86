//! End-to-end submission tests against a running server and a mocked email/CAPTCHA provider.

use std::time::Duration;

use httpmock::prelude::*;
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

use common::{config_for, credentials, mock_captcha, mock_email_ok, spawn_server, valid_submission};

#[tokio::test]
async fn test_successful_submission_sends_both_emails() {
    let provider = MockServer::start_async().await;
    let business = provider
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v3/smtp/email")
                .body_contains("New Quote Request from Maria Lopez")
                .body_contains("quotes@esmeraldaconstruction.com");
            then.status(201).json_body(json!({ "messageId": "a" }));
        })
        .await;
    let ack = provider
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v3/smtp/email")
                .body_contains("Thank you for requesting a quote")
                .body_contains("maria@example.com");
            then.status(201).json_body(json!({ "messageId": "b" }));
        })
        .await;

    let server = spawn_server(
        config_for(&provider),
        credentials(&[("BREVO_API_KEY", "brevo-test-key")]),
    )
    .await;

    let res = server.submit("198.51.100.1", &valid_submission()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.headers()["x-content-type-options"], "nosniff");
    assert_eq!(res.headers()["cache-control"], "no-store");

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Quote request submitted successfully");

    business.assert_hits_async(1).await;
    ack.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_honeypot_fakes_success_without_sending() {
    let provider = MockServer::start_async().await;
    let email = mock_email_ok(&provider).await;
    let server = spawn_server(
        config_for(&provider),
        credentials(&[("BREVO_API_KEY", "brevo-test-key")]),
    )
    .await;

    let mut payload = valid_submission();
    payload["honeypot"] = json!("http://spam.example");
    let res = server.submit("198.51.100.2", &payload).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    email.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_sixth_request_in_window_is_rate_limited() {
    let provider = MockServer::start_async().await;
    let email = mock_email_ok(&provider).await;
    let server = spawn_server(
        config_for(&provider),
        credentials(&[("BREVO_API_KEY", "brevo-test-key")]),
    )
    .await;

    for _ in 0..5 {
        let res = server.submit("198.51.100.3", &valid_submission()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = server.submit("198.51.100.3", &valid_submission()).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(res.headers().contains_key("retry-after"));
    let body: Value = res.json().await.unwrap();
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Too many requests. Please try again after "));
    assert!(message.ends_with(" UTC"));

    // A different client keeps its own quota.
    let res = server.submit("198.51.100.4", &valid_submission()).await;
    assert_eq!(res.status(), StatusCode::OK);

    email.assert_hits_async(12).await;
}

#[tokio::test]
async fn test_captcha_score_threshold() {
    let provider = MockServer::start_async().await;
    let email = mock_email_ok(&provider).await;
    let mut captcha = mock_captcha(&provider, 0.1).await;
    let server = spawn_server(
        config_for(&provider),
        credentials(&[
            ("BREVO_API_KEY", "brevo-test-key"),
            ("RECAPTCHA_SECRET_KEY", "captcha-secret"),
        ]),
    )
    .await;

    let mut payload = valid_submission();
    payload["recaptchaToken"] = json!("token-from-widget");

    let res = server.submit("198.51.100.5", &payload).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Security validation failed. Please try again.");
    captcha.assert_hits_async(1).await;
    email.assert_hits_async(0).await;

    captcha.delete_async().await;
    let captcha = mock_captcha(&provider, 0.9).await;

    let res = server.submit("198.51.100.5", &payload).await;
    assert_eq!(res.status(), StatusCode::OK);
    captcha.assert_hits_async(1).await;
    email.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_captcha_outage_does_not_block_submissions() {
    let provider = MockServer::start_async().await;
    let email = mock_email_ok(&provider).await;
    provider
        .mock_async(|when, then| {
            when.method(POST).path("/recaptcha/api/siteverify");
            then.status(503);
        })
        .await;
    let server = spawn_server(
        config_for(&provider),
        credentials(&[
            ("BREVO_API_KEY", "brevo-test-key"),
            ("RECAPTCHA_SECRET_KEY", "captcha-secret"),
        ]),
    )
    .await;

    let mut payload = valid_submission();
    payload["recaptchaToken"] = json!("token");
    let res = server.submit("198.51.100.6", &payload).await;

    assert_eq!(res.status(), StatusCode::OK);
    email.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_validation_failures() {
    let provider = MockServer::start_async().await;
    let email = mock_email_ok(&provider).await;
    let server = spawn_server(
        config_for(&provider),
        credentials(&[("BREVO_API_KEY", "brevo-test-key")]),
    )
    .await;

    let mut missing = valid_submission();
    missing["selectedServices"] = json!([]);
    let res = server.submit("198.51.100.7", &missing).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Missing required fields: firstName, lastName, email, phone, and at least one service"
    );

    let mut bad_email = valid_submission();
    bad_email["email"] = json!("maria@localhost");
    let res = server.submit("198.51.100.8", &bad_email).await;
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid email format");

    let mut bad_phone = valid_submission();
    bad_phone["phone"] = json!("555-1234");
    let res = server.submit("198.51.100.9", &bad_phone).await;
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid phone format");

    let mut markup_only = valid_submission();
    markup_only["firstName"] = json!("<script>alert(1)</script>");
    let res = server.submit("198.51.100.10", &markup_only).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    email.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let provider = MockServer::start_async().await;
    let server = spawn_server(
        config_for(&provider),
        credentials(&[("BREVO_API_KEY", "brevo-test-key")]),
    )
    .await;

    let res = server
        .client
        .post(server.url("/api/contact"))
        .header("content-type", "application/json")
        .body("{\"firstName\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid request body");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let provider = MockServer::start_async().await;
    let mut config = config_for(&provider);
    config.security.max_body_size = 1024;
    let server = spawn_server(config, credentials(&[("BREVO_API_KEY", "brevo-test-key")])).await;

    let mut payload = valid_submission();
    payload["projectDetails"] = json!("x".repeat(4096));
    let res = server.submit("198.51.100.11", &payload).await;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_get_is_method_not_allowed() {
    let provider = MockServer::start_async().await;
    let server = spawn_server(config_for(&provider), credentials(&[])).await;

    let res = server.client.get(server.url("/api/contact")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.headers()["allow"], "POST");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Method not allowed");
}

#[tokio::test]
async fn test_missing_api_key_is_configuration_error() {
    let provider = MockServer::start_async().await;
    let email = mock_email_ok(&provider).await;
    let server = spawn_server(config_for(&provider), credentials(&[])).await;

    let res = server.submit("198.51.100.12", &valid_submission()).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Server configuration error");
    email.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_provider_failure_is_generic_500() {
    let provider = MockServer::start_async().await;
    let email = provider
        .mock_async(|when, then| {
            when.method(POST).path("/v3/smtp/email");
            then.status(401)
                .json_body(json!({ "code": "unauthorized", "message": "Key not found" }));
        })
        .await;
    let server = spawn_server(
        config_for(&provider),
        credentials(&[("BREVO_API_KEY", "revoked-key")]),
    )
    .await;

    let res = server.submit("198.51.100.13", &valid_submission()).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Failed to submit quote request. Please try again.");
    // Business notification failed, so no acknowledgment was attempted.
    email.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_template_acknowledgment() {
    let provider = MockServer::start_async().await;
    let templated = provider
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v3/smtp/email")
                .json_body_partial(r#"{"templateId": 7, "params": {"FIRSTNAME": "Maria", "LASTNAME": "Lopez"}}"#);
            then.status(201).json_body(json!({ "messageId": "t" }));
        })
        .await;
    let other = mock_email_ok(&provider).await;

    let mut config = config_for(&provider);
    config.email.template_id = Some(7);
    let server = spawn_server(config, credentials(&[("BREVO_API_KEY", "brevo-test-key")])).await;

    let res = server.submit("198.51.100.14", &valid_submission()).await;
    assert_eq!(res.status(), StatusCode::OK);
    templated.assert_hits_async(1).await;
    other.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_health() {
    let provider = MockServer::start_async().await;
    let server = spawn_server(config_for(&provider), credentials(&[])).await;

    let res = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_slow_acknowledgment_is_not_cut_short() {
    let provider = MockServer::start_async().await;
    let business = provider
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v3/smtp/email")
                .body_contains("New Quote Request from Maria Lopez");
            then.status(201).json_body(json!({ "messageId": "a" }));
        })
        .await;
    let ack = provider
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v3/smtp/email")
                .body_contains("Thank you for requesting a quote");
            then.status(201)
                .delay(Duration::from_millis(1500))
                .json_body(json!({ "messageId": "b" }));
        })
        .await;

    let mut config = config_for(&provider);
    config.timeouts.request_secs = 1;
    config.timeouts.provider_secs = 5;
    let server = spawn_server(config, credentials(&[("BREVO_API_KEY", "brevo-test-key")])).await;

    let res = server.submit("198.51.100.20", &valid_submission()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "application/json");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);

    business.assert_hits_async(1).await;
    ack.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_slow_screening_answers_with_json() {
    let provider = MockServer::start_async().await;
    let email = mock_email_ok(&provider).await;
    provider
        .mock_async(|when, then| {
            when.method(POST).path("/recaptcha/api/siteverify");
            then.status(200)
                .delay(Duration::from_millis(2500))
                .json_body(json!({ "success": true, "score": 0.9 }));
        })
        .await;

    let mut config = config_for(&provider);
    config.timeouts.request_secs = 1;
    config.timeouts.provider_secs = 5;
    let server = spawn_server(
        config,
        credentials(&[
            ("BREVO_API_KEY", "brevo-test-key"),
            ("RECAPTCHA_SECRET_KEY", "captcha-secret"),
        ]),
    )
    .await;

    let mut payload = valid_submission();
    payload["recaptchaToken"] = json!("token");
    let res = server.submit("198.51.100.21", &payload).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.headers()["content-type"], "application/json");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Failed to submit quote request. Please try again.");
    email.assert_hits_async(0).await;
}
