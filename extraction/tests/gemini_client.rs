//! `GeminiExtractionClient` against a mocked Gemini endpoint.

use gemini_adapter::{GeminiClient, GeminiConfig};
use pdfjson_extraction::prelude::*;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/models/gemini-2.5-flash:generateContent";

fn reply_with_text(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{"content": {"parts": [{"text": text}]}, "finishReason": "STOP"}]
    }))
}

fn client_for(server: &MockServer) -> GeminiExtractionClient {
    let config = GeminiConfig::default()
        .with_base_url(server.uri())
        .with_timeout(Duration::from_secs(5));
    GeminiExtractionClient::new(GeminiClient::new(config).unwrap())
}

#[tokio::test]
async fn test_fenced_reply_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(reply_with_text("```json\n{\"name\": \"Alice\"}\n```"))
        .mount(&server)
        .await;

    let value = client_for(&server)
        .extract("prompt", &Credential::new("key-0"), "gemini-2.5-flash")
        .await
        .unwrap();

    assert_eq!(value, json!({"name": "Alice"}));
}

#[tokio::test]
async fn test_prose_reply_is_malformed_with_raw_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(reply_with_text("I cannot read this document."))
        .mount(&server)
        .await;

    let failure = client_for(&server)
        .extract("prompt", &Credential::new("key-0"), "gemini-2.5-flash")
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::MalformedResponse);
    assert_eq!(
        failure.raw_output.as_deref(),
        Some("I cannot read this document.")
    );
}

/// End to end: the first key is rate-limited, the second succeeds.
#[tokio::test]
async fn test_rotation_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "key-0"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "key-1"))
        .respond_with(reply_with_text("{\"total\": 12.5}"))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = Credentials::new(["key-0", "key-1", "key-2"]).unwrap();
    let (value, metrics) = RotationController::default()
        .run(&client_for(&server), &credentials, "prompt", "gemini-2.5-flash")
        .await
        .unwrap();

    assert_eq!(value, json!({"total": 12.5}));
    assert_eq!(metrics.total_attempts, 2);
}
