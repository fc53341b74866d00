//! Integration tests for Gemini inference against a mock endpoint

use ajlist_events::{
    Client, ClientConfig, ClientError, InferenceMessage, InferenceRequest, ProviderError,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, api_key: &str) -> Client {
    let config = ClientConfig::builder(api_key)
        .gemini_base_url(server.uri())
        .build()
        .unwrap();
    Client::new(config).unwrap()
}

#[tokio::test]
async fn test_infer_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-gemini-key"))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "Name a fruit"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Mango"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 1, "totalTokenCount": 4}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "test-gemini-key");
    let response = client
        .infer(&InferenceRequest::prompt("Name a fruit"))
        .await
        .unwrap();

    assert_eq!(response.model, "gemini-1.5-flash");
    assert_eq!(response.text, "Mango");
    assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
    assert_eq!(response.usage.unwrap().total_tokens, 4);
}

#[tokio::test]
async fn test_infer_with_explicit_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "test-gemini-key");
    let request = InferenceRequest {
        model: Some("models/gemini-1.5-pro".to_string()),
        messages: vec![InferenceMessage::user("ping")],
        ..Default::default()
    };

    let response = client.infer(&request).await.unwrap();
    assert_eq!(response.text, "ok");
    assert!(response.usage.is_none());
}

#[tokio::test]
async fn test_rejected_key_fails_on_first_use() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}
        })))
        .mount(&server)
        .await;

    // Construction succeeds; the remote side only sees the key on the first call
    let client = client_for(&server, "not-a-real-key");
    let err = client
        .infer(&InferenceRequest::prompt("hello"))
        .await
        .unwrap_err();

    match err {
        ClientError::Provider(ProviderError::BadRequest(message)) => {
            assert_eq!(message, "API key not valid.")
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_infer_error_statuses() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exhausted"))
        .mount(&server)
        .await;

    let client = client_for(&server, "test-gemini-key");
    let err = client
        .infer(&InferenceRequest::prompt("hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Provider(ProviderError::RateLimit(_))));
}

#[tokio::test]
async fn test_empty_request_is_rejected_locally() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, "test-gemini-key");
    let err = client
        .infer(&InferenceRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Provider(ProviderError::BadRequest(_))));

    server.verify().await;
}

#[tokio::test]
async fn test_blank_model_uses_default() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server, "test-gemini-key");
    for model in ["", "   "] {
        let request = InferenceRequest {
            model: Some(model.to_string()),
            messages: vec![InferenceMessage::user("ping")],
            ..Default::default()
        };

        let response = client.infer(&request).await.unwrap();
        assert_eq!(response.model, "gemini-1.5-flash");
    }

    server.verify().await;
}
