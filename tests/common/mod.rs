//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use quill_client::CompletionClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Start a mock server that simulates the chat-completions endpoint.
pub async fn start_endpoint() -> MockServer {
    MockServer::start().await
}

/// A client pointed at the mock endpoint.
pub fn test_client(server: &MockServer) -> CompletionClient {
    CompletionClient::new().with_endpoint(server.uri())
}

/// Mount a successful completion response.
pub async fn mount_completion(server: &MockServer, content: &str) {
    let body = serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30 }
    });

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a non-2xx response with the endpoint's error body shape.
pub async fn mount_api_error(server: &MockServer, status: u16, message: &str) {
    let body = serde_json::json!({
        "error": { "message": message, "type": "invalid_request_error" }
    });

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a mock asserting that no request reaches the endpoint.
pub async fn expect_no_requests(server: &MockServer) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}
