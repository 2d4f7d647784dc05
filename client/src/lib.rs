//! Chat-completion endpoint client.
//!
//! # Architecture
//!
//! One type, [`CompletionClient`], performs single request/response exchanges
//! against an OpenAI-compatible chat-completions endpoint:
//!
//! - [`CompletionClient::complete`] - one system instruction + user text exchange
//! - [`CompletionClient::chat`] - the follow-up relay, a thin variant that frames
//!   the original text and first result as fixed context (see [`relay`])
//!
//! # Error Handling
//!
//! Every failure is classified into [`ExchangeError`] and returned to the
//! caller; nothing is retried and nothing is swallowed. Input validation
//! (`EmptyInput`, `NotConfigured`, `TooLong`) happens before any network
//! activity. The request carries a bounded deadline: a hung endpoint
//! surfaces as `Network` rather than suspending the caller indefinitely.
//! Cancellation is cooperative - dropping the returned future aborts the
//! in-flight request.

pub mod relay;

pub use relay::FOLLOW_UP_SYSTEM_PROMPT;

use quill_types::{ChatContext, DEFAULT_MAX_PROMPT_TOKENS, ExchangeError, estimate_tokens};
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;
use std::time::Duration;

/// Canonical chat-completions endpoint.
pub const CHAT_COMPLETIONS_API_URL: &str = "https://api.openai.com/v1/chat/completions";

const CONNECT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

const GENERIC_API_FAILURE: &str = "API request failed";

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build HTTP client: {e}. Falling back to defaults.");
                reqwest::Client::new()
            })
    })
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Client for single exchanges with the completion endpoint.
///
/// Holds no conversation state: each call builds its request from its
/// arguments alone, so two identical calls produce two independent exchanges.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    endpoint: String,
    request_timeout: Duration,
    max_input_tokens: Option<usize>,
    max_output_tokens: Option<u32>,
}

impl Default for CompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            endpoint: CHAT_COMPLETIONS_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_input_tokens: Some(DEFAULT_MAX_PROMPT_TOKENS),
            max_output_tokens: None,
        }
    }

    /// Point the client at a different endpoint (tests, proxies).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Bound the whole exchange to `timeout`; expiry is a `Network` failure.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set or disable the pre-flight input length check.
    ///
    /// The check compares [`estimate_tokens`] against `limit` and is a
    /// courtesy approximation, not a tokenizer.
    #[must_use]
    pub fn with_input_limit(mut self, limit: Option<usize>) -> Self {
        self.max_input_tokens = limit;
        self
    }

    /// Ask the endpoint to cap its reply at `max_tokens`.
    #[must_use]
    pub fn with_max_output_tokens(mut self, max_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_tokens);
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Perform one exchange: system instruction + user text in, reply text out.
    ///
    /// The reply is `choices[0].message.content` verbatim; the caller is
    /// responsible for safe rendering.
    pub async fn complete(
        &self,
        system_instruction: &str,
        user_text: &str,
        model: &str,
        api_key: &str,
    ) -> Result<String, ExchangeError> {
        if user_text.trim().is_empty() {
            return Err(ExchangeError::EmptyInput);
        }
        if api_key.trim().is_empty() || model.trim().is_empty() {
            return Err(ExchangeError::NotConfigured);
        }
        if let Some(max) = self.max_input_tokens {
            let estimated = estimate_tokens(user_text);
            if estimated > max {
                return Err(ExchangeError::TooLong { estimated, max });
            }
        }

        self.execute(system_instruction, user_text, model, api_key)
            .await
    }

    /// One follow-up exchange about a prior result.
    ///
    /// Same network and error semantics as [`complete`](Self::complete), with
    /// a fixed assistant-framing system instruction and the user message
    /// synthesized from `context` plus only the latest `user_message`. Prior
    /// follow-up turns are never part of the request; see [`relay`].
    pub async fn chat(
        &self,
        user_message: &str,
        context: &ChatContext,
        model: &str,
        api_key: &str,
    ) -> Result<String, ExchangeError> {
        if user_message.trim().is_empty() {
            return Err(ExchangeError::EmptyInput);
        }
        if api_key.trim().is_empty() || model.trim().is_empty() {
            return Err(ExchangeError::NotConfigured);
        }

        let combined = relay::compose_user_message(context, user_message);
        self.execute(FOLLOW_UP_SYSTEM_PROMPT, &combined, model, api_key)
            .await
    }

    async fn execute(
        &self,
        system_instruction: &str,
        user_text: &str,
        model: &str,
        api_key: &str,
    ) -> Result<String, ExchangeError> {
        let body = ChatRequest {
            model,
            messages: vec![
                WireMessage {
                    role: "system",
                    content: system_instruction,
                },
                WireMessage {
                    role: "user",
                    content: user_text,
                },
            ],
            max_tokens: self.max_output_tokens,
        };

        let response = http_client()
            .post(&self.endpoint)
            .timeout(self.request_timeout)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = read_capped_error_body(response).await;
            let message = extract_error_message(&body)
                .unwrap_or_else(|| format!("{GENERIC_API_FAILURE} ({status})"));
            return Err(ExchangeError::Api { message });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(classify_transport_error)?;
        extract_reply(&payload)
    }
}

fn classify_transport_error(err: reqwest::Error) -> ExchangeError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("could not reach the endpoint: {err}")
    } else {
        err.to_string()
    };
    ExchangeError::Network { message }
}

/// Pull the assistant reply out of a 2xx body.
///
/// A success body can still carry a top-level error object; that is an API
/// failure, not a transport one.
fn extract_reply(payload: &Value) -> Result<String, ExchangeError> {
    if let Some(message) = payload
        .pointer("/error/message")
        .and_then(Value::as_str)
    {
        return Err(ExchangeError::Api {
            message: message.to_string(),
        });
    }

    payload
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| {
            tracing::warn!("Completion response carried no choices");
            ExchangeError::Api {
                message: GENERIC_API_FAILURE.to_string(),
            }
        })
}

fn extract_error_message(body: &str) -> Option<String> {
    let payload: Value = serde_json::from_str(body).ok()?;
    payload
        .pointer("/error/message")
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

async fn read_capped_error_body(response: reqwest::Response) -> String {
    match response.bytes().await {
        Ok(bytes) if bytes.len() > MAX_ERROR_BODY_BYTES => {
            let text = String::from_utf8_lossy(&bytes[..MAX_ERROR_BODY_BYTES]);
            format!("{text}...(truncated)")
        }
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => String::new(),
    }
}
