//! Failure taxonomy for one exchange with the completion endpoint.
//!
//! Every variant renders to a user-facing message. The first three are
//! produced before any network activity; the last two classify what the
//! network attempt reported. No failure is retried and none is swallowed.

use thiserror::Error;

/// Why an exchange produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// Nothing to send: the input text was empty after trimming.
    #[error("no input text provided")]
    EmptyInput,

    /// API key or model is missing; the user must configure both first.
    #[error("API key or model not configured; run `quill config` to set them")]
    NotConfigured,

    /// Client-side length heuristic exceeded. The estimate is chars/4, an
    /// approximation rather than a real tokenizer.
    #[error("input too long: ~{estimated} tokens exceeds the limit of {max}")]
    TooLong { estimated: usize, max: usize },

    /// The endpoint reported a problem; the server message is surfaced verbatim.
    #[error("API error: {message}")]
    Api { message: String },

    /// Transport-level failure (DNS, TLS, connect, timeout).
    #[error("network error: {message}")]
    Network { message: String },
}

impl ExchangeError {
    /// Whether the failure happened before any request was issued.
    #[must_use]
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            ExchangeError::EmptyInput | ExchangeError::NotConfigured | ExchangeError::TooLong { .. }
        )
    }
}
