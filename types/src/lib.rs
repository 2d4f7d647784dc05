//! Core domain types for Quill.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod catalog;
mod error;
mod tokens;

pub use catalog::{CatalogError, Prompt, PromptCatalog, PromptId};
pub use error::ExchangeError;
pub use tokens::{DEFAULT_MAX_PROMPT_TOKENS, estimate_tokens};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// NonEmpty String Types
// ============================================================================

/// A string guaranteed to be non-empty (after trimming).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

#[derive(Debug, Error)]
#[error("value must not be empty")]
pub struct EmptyStringError;

impl NonEmptyString {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyStringError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(EmptyStringError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::ops::Deref for NonEmptyString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for NonEmptyString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// Follow-up Chat Context
// ============================================================================

/// Context carried into a follow-up exchange.
///
/// Holds the original input text and the first result verbatim. Every
/// follow-up call re-derives its prompt from this same pair plus only the
/// latest user message; prior follow-up turns are never resent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatContext {
    pub original_text: String,
    pub result_text: String,
}

impl ChatContext {
    #[must_use]
    pub fn new(original_text: impl Into<String>, result_text: impl Into<String>) -> Self {
        Self {
            original_text: original_text.into(),
            result_text: result_text.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
