//! Client-side token estimation.

/// Default maximum estimated tokens accepted by the pre-flight length check.
pub const DEFAULT_MAX_PROMPT_TOKENS: usize = 4000;

/// Estimate the token count of `text` as `ceil(chars / 4)`.
///
/// This is a courtesy heuristic, not a tokenizer: it exists only to reject
/// obviously oversized input before spending a network round trip. Real token
/// counts vary by model and can differ substantially from this figure.
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}
