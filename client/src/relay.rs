//! Follow-up message composition.
//!
//! Follow-ups are deliberately single-turn-with-fixed-context: every call
//! embeds the same `(original text, first result)` pair plus only the latest
//! user message. Nothing accumulates - the model never sees earlier follow-up
//! exchanges unless the caller folds them into the result text itself. This
//! keeps each follow-up cheap and stateless.

use quill_types::ChatContext;

/// Fixed system instruction for follow-up exchanges.
pub const FOLLOW_UP_SYSTEM_PROMPT: &str = "You are a helpful assistant. \
    You have access to the original text and its processed result. \
    Help the user with any questions or requests about the text.";

/// Build the labeled three-part user message for one follow-up call.
#[must_use]
pub(crate) fn compose_user_message(context: &ChatContext, user_message: &str) -> String {
    format!(
        "Original text: \"{}\"\n\nProcessed result: \"{}\"\n\nUser message: {}",
        context.original_text, context.result_text, user_message
    )
}
