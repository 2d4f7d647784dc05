//! Prompt resolution and exchange orchestration.
//!
//! Resolution fails closed: an unresolvable selector or a blank ad hoc
//! instruction is reported before any network activity, so the client is
//! never invoked with an empty instruction. One exchange runs at a time; the
//! follow-up loop reads the next question only after the previous exchange
//! settles.

use anyhow::{Context, Result, bail};
use quill_client::CompletionClient;
use quill_config::ConfigSnapshot;
use quill_types::{ChatContext, NonEmptyString, PromptCatalog};
use std::io::{BufRead, Read, Write};

/// Resolve a catalog selector (numeric id or name) to its instruction text.
pub fn resolve_prompt(catalog: &PromptCatalog, selector: &str) -> Result<NonEmptyString> {
    let prompt = selector
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(|id| catalog.get(quill_types::PromptId::new(id)))
        .or_else(|| catalog.find_by_name(selector));

    let Some(prompt) = prompt else {
        bail!("no prompt named {selector:?}; run `quill prompt list` to see the catalog");
    };

    NonEmptyString::new(prompt.prompt.as_str())
        .with_context(|| format!("prompt {:?} has no instruction text", prompt.name))
}

/// Validate a one-off "prompt on the fly" instruction.
pub fn resolve_ad_hoc(instruction: &str) -> Result<NonEmptyString> {
    NonEmptyString::new(instruction).context("the instruction must not be empty")
}

/// Run one exchange and, optionally, the follow-up loop.
pub async fn run_exchange(
    client: &CompletionClient,
    snapshot: &ConfigSnapshot,
    instruction: &NonEmptyString,
    text: Option<String>,
    follow_up: bool,
) -> Result<()> {
    let input = read_input(text)?;
    let model = snapshot.selected_model.as_str();
    let api_key = snapshot.api_key.as_str();

    tracing::debug!(model, input_chars = input.chars().count(), "Starting exchange");
    eprintln!("quill: asking {}...", display_model(model));
    let result = tokio::select! {
        result = client.complete(instruction.as_str(), &input, model, api_key) => result?,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("quill: cancelled");
            return Ok(());
        }
    };

    println!("{result}");

    if follow_up {
        let context = ChatContext::new(input, result);
        follow_up_loop(client, &context, model, api_key).await?;
    }
    Ok(())
}

/// Read follow-up questions from stdin until EOF.
///
/// Each question is an independent exchange against the same fixed context;
/// empty lines are ignored rather than submitted.
async fn follow_up_loop(
    client: &CompletionClient,
    context: &ChatContext,
    model: &str,
    api_key: &str,
) -> Result<()> {
    let stdin = std::io::stdin();
    loop {
        eprint!("> ");
        std::io::stderr().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }

        let reply = tokio::select! {
            result = client.chat(question, context, model, api_key) => result,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("quill: cancelled");
                return Ok(());
            }
        };
        match reply {
            Ok(reply) => println!("{reply}"),
            // A failed follow-up is reported but does not end the loop.
            Err(err) => {
                tracing::warn!(%err, "Follow-up exchange failed");
                eprintln!("quill: {err}");
            }
        }
    }
}

fn read_input(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read input text from stdin")?;
            Ok(buffer)
        }
    }
}

fn display_model(model: &str) -> &str {
    if model.trim().is_empty() {
        "(no model configured)"
    } else {
        model
    }
}
