//! Settings-surface subcommands: catalog management and stored configuration.
//!
//! Every mutation clones the current snapshot, edits the copy, and hands it
//! back to the store, which persists before swapping it in.

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use quill_config::ConfigStore;
use quill_types::PromptId;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum PromptCommand {
    /// Add a prompt to the end of the catalog.
    Add {
        /// Menu name for the prompt.
        name: String,
        /// The instruction text.
        text: String,
    },
    /// Edit a prompt's name and/or text.
    Edit {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        text: Option<String>,
    },
    /// Delete a prompt.
    Rm { id: u64 },
    /// Move a prompt to a new position (1-based).
    Move { id: u64, position: usize },
    /// List prompts in invocation order.
    List,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Store the API key.
    SetKey { key: String },
    /// Store the model identifier.
    SetModel { model: String },
    /// Show the current settings (API key redacted).
    Show,
    /// Print the config file path.
    Path,
    /// Write the settings document to a file, or stdout when omitted.
    Export { path: Option<PathBuf> },
    /// Merge a settings document into the stored configuration.
    Import { path: PathBuf },
}

pub fn prompt(store: &ConfigStore, command: PromptCommand) -> Result<()> {
    match command {
        PromptCommand::Add { name, text } => {
            let mut snapshot = (*store.snapshot()).clone();
            let id = snapshot.prompts.add(&name, text)?;
            store.replace(snapshot)?;
            println!("added prompt {id}: {name}");
        }
        PromptCommand::Edit { id, name, text } => {
            if name.is_none() && text.is_none() {
                bail!("nothing to change; pass --name and/or --text");
            }
            let id = PromptId::new(id);
            let mut snapshot = (*store.snapshot()).clone();
            if let Some(name) = name {
                snapshot.prompts.rename(id, name)?;
            }
            if let Some(text) = text {
                snapshot.prompts.edit(id, text)?;
            }
            store.replace(snapshot)?;
            println!("updated prompt {id}");
        }
        PromptCommand::Rm { id } => {
            let id = PromptId::new(id);
            let mut snapshot = (*store.snapshot()).clone();
            let removed = snapshot.prompts.remove(id)?;
            store.replace(snapshot)?;
            println!("removed prompt {id}: {}", removed.name);
        }
        PromptCommand::Move { id, position } => {
            let id = PromptId::new(id);
            let index = position.saturating_sub(1);
            let mut snapshot = (*store.snapshot()).clone();
            snapshot.prompts.reorder(id, index)?;
            store.replace(snapshot)?;
            println!("moved prompt {id} to position {}", index + 1);
        }
        PromptCommand::List => {
            let snapshot = store.snapshot();
            if snapshot.prompts.is_empty() {
                println!("no prompts; add one with `quill prompt add <name> <text>`");
                return Ok(());
            }
            for (index, prompt) in snapshot.prompts.iter().enumerate() {
                println!(
                    "{:>2}. [{}] {}\n      {}",
                    index + 1,
                    prompt.id,
                    prompt.name,
                    prompt.prompt
                );
            }
        }
    }
    Ok(())
}

pub fn config(store: &ConfigStore, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::SetKey { key } => {
            let mut snapshot = (*store.snapshot()).clone();
            snapshot.api_key = key;
            store.replace(snapshot)?;
            println!("API key saved");
        }
        ConfigCommand::SetModel { model } => {
            let mut snapshot = (*store.snapshot()).clone();
            snapshot.selected_model = model.clone();
            store.replace(snapshot)?;
            println!("model set to {model}");
        }
        ConfigCommand::Show => {
            let snapshot = store.snapshot();
            let key_status = if snapshot.api_key.trim().is_empty() {
                "(not set)"
            } else {
                "(set, redacted)"
            };
            let model = if snapshot.selected_model.trim().is_empty() {
                "(not set)"
            } else {
                snapshot.selected_model.as_str()
            };
            println!("api key: {key_status}");
            println!("model:   {model}");
            println!("prompts: {}", snapshot.prompts.len());
        }
        ConfigCommand::Path => {
            println!("{}", store.path().display());
        }
        ConfigCommand::Export { path } => {
            let document = store.snapshot().export()?;
            match path {
                Some(path) => {
                    std::fs::write(&path, format!("{document}\n"))
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("settings exported to {}", path.display());
                }
                None => println!("{document}"),
            }
        }
        ConfigCommand::Import { path } => {
            let document = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let merged = store.snapshot().apply_import(&document)?;
            let count = merged.prompts.len();
            store.replace(merged)?;
            println!("settings imported ({count} prompts)");
        }
    }
    Ok(())
}
