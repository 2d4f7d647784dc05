//! Quill CLI - binary entry point and command dispatch.
//!
//! # Architecture
//!
//! The CLI bridges [`quill_config`] (persisted settings) and [`quill_client`]
//! (the completion endpoint client):
//!
//! ```text
//! main() -> Cli::parse() -> dispatch::run_* | commands::*
//!                                |
//!                                v
//!                 CompletionClient::{complete, chat}
//! ```
//!
//! Exchanges run one at a time. While one is in flight a status line goes to
//! stderr and Ctrl-C aborts it by dropping the exchange future; results go to
//! stdout, every failure goes to stderr with a non-zero exit code.

mod commands;
mod dispatch;

use anyhow::Result;
use clap::{Parser, Subcommand};
use quill_client::CompletionClient;
use quill_config::ConfigStore;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "quill", version, about, long_about = None)]
struct Cli {
    /// Use an alternate config file.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a catalog prompt (by name or id) over the input text.
    Run {
        /// Prompt name or numeric id.
        prompt: String,
        /// Input text; read from stdin when omitted.
        #[arg(long)]
        text: Option<String>,
        /// After the result, read follow-up questions from stdin.
        #[arg(long)]
        follow_up: bool,
    },
    /// Run a one-off instruction over the input text.
    Ask {
        /// The instruction to apply.
        instruction: String,
        /// Input text; read from stdin when omitted.
        #[arg(long)]
        text: Option<String>,
        /// After the result, read follow-up questions from stdin.
        #[arg(long)]
        follow_up: bool,
    },
    /// Manage the prompt catalog.
    #[command(subcommand)]
    Prompt(commands::PromptCommand),
    /// Manage stored settings.
    #[command(subcommand)]
    Config(commands::ConfigCommand),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("quill: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let store = match cli.config {
        Some(path) => ConfigStore::open(path)?,
        None => ConfigStore::open_default()?,
    };

    match cli.command {
        Command::Run {
            prompt,
            text,
            follow_up,
        } => {
            let snapshot = store.snapshot();
            let instruction = dispatch::resolve_prompt(&snapshot.prompts, &prompt)?;
            let client = CompletionClient::new();
            dispatch::run_exchange(&client, &snapshot, &instruction, text, follow_up).await
        }
        Command::Ask {
            instruction,
            text,
            follow_up,
        } => {
            let snapshot = store.snapshot();
            let instruction = dispatch::resolve_ad_hoc(&instruction)?;
            let client = CompletionClient::new();
            dispatch::run_exchange(&client, &snapshot, &instruction, text, follow_up).await
        }
        Command::Prompt(command) => commands::prompt(&store, command),
        Command::Config(command) => commands::config(&store, command),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("error"));

    if let Some(file) = open_log_file() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();
        return;
    }

    // No log file available: stay quiet rather than interleaving logs with
    // the result on stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> Option<std::fs::File> {
    let dir = ConfigStore::default_path()?.parent()?.join("logs");
    fs::create_dir_all(&dir).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("quill.log"))
        .ok()
}
