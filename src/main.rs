//! wayfarer - command line entry point.
//!
//! Asks the supervisor a question and prints every node update as it arrives.

use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayfarer::{prompts::DEFAULT_QUESTION, render::render_update, Assistant, Config};

#[derive(Debug, Parser)]
#[command(name = "wayfarer", version, about = "Ask a supervisor backed by research and locator agents")]
struct Cli {
    /// Question for the supervisor
    message: Option<String>,

    /// Model for the supervisor and both agents (overrides DEFAULT_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Print every message of each update instead of only the last one
    #[arg(long)]
    full: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the transcript.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayfarer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env()?;
    if let Some(model) = cli.model {
        config.default_model = model;
    }
    info!("Loaded configuration: model={}", config.default_model);

    let assistant = Arc::new(Assistant::from_config(&config)?);
    let question = cli.message.unwrap_or_else(|| DEFAULT_QUESTION.to_string());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let run = tokio::spawn({
        let assistant = Arc::clone(&assistant);
        async move { assistant.ask(&question, Some(&tx)).await }
    });

    while let Some(update) = rx.recv().await {
        print!("{}", render_update(&update, !cli.full));
    }

    let transcript = run.await??;
    info!("Finished with {} messages", transcript.messages.len());
    Ok(())
}
