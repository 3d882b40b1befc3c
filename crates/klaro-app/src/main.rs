use std::sync::Arc;

use clap::Parser;
use klaro_config::Config;
use klaro_core::{JsonPreferenceStore, MemoryPreferenceStore};
use klaro_translator::{TransShell, Translator};
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod controller;
pub mod events;
pub mod frontend;

#[cfg(test)]
mod tests;

use self::cli::{Cli, Command};
use self::controller::AppController;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::new();
    init_tracing(&config);

    let translator: Arc<dyn Translator> = Arc::new(TransShell::new(&config.translator));
    tracing::info!(
        "Using {} ({})",
        translator.metadata().name,
        config.translator.program
    );

    let controller = AppController::new(&config);
    let mut tasks = if cli.ephemeral {
        controller.spawn_tasks(translator, MemoryPreferenceStore::new())
    } else {
        let store = JsonPreferenceStore::from_config(&config.settings)?;
        tracing::info!("Preferences at {}", store.path().display());
        controller.spawn_tasks(translator, store)
    };

    let mut frontend = controller.frontend();
    let command = cli.command.unwrap_or(Command::Shell);

    let result = tokio::select! {
        result = frontend.run(command) => result,
        Some(task) = tasks.join_next() => match task {
            Ok(Ok(())) => Err(anyhow::anyhow!("Backend stopped unexpectedly")),
            Ok(Err(e)) => Err(e.context("Backend failed")),
            Err(e) => Err(anyhow::anyhow!("Backend task panicked: {e}")),
        },
    };

    controller.shutdown();
    while let Some(task) = tasks.join_next().await {
        match task {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("task exited with error: {e:#}"),
            Err(e) => tracing::error!("task panicked: {e}"),
        }
    }

    result
}

/// User-facing errors arrive as notifications, so logs stay quiet by default
const DEFAULT_LOG_FILTER: &str = "warn";

fn init_tracing(config: &Config) {
    // stdout carries translations, logs go to stderr
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log_json {
        builder.json().init();
    } else {
        builder.with_ansi(atty::is(atty::Stream::Stderr)).init();
    }
}
