//! Gotigram - main entry point.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gotigram::{
    config::Config,
    dispatch::Dispatcher,
    gotify::{CatalogClient, StreamConsumer},
    registry::SubscriptionRegistry,
    telegram::{CommandAdapter, TelegramClient, TelegramSender},
};

#[derive(Parser, Debug)]
#[command(name = "gotigram")]
#[command(about = "Relay Gotify push notifications to a Telegram chat")]
#[command(version)]
struct Args {
    /// Log file path (overrides GOTIGRAM_LOG_FILE)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::from_env().context("Failed to load configuration")?;

    let log_path = args.log_file.unwrap_or_else(|| config.log_file.clone());
    init_tracing(&log_path).context("Failed to set up logging")?;

    tracing::info!("Starting gotigram");

    let registry = Arc::new(SubscriptionRegistry::new());

    let catalog = CatalogClient::new(&config.gotify).context("Failed to build catalog client")?;
    let telegram = Arc::new(
        TelegramClient::new(&config.telegram).context("Failed to build Telegram client")?,
    );
    let sender = TelegramSender::new(Arc::clone(&telegram), config.telegram.chat_id);

    let dispatcher = Dispatcher::new(Arc::clone(&registry), sender);
    let consumer = StreamConsumer::new(&config.gotify);

    // Command path: runs until the process exits.
    let adapter = CommandAdapter::new(telegram, registry, catalog);
    let command_task = tokio::spawn(async move { adapter.run().await });

    // Stream path: when it ends, so does the application. Restarting is
    // the supervisor's job.
    let result = tokio::select! {
        res = consumer.run(&dispatcher) => match res {
            Ok(()) => {
                tracing::info!("Gotify stream ended");
                Ok(())
            }
            Err(e) => {
                tracing::error!("Gotify stream failed: {}", e);
                Err(anyhow::Error::new(e))
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal");
            Ok(())
        }
    };

    command_task.abort();
    tracing::info!("gotigram stopped");
    result
}

/// Tracing to stderr plus an append-only line log.
fn init_tracing(log_path: &std::path::Path) -> anyhow::Result<()> {
    if let Some(dir) = log_path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        }
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gotigram=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    Ok(())
}
