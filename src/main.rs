//! `ScholarRAG` chat client
//!
//! A terminal front-end for a retrieval-augmented query service: send a
//! question with an optional file, read the answer, and keep the service's
//! session going across turns.

mod attachment;
mod config;
mod conversation;
mod input;
mod query;
mod runtime;
mod state_machine;
mod tui;

use config::ChatConfig;
use query::{HttpQueryClient, LoggingQueryService};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ChatConfig::from_env();

    // The terminal belongs to the UI, so logs go to a file
    init_logging(&config.log_path)?;

    let client = HttpQueryClient::new(config.query_url.clone())?;
    let service = LoggingQueryService::new(client);

    tracing::info!(
        endpoint = %config.query_url,
        log = %config.log_path.display(),
        "Starting chat client"
    );

    tui::run(&config, service).await?;
    Ok(())
}

fn init_logging(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scholar_chat=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}
