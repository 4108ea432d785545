//! dealscan - document intake and analysis service.
//!
//! Accepts uploaded PDFs and images, extracts their text, runs a single
//! LLM analysis pass over the combined content, and keeps an append-only
//! log of every request/response pair.

mod analysis;
mod cli;
mod config;
mod extract;
mod llm;
mod models;
mod repository;
mod schema;
mod server;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "dealscan=info"
    } else {
        "dealscan=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Run CLI
    cli::run().await
}
