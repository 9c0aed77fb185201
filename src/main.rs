//! Agent Relay - HTTP Server Entry Point
//!
//! Starts the HTTP server that exposes the chat API.

use agent_relay::{api, config::Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up credentials from a local .env, if any
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agent_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        max_iterations = config.max_iterations,
        search_max_results = config.search_max_results,
        "Loaded configuration"
    );

    // Start HTTP server
    info!("Starting server on {}", config.bind_address());

    api::serve(config).await?;

    Ok(())
}
