mod bot;
mod config;
mod image;
mod markdown;
mod messages;
mod platform;
mod qr;
mod server;
mod validation;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,qrbot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Listen address: {}", config.server.listen_addr);
    info!("  Telegram API: {}", config.telegram.api_url);
    info!("  Bot token set: {}", config.bot_token().is_some());
    info!("  Decode providers: {}", config.decoder.providers.len());

    let addr = config.server.listen_addr.clone();
    let state = Arc::new(AppState::new(config));
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Webhook listening on {}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
