// Main entry point for the Social Saver API server

use std::sync::Arc;

use anyhow::{Context, Result};
use saver_core::kernel::ServerDeps;
use saver_core::server::{build_app, AxumAppState};
use saver_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,saver_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Social Saver API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        ai_provider = %config.ai_provider,
        webhook_provider = %config.webhook_provider,
        "Configuration loaded"
    );

    // Storage, scraping, AI and messaging
    let deps = ServerDeps::from_config(&config)
        .await
        .context("Failed to initialize server dependencies")?;
    tracing::info!(storage = deps.store.backend(), "Dependencies ready");

    // Build application
    let app = build_app(AxumAppState::new(
        Arc::new(deps),
        config.meta_verify_token.clone(),
    ));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
