//! Evently event API server.

use anyhow::Result;
use evently_api::{api, config, state::AppState};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::Config::from_env()?;

    // Prefer RUST_LOG, fall back to EVENTLY_LOG_LEVEL
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting evently event API");
    info!(listen_addr = %config.listen_addr, "Configuration loaded");

    if config.uses_default_secret() {
        warn!("JWT_SECRET is not set; tokens are signed with the built-in fallback secret");
    }
    match &config.notify_webhook_url {
        Some(url) => info!(url = %url, "Sending confirmations to webhook"),
        None => info!("No notification webhook configured; confirmations are logged only"),
    }

    let state = AppState::from_config(&config);
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(addr = %config.listen_addr, "Listening for connections");

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received shutdown signal"),
                Err(e) => {
                    error!(error = %e, "Failed to listen for shutdown signal");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await;

    if let Err(e) = &result {
        error!(error = %e, "Server error");
    }
    result?;

    info!("Event API shutdown complete");
    Ok(())
}
