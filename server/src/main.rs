//! Webhook Bridge - Main Entry Point
//!
//! Usage: `webhook-bridge [ENV_FILE]`. Without an argument `.env` in the
//! working directory is loaded if present.

use anyhow::Result;
use tracing::{info, warn};

use webhook_bridge::{api, config, db};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "webhook_bridge=info,tower_http=info".into()),
        )
        .json()
        .init();

    // Load configuration
    let env_file = std::env::args().nth(1);
    let loaded = match env_file.as_deref() {
        Some(path) => dotenvy::from_path(path).map(|()| path.into()),
        None => dotenvy::dotenv(),
    };
    if let Err(e) = loaded {
        warn!("Could not load env file: {}. Using process environment.", e);
    }
    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        queue_prefix = %config.queue_prefix,
        horizon_prefix = %config.horizon_prefix,
        secret_required = config.has_secret(),
        "Starting Webhook Bridge"
    );

    // Initialize Redis
    let redis = db::create_redis_client(
        &config.redis_url,
        config.redis_password.as_deref(),
        config.redis_timeout,
    )
    .await?;

    // Build application state
    let state = api::AppState::new(redis, config.clone());

    // Build router
    let app = api::create_router(state);

    // Start server
    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");

    Ok(())
}
