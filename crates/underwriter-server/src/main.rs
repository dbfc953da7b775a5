//! Loan Underwriting HTTP Server
//!
//! Provides REST API for underwriting loan applications.

use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use underwriter_server::{api, config::ServerConfig, engine};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = ServerConfig::load()?;

    // Initialize tracing
    init_tracing(&config)?;
    info!("Loaded configuration: {:?}", redacted(&config));

    // Initialize underwriting engine
    let engine = engine::init_engine(&config).await?;
    info!("Underwriting engine initialized");

    let app = api::create_router(Arc::new(engine));

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    info!("  Health check: http://{}/health", addr);
    info!("  Underwrite: POST http://{}/v1/underwrite", addr);
    info!("  Analytics: http://{}/v1/analytics", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize tracing subscriber
///
/// `RUST_LOG` wins over the configured log level.
fn init_tracing(config: &ServerConfig) -> Result<()> {
    let default_filter = format!(
        "underwriter_server={level},underwriter_runtime={level},tower_http=debug",
        level = config.log_level
    );

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}

/// Copy of the configuration safe to log
fn redacted(config: &ServerConfig) -> ServerConfig {
    let mut config = config.clone();
    if config.router.http.api_key.is_some() {
        config.router.http.api_key = Some("***".to_string());
    }
    config
}
