//! checkout-relay server entry point.
//!
//! Starts the Axum HTTP/WebSocket server and the public endpoint exposer.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use checkout_relay::app_state::AppState;
use checkout_relay::config::RelayConfig;
use checkout_relay::domain::{PublicEndpoint, TransactionRegistry};
use checkout_relay::server::build_app;
use checkout_relay::service::RelayService;
use checkout_relay::tunnel;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // Load configuration
    let config = RelayConfig::from_env().context("failed to load configuration")?;
    tracing::info!(addr = %config.listen_addr, "starting checkout-relay");

    // Build domain layer
    let registry = Arc::new(TransactionRegistry::new());
    let endpoint = PublicEndpoint::new();

    // Build service layer
    let relay_service = Arc::new(RelayService::new(registry, endpoint.clone()));

    // Build application state and router
    let app_state = AppState::new(relay_service, &config.static_dir);
    let app = build_app(app_state, Duration::from_secs(config.request_timeout_secs));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    let local_addr = listener.local_addr()?;
    tracing::info!(addr = %local_addr, "payment relay listening");

    // Expose publicly; a tunnel that cannot start is fatal
    let tunnel = tunnel::expose(&config.exposure, local_addr.port(), &endpoint)
        .context("failed to start public tunnel")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(tunnel) = tunnel {
        tunnel.shutdown();
    }
    tracing::info!("checkout-relay stopped");
    Ok(())
}

/// Initializes tracing. `LOG_FORMAT=json` switches to JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
