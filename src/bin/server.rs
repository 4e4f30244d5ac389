//! spaceace HTTP server binary.
//!
//! Serves the tool registry so an agent process can list and invoke tools.
//!
//! # Environment Variables
//!
//! - `PORT`: HTTP port (default: 8080)
//! - `WEATHER_API_KEY`: weatherapi.com key
//! - `WEATHER_API_BASE_URL`, `OPEN_NOTIFY_BASE_URL`: upstream overrides
//! - `FETCH_MAX_ATTEMPTS`, `FETCH_TIMEOUT_SECS`, `FETCH_RETRY_DELAY_SECS`: retry policy
//! - `RUST_LOG`: Tracing filter (default: "info,spaceace=debug")
//!
//! A `.env` file in the working directory is loaded first if present.

use anyhow::Context;
use spaceace::server::{app_router, AppState};
use spaceace::{Settings, ToolRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,spaceace=debug".into()),
        )
        .init();

    let settings = Settings::from_env().context("invalid configuration")?;
    tracing::debug!(?settings, "loaded settings");
    tracing::info!(
        "Fetch policy: {} attempts, {:?} timeout, {:?} delay (worst case {:?} per call)",
        settings.retry.max_attempts,
        settings.retry.timeout,
        settings.retry.retry_delay,
        settings.retry.worst_case()
    );

    let registry = ToolRegistry::with_defaults(settings).context("failed to build HTTP client")?;
    tracing::info!("Registered tools: {}", registry.tool_names());

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_addr = format!("0.0.0.0:{}", port);

    let app = app_router(AppState::new(registry));

    tracing::info!("spaceace server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health: liveness probe");
    tracing::info!("  GET  /tools : tool descriptors");
    tracing::info!("  POST /invoke: run a tool call");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
        .context("server failed")?;

    Ok(())
}
