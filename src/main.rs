//! goproxy-keeper - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use goproxy_keeper::api::{routes, AppState};
use goproxy_keeper::config::Config;
use goproxy_keeper::error::Result;
use goproxy_keeper::{storage, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    telemetry::init_tracing(&config.log_level);
    tracing::info!("Starting goproxy-keeper");

    let storage = storage::from_config(&config).await?;
    tracing::info!(backend = %config.storage_backend, "Storage initialized");

    let addr: SocketAddr = config.bind_address.parse()?;
    let state = Arc::new(AppState::new(config, storage));
    let app = routes::create_router(state);

    tracing::info!(%addr, "Listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
