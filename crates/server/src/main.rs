//! Tastebuds HTTP server.
//!
//! Loads the dataset once, then serves recommendations until interrupted.
//! Configuration comes from `TASTEBUDS_*` variables (or a `.env` file).

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use data_loader::DataIndex;
use server::{AppState, Config, create_router};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!("Starting Tastebuds server with {:?}", config);

    let data_dir = config.data_dir.clone();
    let data_index = tokio::task::spawn_blocking(move || DataIndex::load_from_files(&data_dir))
        .await
        .context("Data loading task panicked")?
        .with_context(|| format!("Failed to load dataset from {}", config.data_dir.display()))?;
    let (users, movies, ratings) = data_index.counts();
    info!("Loaded {} movies, {} users, {} ratings", movies, users, ratings);

    let state = AppState::from_config(Arc::new(data_index), &config)?;
    let app = create_router(state);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down");
        })
        .await
        .context("Server error")?;

    Ok(())
}
