pub mod axum_http;
pub mod config;

use std::sync::Arc;

use anyhow::Result;
use clipdeck_core::ClipdeckCore;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub async fn run() -> Result<()> {
    let dotenvy_env = config::config_loader::load()?;
    info!("ENV has been loaded");

    let core = ClipdeckCore::start(dotenvy_env.core.clone()).await?;
    info!("Database connection has been established");

    let core = Arc::new(core);
    axum_http::http_serve::start(Arc::new(dotenvy_env), Arc::clone(&core)).await?;

    if let Ok(core) = Arc::try_unwrap(core) {
        core.shutdown().await?;
    }

    Ok(())
}
