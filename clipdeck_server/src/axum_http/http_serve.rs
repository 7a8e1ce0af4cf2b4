use crate::{
    axum_http::{default_routers, routers},
    config::config_model::{check_uploads_prefix, DotEnvyConfig, ServerConfig},
};
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use clipdeck_core::ClipdeckCore;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Builds the full application router over `core`.
pub fn app(core: &ClipdeckCore, server: &ServerConfig) -> Result<Router> {
    let uploads_prefix = core.uploads.url_prefix();
    check_uploads_prefix(uploads_prefix)?;

    let body_limit = server.body_limit_bytes()?;

    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest(
            "/api/v1/account-sets",
            routers::account_sets::routes(core.account_sets.clone()),
        )
        .nest("/api/v1/posts", routers::posts::routes(core.posts.clone()))
        .nest(
            "/api/v1/videos",
            routers::videos::routes(core.videos.clone(), core.uploads.clone()),
        )
        .nest(
            "/api/v1/dashboard",
            routers::dashboard::routes(core.posts.clone()),
        )
        .route("/api/v1/health-check", get(default_routers::health_check))
        .nest_service(uploads_prefix, ServeDir::new(core.uploads.root()))
        .layer(TimeoutLayer::new(Duration::from_secs(server.timeout_secs)))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_headers([CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

pub async fn start(config: Arc<DotEnvyConfig>, core: Arc<ClipdeckCore>) -> Result<()> {
    let app = app(&core, &config.server)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received ctrl+C signal"),
        Err(error) => {
            tracing::error!(%error, "failed to listen for ctrl+C, shutting down");
        }
    }
}
