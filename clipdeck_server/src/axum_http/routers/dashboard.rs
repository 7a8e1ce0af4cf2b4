use crate::axum_http::error_responses::AppError;
use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use clipdeck_core::service::posts::PostsService;
use std::sync::Arc;

pub fn routes(posts: PostsService) -> Router {
    Router::new()
        .route("/stats", get(dashboard_stats))
        .with_state(Arc::new(posts))
}

pub async fn dashboard_stats(
    State(posts): State<Arc<PostsService>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(posts.dashboard_stats().await?))
}
