use crate::axum_http::error_responses::AppError;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use clipdeck_core::{
    ids::{AccountId, PostId},
    models::post::{NewPost, PostChanges},
    service::posts::PostsService,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub is_posted: bool,
}

pub fn routes(posts: PostsService) -> Router {
    Router::new()
        .route("/", get(list_posts_between).post(create_post))
        .route("/today", get(todays_posts))
        .route("/upcoming", get(upcoming_posts))
        .route(
            "/:id",
            get(get_post).patch(update_post).delete(delete_post),
        )
        .route("/:id/statuses/:account_id", put(set_status))
        .route("/:id/statuses/:account_id/toggle", post(toggle_status))
        .with_state(Arc::new(posts))
}

pub async fn list_posts_between(
    State(posts): State<Arc<PostsService>>,
    Query(range): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    if range.end <= range.start {
        return Err(AppError::BadRequest("end must be after start".to_string()));
    }

    Ok(Json(posts.list_posts_between(range.start, range.end).await?))
}

pub async fn todays_posts(
    State(posts): State<Arc<PostsService>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(posts.todays_posts().await?))
}

pub async fn upcoming_posts(
    State(posts): State<Arc<PostsService>>,
    Query(query): Query<UpcomingQuery>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(posts.upcoming_posts(query.limit).await?))
}

pub async fn create_post(
    State(posts): State<Arc<PostsService>>,
    Json(new_post): Json<NewPost>,
) -> Result<impl IntoResponse, AppError> {
    let created = posts.create_post(new_post).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_post(
    State(posts): State<Arc<PostsService>>,
    Path(id): Path<PostId>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(posts.get_post(id).await?))
}

pub async fn update_post(
    State(posts): State<Arc<PostsService>>,
    Path(id): Path<PostId>,
    Json(changes): Json<PostChanges>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(posts.update_post(id, changes).await?))
}

pub async fn delete_post(
    State(posts): State<Arc<PostsService>>,
    Path(id): Path<PostId>,
) -> Result<impl IntoResponse, AppError> {
    posts.delete_post(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_status(
    State(posts): State<Arc<PostsService>>,
    Path((post_id, account_id)): Path<(PostId, AccountId)>,
    Json(update): Json<StatusUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let status = if update.is_posted {
        posts.mark_posted(post_id, account_id).await?
    } else {
        posts.mark_not_posted(post_id, account_id).await?
    };

    Ok(Json(status))
}

pub async fn toggle_status(
    State(posts): State<Arc<PostsService>>,
    Path((post_id, account_id)): Path<(PostId, AccountId)>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(posts.toggle_posted(post_id, account_id).await?))
}
