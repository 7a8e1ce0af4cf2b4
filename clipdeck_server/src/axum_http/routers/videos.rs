use crate::axum_http::error_responses::AppError;
use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use clipdeck_core::{
    entity::prelude::VideoModel,
    ids::{PostId, VideoId},
    models::video::{VideoChanges, VideoUpload},
    service::videos::VideosService,
    storage::UploadStore,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, warn};

pub struct VideoRoutesState {
    pub videos: VideosService,
    pub uploads: UploadStore,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub video: VideoModel,
}

pub fn routes(videos: VideosService, uploads: UploadStore) -> Router {
    Router::new()
        .route("/upload", post(upload_video))
        .route("/by-post/:post_id", get(get_video_by_post))
        .route("/:id", get(get_video).patch(update_video))
        .with_state(Arc::new(VideoRoutesState { videos, uploads }))
}

/// Multipart fields: `file` (required) and `title` (optional).
pub async fn upload_video(
    State(state): State<Arc<VideoRoutesState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut file = None;
    let mut title = None;

    while let Some(field) = multipart.next_field().await.map_err(|error| {
        warn!(%error, "malformed upload form");
        AppError::UploadFailed
    })? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let data = field.bytes().await.map_err(|error| {
                    warn!(%error, "failed to read upload body");
                    AppError::UploadFailed
                })?;
                file = Some((file_name, data));
            }
            Some("title") => {
                title = Some(field.text().await.map_err(|error| {
                    warn!(%error, "failed to read upload title");
                    AppError::UploadFailed
                })?);
            }
            _ => {}
        }
    }

    let Some((file_name, data)) = file else {
        return Err(AppError::BadRequest("No file provided".to_string()));
    };

    let upload = VideoUpload {
        file_name,
        title,
        data,
    };

    let video = state
        .videos
        .store_upload(&state.uploads, upload)
        .await
        .map_err(|error| {
            error!(error = ?error, "upload failed");
            AppError::UploadFailed
        })?;

    Ok(Json(UploadResponse { video }))
}

pub async fn get_video(
    State(state): State<Arc<VideoRoutesState>>,
    Path(id): Path<VideoId>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.videos.get_video(id).await?))
}

pub async fn get_video_by_post(
    State(state): State<Arc<VideoRoutesState>>,
    Path(post_id): Path<PostId>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.videos.get_video_by_post(post_id).await?))
}

pub async fn update_video(
    State(state): State<Arc<VideoRoutesState>>,
    Path(id): Path<VideoId>,
    Json(changes): Json<VideoChanges>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.videos.update_video(id, changes).await?))
}
