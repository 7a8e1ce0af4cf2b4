use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clipdeck_core::service::{
    account_sets::AccountSetsServiceError, posts::PostsServiceError,
    videos::VideosServiceError,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upload failed")]
    UploadFailed,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::UploadFailed => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            AppError::Internal(error) => {
                error!(error = ?error, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<AccountSetsServiceError> for AppError {
    fn from(error: AccountSetsServiceError) -> Self {
        match error {
            AccountSetsServiceError::AccountSetNotFound(_) => AppError::NotFound(error.to_string()),
            AccountSetsServiceError::DbError(_) => AppError::Internal(error.into()),
        }
    }
}

impl From<PostsServiceError> for AppError {
    fn from(error: PostsServiceError) -> Self {
        match error {
            PostsServiceError::PostNotFound(_)
            | PostsServiceError::VideoNotFound(_)
            | PostsServiceError::AccountSetNotFound(_)
            | PostsServiceError::StatusNotFound { .. } => AppError::NotFound(error.to_string()),
            PostsServiceError::DbError(_) => AppError::Internal(error.into()),
        }
    }
}

impl From<VideosServiceError> for AppError {
    fn from(error: VideosServiceError) -> Self {
        match error {
            VideosServiceError::VideoNotFound(_) | VideosServiceError::PostNotFound(_) => {
                AppError::NotFound(error.to_string())
            }
            VideosServiceError::DbError(_) | VideosServiceError::Storage(_) => {
                AppError::Internal(error.into())
            }
        }
    }
}
