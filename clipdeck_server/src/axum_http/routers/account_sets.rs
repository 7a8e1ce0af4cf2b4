use crate::axum_http::error_responses::AppError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use clipdeck_core::{
    ids::AccountSetId,
    models::account_set::{AccountInput, AccountSetInput},
    service::account_sets::AccountSetsService,
};
use serde::Deserialize;
use std::sync::Arc;

/// Set fields plus the full account roster, as the set form submits them.
#[derive(Debug, Deserialize)]
pub struct AccountSetRequest {
    #[serde(flatten)]
    pub account_set: AccountSetInput,
    #[serde(default)]
    pub accounts: Vec<AccountInput>,
}

pub fn routes(account_sets: AccountSetsService) -> Router {
    Router::new()
        .route("/", get(list_account_sets).post(create_account_set))
        .route(
            "/:id",
            get(get_account_set)
                .put(update_account_set)
                .delete(delete_account_set),
        )
        .route("/:id/accounts", post(add_account))
        .with_state(Arc::new(account_sets))
}

pub async fn list_account_sets(
    State(account_sets): State<Arc<AccountSetsService>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(account_sets.list_account_sets().await?))
}

pub async fn create_account_set(
    State(account_sets): State<Arc<AccountSetsService>>,
    Json(request): Json<AccountSetRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.account_set.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let created = account_sets
        .create_account_set(request.account_set, request.accounts)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_account_set(
    State(account_sets): State<Arc<AccountSetsService>>,
    Path(id): Path<AccountSetId>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(account_sets.get_account_set(id).await?))
}

pub async fn update_account_set(
    State(account_sets): State<Arc<AccountSetsService>>,
    Path(id): Path<AccountSetId>,
    Json(request): Json<AccountSetRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.account_set.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let updated = account_sets
        .update_account_set(id, request.account_set, request.accounts)
        .await?;

    Ok(Json(updated))
}

pub async fn add_account(
    State(account_sets): State<Arc<AccountSetsService>>,
    Path(id): Path<AccountSetId>,
    Json(account): Json<AccountInput>,
) -> Result<impl IntoResponse, AppError> {
    let created = account_sets.add_account(id, account).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_account_set(
    State(account_sets): State<Arc<AccountSetsService>>,
    Path(id): Path<AccountSetId>,
) -> Result<impl IntoResponse, AppError> {
    account_sets.delete_account_set(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
