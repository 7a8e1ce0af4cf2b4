use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    Config(#[from] envy::Error),

    #[error("data store unavailable")]
    Database(#[from] DbErr),
}
