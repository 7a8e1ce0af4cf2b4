pub mod config;
pub mod entity;
pub mod error;
pub mod ids;
pub mod models;
pub mod reconcile;
pub mod service;
pub mod storage;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::{
    config::ClipdeckConfig,
    error::CoreError,
    service::{account_sets::AccountSetsService, posts::PostsService, videos::VideosService},
    storage::UploadStore,
};

/// Main runtime handle for clipdeck: the database connection and the
/// services built on it.
#[derive(Clone)]
pub struct ClipdeckCore {
    pub config: ClipdeckConfig,

    pub db: DatabaseConnection,

    pub account_sets: AccountSetsService,
    pub posts: PostsService,
    pub videos: VideosService,

    /// Where uploaded videos land on disk.
    pub uploads: UploadStore,
}

impl ClipdeckCore {
    /// Connect to the database, apply migrations and wire up the services.
    pub async fn start(config: ClipdeckConfig) -> Result<Self, CoreError> {
        let db = models::open_db(&config).await?;
        models::migrate_up(&db).await?;

        let uploads = UploadStore::from_config(&config);
        info!(
            uploads_dir = %uploads.root().display(),
            url_prefix = uploads.url_prefix(),
            "clipdeck core started"
        );

        Ok(Self {
            account_sets: AccountSetsService::new(db.clone()),
            posts: PostsService::new(db.clone()),
            videos: VideosService::new(db.clone()),
            uploads,
            config,
            db,
        })
    }

    pub async fn shutdown(self) -> Result<(), CoreError> {
        self.db.close().await?;
        info!("clipdeck core stopped");
        Ok(())
    }
}

pub mod prelude {
    pub use super::ids;
    pub use super::entity;
    pub use super::models;

    pub use super::service;

    pub use super::error;

    pub use super::config;

    pub use super::ClipdeckCore;
}
