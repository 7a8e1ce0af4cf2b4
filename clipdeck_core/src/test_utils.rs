use chrono::Utc;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, NotSet, Set};
use sea_orm_migration::MigratorTrait;

use crate::{
    entity::prelude::*,
    ids::AccountId,
    models::{
        account_set::{AccountInput, AccountSetInput},
        migrator::Migrator,
    },
};

/// Create a fresh in-memory SQLite database with every migration applied.
///
/// Only built for this crate's tests or with the `test-utils` feature.
///
/// # Example
/// ```ignore
/// use clipdeck_core::test_utils;
///
/// #[tokio::test]
/// async fn my_test() {
///     let db = test_utils::create_test_db().await;
///     // Database is ready to use!
/// }
/// ```
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub fn set_input(name: &str) -> AccountSetInput {
    AccountSetInput {
        name: name.to_string(),
        ..Default::default()
    }
}

pub fn account_input(id: Option<AccountId>, platform: Platform, name: &str) -> AccountInput {
    AccountInput {
        id,
        platform,
        account_name: name.to_string(),
        username: format!("{name}@example.com"),
        password: "hunter2".to_string(),
        notes: None,
    }
}

/// Insert a video row without touching the filesystem.
pub async fn insert_video(db: &DatabaseConnection, title: &str) -> VideoModel {
    let now = Utc::now();
    VideoActiveModel {
        id: NotSet,
        title: Set(title.to_string()),
        file_path: Set(format!("/uploads/{title}.mp4")),
        duration: Set(Some("0:30".to_string())),
        caption: Set(None),
        thumbnail_path: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert video")
}

pub async fn insert_account_set(db: &DatabaseConnection, name: &str) -> AccountSetModel {
    let now = Utc::now();
    AccountSetActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        description: Set(None),
        phone: Set(None),
        email: Set(None),
        email_password: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert account set")
}
