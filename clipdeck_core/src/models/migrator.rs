use sea_orm_migration::prelude::*;

mod m20241201_000001_create_account_set_table;
mod m20241201_000002_create_account_table;
mod m20241201_000003_create_video_table;
mod m20241201_000004_create_post_table;
mod m20241201_000005_create_post_status_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241201_000001_create_account_set_table::Migration),
            Box::new(m20241201_000002_create_account_table::Migration),
            Box::new(m20241201_000003_create_video_table::Migration),
            Box::new(m20241201_000004_create_post_table::Migration),
            Box::new(m20241201_000005_create_post_status_table::Migration),
        ]
    }
}

#[cfg(test)]
use sea_orm::{Database, DbErr};

#[tokio::test]
async fn test_migrations_okay() -> Result<(), DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    let schema_manager = SchemaManager::new(&db);

    Migrator::refresh(&db).await?;

    assert!(schema_manager.has_table("account_set").await?);
    assert!(schema_manager.has_table("account").await?);
    assert!(schema_manager.has_table("video").await?);
    assert!(schema_manager.has_table("post").await?);
    assert!(schema_manager.has_table("post_status").await?);

    Ok(())
}

#[tokio::test]
async fn test_migrations_roll_back_cleanly() -> Result<(), DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    let schema_manager = SchemaManager::new(&db);

    Migrator::up(&db, None).await?;
    Migrator::down(&db, None).await?;

    assert!(!schema_manager.has_table("post_status").await?);
    assert!(!schema_manager.has_table("account_set").await?);

    Ok(())
}
