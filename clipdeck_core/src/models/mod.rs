use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::config::ClipdeckConfig;

pub mod account_set;
pub mod migrator;
pub mod post;
pub mod video;

pub async fn open_db(config: &ClipdeckConfig) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(&config.database_url).await?;
    info!(backend = ?db.get_database_backend(), "database connection established");
    Ok(db)
}

pub async fn migrate_up(db: &DatabaseConnection) -> Result<(), DbErr> {
    migrator::Migrator::up(db, None).await?;
    info!("database migrations applied");
    Ok(())
}
