use sea_orm_migration::{prelude::*, schema::*};

use super::m20241201_000001_create_account_set_table::AccountSet;
use super::m20241201_000003_create_video_table::Video;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Post::Table)
                    .if_not_exists()
                    .col(pk_auto(Post::Id))
                    .col(integer(Post::VideoId))
                    .col(integer(Post::AccountSetId))
                    .col(timestamp_with_time_zone(Post::ScheduledDate))
                    .col(text_null(Post::Notes))
                    .col(
                        timestamp_with_time_zone(Post::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Post::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    // Videos are never deleted while scheduled
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-post-video_id")
                            .from(Post::Table, Post::VideoId)
                            .to(Video::Table, Video::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-post-account_set_id")
                            .from(Post::Table, Post::AccountSetId)
                            .to(AccountSet::Table, AccountSet::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Date-range reads and dashboard buckets filter on this
        manager
            .create_index(
                Index::create()
                    .name("idx_post_scheduled_date")
                    .table(Post::Table)
                    .col(Post::ScheduledDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_post_account_set_id")
                    .table(Post::Table)
                    .col(Post::AccountSetId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Post::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Post {
    Table,
    Id,
    VideoId,
    AccountSetId,
    ScheduledDate,
    Notes,
    CreatedAt,
    UpdatedAt,
}
