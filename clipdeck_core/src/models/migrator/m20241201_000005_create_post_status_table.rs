use sea_orm_migration::{prelude::*, schema::*};

use super::m20241201_000002_create_account_table::Account;
use super::m20241201_000004_create_post_table::Post;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PostStatus::Table)
                    .if_not_exists()
                    .col(pk_auto(PostStatus::Id))
                    .col(integer(PostStatus::PostId))
                    .col(integer(PostStatus::AccountId))
                    .col(boolean(PostStatus::IsPosted).default(false))
                    .col(timestamp_with_time_zone_null(PostStatus::PostedAt))
                    .col(text_null(PostStatus::Notes))
                    .col(
                        timestamp_with_time_zone(PostStatus::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(PostStatus::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-post_status-post_id")
                            .from(PostStatus::Table, PostStatus::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-post_status-account_id")
                            .from(PostStatus::Table, PostStatus::AccountId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One status per (post, account)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_status_post_account_unique")
                    .table(PostStatus::Table)
                    .col(PostStatus::PostId)
                    .col(PostStatus::AccountId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_post_status_account_id")
                    .table(PostStatus::Table)
                    .col(PostStatus::AccountId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostStatus::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PostStatus {
    Table,
    Id,
    PostId,
    AccountId,
    IsPosted,
    PostedAt,
    Notes,
    CreatedAt,
    UpdatedAt,
}
