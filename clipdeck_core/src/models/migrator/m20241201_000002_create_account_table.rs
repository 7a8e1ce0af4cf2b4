use sea_orm_migration::{prelude::*, schema::*};

use super::m20241201_000001_create_account_set_table::AccountSet;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Account::Table)
                    .if_not_exists()
                    .col(pk_auto(Account::Id))
                    .col(integer(Account::AccountSetId))
                    .col(string_len(Account::Platform, 50))
                    .col(string_len(Account::AccountName, 100))
                    .col(string_len(Account::Username, 100))
                    .col(string_len(Account::Password, 100))
                    .col(text_null(Account::Notes))
                    .col(
                        timestamp_with_time_zone(Account::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Account::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-account-account_set_id")
                            .from(Account::Table, Account::AccountSetId)
                            .to(AccountSet::Table, AccountSet::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_account_account_set_id")
                    .table(Account::Table)
                    .col(Account::AccountSetId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Account::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Account {
    Table,
    Id,
    AccountSetId,
    Platform,
    AccountName,
    Username,
    Password,
    Notes,
    CreatedAt,
    UpdatedAt,
}
