use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AccountSet::Table)
                    .if_not_exists()
                    .col(pk_auto(AccountSet::Id))
                    .col(string_len(AccountSet::Name, 100))
                    .col(text_null(AccountSet::Description))
                    .col(string_len_null(AccountSet::Phone, 50))
                    .col(string_len_null(AccountSet::Email, 200))
                    .col(string_len_null(AccountSet::EmailPassword, 100))
                    .col(
                        timestamp_with_time_zone(AccountSet::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(AccountSet::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccountSet::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AccountSet {
    Table,
    Id,
    Name,
    Description,
    Phone,
    Email,
    EmailPassword,
    CreatedAt,
    UpdatedAt,
}
