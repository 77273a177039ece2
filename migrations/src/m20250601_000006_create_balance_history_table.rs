use sea_orm_migration::prelude::*;

use crate::m20250601_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BalanceHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BalanceHistory::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BalanceHistory::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(BalanceHistory::Action)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BalanceHistory::Category)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(BalanceHistory::CategoryId).uuid().not_null())
                    .col(ColumnDef::new(BalanceHistory::Amount).integer().not_null())
                    .col(
                        ColumnDef::new(BalanceHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_balance_history_user")
                            .from(BalanceHistory::Table, BalanceHistory::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_balance_history_user")
                    .table(BalanceHistory::Table)
                    .col(BalanceHistory::UserId)
                    .col(BalanceHistory::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BalanceHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum BalanceHistory {
    Table,
    Id,
    UserId,
    Action,
    Category,
    CategoryId,
    Amount,
    CreatedAt,
}
