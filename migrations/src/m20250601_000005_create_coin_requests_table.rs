use sea_orm_migration::prelude::*;

use crate::m20250601_000001_create_users_table::Users;
use crate::m20250601_000004_create_activities_table::Activities;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CoinRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CoinRequests::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CoinRequests::UserId).uuid().not_null())
                    .col(ColumnDef::new(CoinRequests::ActivityId).uuid().not_null())
                    .col(ColumnDef::new(CoinRequests::Comment).string().not_null())
                    .col(
                        ColumnDef::new(CoinRequests::State)
                            .string_len(20)
                            .not_null()
                            .default("in_progress"),
                    )
                    .col(
                        ColumnDef::new(CoinRequests::RejectedComment)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(CoinRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_coin_requests_user")
                            .from(CoinRequests::Table, CoinRequests::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_coin_requests_activity")
                            .from(CoinRequests::Table, CoinRequests::ActivityId)
                            .to(Activities::Table, Activities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_coin_requests_state")
                    .table(CoinRequests::Table)
                    .col(CoinRequests::State)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CoinRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CoinRequests {
    Table,
    Id,
    UserId,
    ActivityId,
    Comment,
    State,
    RejectedComment,
    CreatedAt,
}
