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
                    .table(Presents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Presents::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Presents::RecipientId).uuid().not_null())
                    // Sender is intentionally not a foreign key: a present
                    // outlives its sender's account.
                    .col(ColumnDef::new(Presents::SenderId).uuid().not_null())
                    .col(ColumnDef::new(Presents::Text).string().not_null())
                    .col(ColumnDef::new(Presents::Sign).string().not_null())
                    .col(ColumnDef::new(Presents::Background).string().not_null())
                    .col(
                        ColumnDef::new(Presents::UcoinAmount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Presents::State)
                            .string_len(10)
                            .not_null()
                            .default("sent"),
                    )
                    .col(
                        ColumnDef::new(Presents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_presents_recipient")
                            .from(Presents::Table, Presents::RecipientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_presents_recipient_state")
                    .table(Presents::Table)
                    .col(Presents::RecipientId)
                    .col(Presents::State)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Presents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Presents {
    Table,
    Id,
    RecipientId,
    SenderId,
    Text,
    Sign,
    Background,
    UcoinAmount,
    State,
    CreatedAt,
}
