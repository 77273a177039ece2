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
                    .table(UserProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserProfiles::UserId)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::Role)
                            .string_len(20)
                            .not_null()
                            .default("employee"),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::Balance)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(UserProfiles::FirstName).string().not_null())
                    .col(ColumnDef::new(UserProfiles::LastName).string().not_null())
                    .col(
                        ColumnDef::new(UserProfiles::Patronymic)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(UserProfiles::Position).string().null())
                    .col(
                        ColumnDef::new(UserProfiles::AvatarBackColor)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::AvatarMainColor)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_profiles_user")
                            .from(UserProfiles::Table, UserProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProfiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum UserProfiles {
    Table,
    UserId,
    Role,
    Balance,
    FirstName,
    LastName,
    Patronymic,
    Position,
    AvatarBackColor,
    AvatarMainColor,
    CreatedAt,
}
