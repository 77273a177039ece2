use sea_orm_migration::prelude::*;

use crate::m20250601_000001_create_users_table::Users;
use crate::m20250601_000010_create_sizes_table::Sizes;
use crate::m20250601_000011_create_product_items_table::ProductItems;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CartItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CartItems::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CartItems::UserId).uuid().not_null())
                    .col(ColumnDef::new(CartItems::ItemId).uuid().not_null())
                    .col(ColumnDef::new(CartItems::SizeId).uuid().not_null())
                    .col(
                        ColumnDef::new(CartItems::Quantity)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(CartItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CartItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_items_user")
                            .from(CartItems::Table, CartItems::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_items_item")
                            .from(CartItems::Table, CartItems::ItemId)
                            .to(ProductItems::Table, ProductItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_items_size")
                            .from(CartItems::Table, CartItems::SizeId)
                            .to(Sizes::Table, Sizes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One row per user/item/size triple; quantity carries the count.
        manager
            .create_index(
                Index::create()
                    .name("idx_cart_items_unique_line")
                    .table(CartItems::Table)
                    .col(CartItems::UserId)
                    .col(CartItems::ItemId)
                    .col(CartItems::SizeId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CartItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CartItems {
    Table,
    Id,
    UserId,
    ItemId,
    SizeId,
    Quantity,
    CreatedAt,
    UpdatedAt,
}
