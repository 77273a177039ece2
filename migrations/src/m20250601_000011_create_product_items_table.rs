use sea_orm_migration::prelude::*;

use crate::m20250601_000009_create_products_table::Products;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductItems::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProductItems::ProductId).uuid().not_null())
                    .col(ColumnDef::new(ProductItems::Color).string().not_null())
                    .col(ColumnDef::new(ProductItems::PhotoPath).string().not_null())
                    .col(
                        ColumnDef::new(ProductItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_items_product")
                            .from(ProductItems::Table, ProductItems::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One color per product.
        manager
            .create_index(
                Index::create()
                    .name("idx_product_items_product_color")
                    .table(ProductItems::Table)
                    .col(ProductItems::ProductId)
                    .col(ProductItems::Color)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ProductItems {
    Table,
    Id,
    ProductId,
    Color,
    PhotoPath,
    CreatedAt,
}
