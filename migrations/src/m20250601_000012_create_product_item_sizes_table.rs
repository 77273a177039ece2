use sea_orm_migration::prelude::*;

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
                    .table(ProductItemSizes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProductItemSizes::ItemId).uuid().not_null())
                    .col(ColumnDef::new(ProductItemSizes::SizeId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(ProductItemSizes::ItemId)
                            .col(ProductItemSizes::SizeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_item_sizes_item")
                            .from(ProductItemSizes::Table, ProductItemSizes::ItemId)
                            .to(ProductItems::Table, ProductItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_item_sizes_size")
                            .from(ProductItemSizes::Table, ProductItemSizes::SizeId)
                            .to(Sizes::Table, Sizes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductItemSizes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ProductItemSizes {
    Table,
    ItemId,
    SizeId,
}
