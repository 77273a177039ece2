use sea_orm_migration::prelude::*;

/// Size labels offered by the store, in display order.
const SIZE_LABELS: &[&str] = &["No size", "XS", "S", "M", "L", "XL", "XXL", "XXXL"];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sizes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sizes::Id).uuid().primary_key().not_null())
                    .col(
                        ColumnDef::new(Sizes::Label)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // The label set is fixed; seed it here so fresh databases are
        // immediately usable.
        let mut insert = Query::insert()
            .into_table(Sizes::Table)
            .columns([Sizes::Id, Sizes::Label])
            .to_owned();
        for label in SIZE_LABELS {
            insert.values_panic([uuid::Uuid::new_v4().into(), (*label).into()]);
        }
        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sizes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Sizes {
    Table,
    Id,
    Label,
}
