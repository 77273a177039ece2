pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users_table;
mod m20250601_000002_create_user_profiles_table;
mod m20250601_000003_create_refresh_tokens_table;
mod m20250601_000004_create_activities_table;
mod m20250601_000005_create_coin_requests_table;
mod m20250601_000006_create_balance_history_table;
mod m20250601_000007_create_presents_table;
mod m20250601_000008_create_categories_table;
mod m20250601_000009_create_products_table;
mod m20250601_000010_create_sizes_table;
mod m20250601_000011_create_product_items_table;
mod m20250601_000012_create_product_item_sizes_table;
mod m20250601_000013_create_cart_items_table;
mod m20250601_000014_create_orders_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users_table::Migration),
            Box::new(m20250601_000002_create_user_profiles_table::Migration),
            Box::new(m20250601_000003_create_refresh_tokens_table::Migration),
            Box::new(m20250601_000004_create_activities_table::Migration),
            Box::new(m20250601_000005_create_coin_requests_table::Migration),
            Box::new(m20250601_000006_create_balance_history_table::Migration),
            Box::new(m20250601_000007_create_presents_table::Migration),
            Box::new(m20250601_000008_create_categories_table::Migration),
            Box::new(m20250601_000009_create_products_table::Migration),
            Box::new(m20250601_000010_create_sizes_table::Migration),
            Box::new(m20250601_000011_create_product_items_table::Migration),
            Box::new(m20250601_000012_create_product_item_sizes_table::Migration),
            Box::new(m20250601_000013_create_cart_items_table::Migration),
            Box::new(m20250601_000014_create_orders_table::Migration),
        ]
    }
}
