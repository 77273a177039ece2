//! Store entities: categories, products, color variants, sizes, carts, orders.

pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod product_item;
pub mod product_item_size;
pub mod size;

pub use cart::Entity as Cart;
pub use category::Entity as Category;
pub use order::Entity as Order;
pub use product::Entity as Product;
pub use product_item::Entity as ProductItem;
pub use product_item_size::Entity as ProductItemSize;
pub use size::Entity as Size;

pub use cart::Model as CartModel;
pub use category::Model as CategoryModel;
pub use order::Model as OrderModel;
pub use product::Model as ProductModel;
pub use product_item::Model as ProductItemModel;
pub use size::Model as SizeModel;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Two-valued lifecycle shared by categories and products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "archived")]
    Archived,
}
