use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A purchasable color variant of a product, split further by size via the
/// `product_item_sizes` join table. Unique per (product, color).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub color: String,
    pub photo_path: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(has_many = "super::product_item_size::Entity")]
    ItemSizes,
    #[sea_orm(has_many = "super::cart::Entity")]
    CartRows,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::product_item_size::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemSizes.def()
    }
}

impl Related<super::size::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_item_size::Relation::Size.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::product_item_size::Relation::Item.def().rev())
    }
}

impl Related<super::cart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartRows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
