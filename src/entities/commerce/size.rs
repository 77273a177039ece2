use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shared lookup table of size labels ("No size", "XS" .. "XXXL").
/// Seeded by the migrations; items reference rows here, never free text.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sizes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub label: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_item_size::Entity")]
    ItemSizes,
    #[sea_orm(has_many = "super::cart::Entity")]
    CartRows,
}

impl Related<super::product_item_size::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemSizes.def()
    }
}

impl Related<super::product_item::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_item_size::Relation::Item.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::product_item_size::Relation::Size.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Label attached to one-size items; mutually exclusive with real sizes.
pub const NO_SIZE_LABEL: &str = "No size";

/// Display order for size labels on the product page.
pub const SIZE_ORDER: &[&str] = &[NO_SIZE_LABEL, "XS", "S", "M", "L", "XL", "XXL", "XXXL"];

/// Position of a label in [`SIZE_ORDER`]; unknown labels sort last.
pub fn size_rank(label: &str) -> usize {
    SIZE_ORDER
        .iter()
        .position(|known| *known == label)
        .unwrap_or(SIZE_ORDER.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_rank_orders_no_size_first() {
        assert!(size_rank("No size") < size_rank("XS"));
        assert!(size_rank("XS") < size_rank("XXXL"));
        assert_eq!(size_rank("44-46"), SIZE_ORDER.len());
    }
}
