use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Platform user account. Display fields and the ucoin balance live on the
/// one-to-one [`super::user_profile`] row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[serde(skip_serializing)]
    #[sea_orm(column_type = "Text")]
    pub password_hash: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::user_profile::Entity")]
    Profile,
    #[sea_orm(has_many = "super::coin_request::Entity")]
    CoinRequests,
    #[sea_orm(has_many = "super::balance_history::Entity")]
    BalanceHistory,
    #[sea_orm(has_many = "super::present::Entity")]
    Presents,
    #[sea_orm(has_many = "super::commerce::cart::Entity")]
    CartRows,
    #[sea_orm(has_many = "super::commerce::order::Entity")]
    Orders,
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::coin_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CoinRequests.def()
    }
}

impl Related<super::balance_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BalanceHistory.def()
    }
}

impl Related<super::present::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Presents.def()
    }
}

impl Related<super::commerce::cart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartRows.def()
    }
}

impl Related<super::commerce::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
