use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// An activity employees can claim a fixed ucoin reward for.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[validate(length(min = 1, max = 50, message = "Activity name must be 1-50 characters"))]
    pub name: String,

    pub ucoin_reward: i32,

    #[validate(length(max = 400, message = "Description is limited to 400 characters"))]
    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::coin_request::Entity")]
    CoinRequests,
}

impl Related<super::coin_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CoinRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
