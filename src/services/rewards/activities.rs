use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::entities::activity;
use crate::errors::ServiceError;

#[derive(Clone)]
pub struct ActivityService {
    db: Arc<DatabaseConnection>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateActivityInput {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(range(min = 1))]
    pub ucoin_reward: i32,
    #[validate(length(max = 400))]
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateActivityInput {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(range(min = 1))]
    pub ucoin_reward: Option<i32>,
    #[validate(length(max = 400))]
    pub description: Option<String>,
}

impl ActivityService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<activity::Model>, ServiceError> {
        Ok(activity::Entity::find()
            .order_by_asc(activity::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<activity::Model, ServiceError> {
        activity::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Activity {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: CreateActivityInput) -> Result<activity::Model, ServiceError> {
        input.validate()?;

        let now = Utc::now();
        let record = activity::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            ucoin_reward: Set(input.ucoin_reward),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(record.insert(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateActivityInput,
    ) -> Result<activity::Model, ServiceError> {
        input.validate()?;

        let existing = self.get(id).await?;
        let mut active: activity::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(reward) = input.ucoin_reward {
            active.ucoin_reward = Set(reward);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        active.updated_at = Set(Utc::now());
        Ok(active.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;
        activity::Entity::delete_by_id(existing.id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }
}
