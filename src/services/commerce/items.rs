use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::entities::commerce::size::{self, NO_SIZE_LABEL, SIZE_ORDER};
use crate::entities::commerce::{product, product_item, product_item_size};
use crate::errors::ServiceError;
use crate::services::storage::StorageService;

#[derive(Clone)]
pub struct ItemService {
    db: Arc<DatabaseConnection>,
    storage: StorageService,
}

/// Admin view of one variant: its sizes and which labels could still be
/// attached. A sizeless variant has no unused labels because it cannot mix
/// "No size" with real sizes.
#[derive(Debug, Serialize)]
pub struct AdminItem {
    pub item_id: Uuid,
    pub color: String,
    pub photo: String,
    pub sizes: Vec<String>,
    pub sizes_unused: Vec<String>,
}

impl ItemService {
    pub fn new(db: Arc<DatabaseConnection>, storage: StorageService) -> Self {
        Self { db, storage }
    }

    /// Create a variant of a product. `sized` chooses between a clothing-like
    /// variant (sizes attached later) and a one-size variant that gets the
    /// "No size" label immediately. A color may appear once per product.
    #[instrument(skip(self, photo_path))]
    pub async fn create(
        &self,
        product_id: Uuid,
        color: String,
        photo_path: String,
        sized: bool,
    ) -> Result<product_item::Model, ServiceError> {
        product::Entity::find_by_id(product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

        let duplicate = product_item::Entity::find()
            .filter(product_item::Column::ProductId.eq(product_id))
            .filter(product_item::Column::Color.eq(color.clone()))
            .one(&*self.db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Product already has an item in color '{}'",
                color
            )));
        }

        let record = product_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product_id),
            color: Set(color),
            photo_path: Set(photo_path),
            created_at: Set(Utc::now()),
        };
        let created = record.insert(&*self.db).await?;

        if !sized {
            self.attach_size(created.id, NO_SIZE_LABEL).await?;
        }
        Ok(created)
    }

    /// Attach a size label to a variant. Attaching a label the variant
    /// already has is a no-op.
    #[instrument(skip(self))]
    pub async fn add_size(&self, item_id: Uuid, label: &str) -> Result<(), ServiceError> {
        self.find(item_id).await?;
        self.attach_size(item_id, label).await
    }

    #[instrument(skip(self))]
    pub async fn remove_size(&self, item_id: Uuid, label: &str) -> Result<(), ServiceError> {
        let size = self.size_by_label(label).await?;
        let link = product_item_size::Entity::find()
            .filter(product_item_size::Column::ItemId.eq(item_id))
            .filter(product_item_size::Column::SizeId.eq(size.id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Item does not carry size '{}'", label))
            })?;
        link.delete(&*self.db).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, item_id: Uuid) -> Result<(), ServiceError> {
        let item = self.find(item_id).await?;
        self.storage.delete(&item.photo_path).await;
        product_item::Entity::delete_by_id(item_id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    /// All variants of a product with their size assignment, for the admin
    /// product editor.
    #[instrument(skip(self))]
    pub async fn list_for_product(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<AdminItem>, ServiceError> {
        let items = product_item::Entity::find()
            .filter(product_item::Column::ProductId.eq(product_id))
            .all(&*self.db)
            .await?;

        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let used = self.labels_of_item(item.id).await?;
            let unused = if used.iter().any(|l| l == NO_SIZE_LABEL) {
                Vec::new()
            } else {
                SIZE_ORDER
                    .iter()
                    .skip(1)
                    .filter(|label| !used.iter().any(|l| l == *label))
                    .map(|label| label.to_string())
                    .collect()
            };
            out.push(AdminItem {
                item_id: item.id,
                color: item.color,
                photo: item.photo_path,
                sizes: used,
                sizes_unused: unused,
            });
        }
        Ok(out)
    }

    async fn attach_size(&self, item_id: Uuid, label: &str) -> Result<(), ServiceError> {
        let size = self.size_by_label(label).await?;
        let existing = product_item_size::Entity::find()
            .filter(product_item_size::Column::ItemId.eq(item_id))
            .filter(product_item_size::Column::SizeId.eq(size.id))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        let link = product_item_size::ActiveModel {
            item_id: Set(item_id),
            size_id: Set(size.id),
        };
        link.insert(&*self.db).await?;
        Ok(())
    }

    async fn labels_of_item(&self, item_id: Uuid) -> Result<Vec<String>, ServiceError> {
        let links = product_item_size::Entity::find()
            .filter(product_item_size::Column::ItemId.eq(item_id))
            .all(&*self.db)
            .await?;
        let mut labels = Vec::with_capacity(links.len());
        for link in links {
            if let Some(s) = size::Entity::find_by_id(link.size_id).one(&*self.db).await? {
                labels.push(s.label);
            }
        }
        labels.sort_by_key(|label| size::size_rank(label));
        Ok(labels)
    }

    async fn find(&self, item_id: Uuid) -> Result<product_item::Model, ServiceError> {
        product_item::Entity::find_by_id(item_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {} not found", item_id)))
    }

    async fn size_by_label(&self, label: &str) -> Result<size::Model, ServiceError> {
        size::Entity::find()
            .filter(size::Column::Label.eq(label))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Size '{}' not found", label)))
    }
}
