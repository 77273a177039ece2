use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::entities::commerce::{cart, product, product_item, size};
use crate::errors::ServiceError;

/// One resolved cart row. Also the line-item shape frozen into an order
/// snapshot at checkout, so the fields must stay stable across releases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub cart_item_id: Uuid,
    pub product_id: Uuid,
    pub item_id: Uuid,
    pub name: String,
    pub price: i32,
    pub color: String,
    pub size: String,
    pub photo: String,
    pub count: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartAction {
    Add,
    Remove,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddToCartInput {
    pub item_id: Uuid,
    pub size: String,
    #[serde(default)]
    pub action: Option<CartAction>,
}

#[derive(Clone)]
pub struct CartService {
    db: Arc<DatabaseConnection>,
}

impl CartService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Resolve every cart row of a user into display line items. Takes any
    /// connection so checkout can run it inside its transaction.
    pub async fn lines_for_user<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
    ) -> Result<Vec<CartLine>, ServiceError> {
        let rows = cart::Entity::find()
            .filter(cart::Column::UserId.eq(user_id))
            .order_by_asc(cart::Column::CreatedAt)
            .all(conn)
            .await?;

        let mut lines = Vec::with_capacity(rows.len());
        for row in rows {
            let item = product_item::Entity::find_by_id(row.item_id)
                .one(conn)
                .await?
                .ok_or_else(|| {
                    ServiceError::InternalError(format!(
                        "Cart row {} references missing item",
                        row.id
                    ))
                })?;
            let product = product::Entity::find_by_id(item.product_id)
                .one(conn)
                .await?
                .ok_or_else(|| {
                    ServiceError::InternalError(format!(
                        "Item {} references missing product",
                        item.id
                    ))
                })?;
            let size = size::Entity::find_by_id(row.size_id)
                .one(conn)
                .await?
                .ok_or_else(|| {
                    ServiceError::InternalError(format!(
                        "Cart row {} references missing size",
                        row.id
                    ))
                })?;

            lines.push(CartLine {
                cart_item_id: row.id,
                product_id: product.id,
                item_id: item.id,
                name: product.name,
                price: product.price,
                color: item.color,
                size: size.label,
                photo: item.photo_path,
                count: row.quantity,
            });
        }
        Ok(lines)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<CartLine>, ServiceError> {
        Self::lines_for_user(&*self.db, user_id).await
    }

    /// Add an item/size pair to the cart. A fresh pair starts at quantity 1;
    /// an existing row is bumped by the supplied action instead of
    /// duplicated.
    #[instrument(skip(self))]
    pub async fn add(&self, user_id: Uuid, input: AddToCartInput) -> Result<(), ServiceError> {
        let item = product_item::Entity::find_by_id(input.item_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product item {} not found", input.item_id))
            })?;
        let size = self.size_by_label(&input.size).await?;

        let existing = cart::Entity::find()
            .filter(cart::Column::UserId.eq(user_id))
            .filter(cart::Column::ItemId.eq(item.id))
            .filter(cart::Column::SizeId.eq(size.id))
            .one(&*self.db)
            .await?;

        match existing {
            Some(row) => {
                if let Some(action) = input.action {
                    self.apply_count_change(row, action).await?;
                }
            }
            None => {
                let now = Utc::now();
                let record = cart::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    item_id: Set(item.id),
                    size_id: Set(size.id),
                    quantity: Set(1),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                record.insert(&*self.db).await?;
            }
        }
        Ok(())
    }

    /// Bump a cart row's quantity up or down. Going below one removes the
    /// row entirely.
    #[instrument(skip(self))]
    pub async fn change_count(
        &self,
        user_id: Uuid,
        cart_item_id: Uuid,
        action: CartAction,
    ) -> Result<(), ServiceError> {
        let row = self.owned_row(user_id, cart_item_id).await?;
        self.apply_count_change(row, action).await
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, user_id: Uuid, cart_item_id: Uuid) -> Result<(), ServiceError> {
        let row = self.owned_row(user_id, cart_item_id).await?;
        row.delete(&*self.db).await?;
        Ok(())
    }

    /// Remove by (item, size) pair, for clients that track the product page
    /// rather than cart row ids.
    #[instrument(skip(self))]
    pub async fn remove_by_item(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        size_label: &str,
    ) -> Result<(), ServiceError> {
        let size = self.size_by_label(size_label).await?;
        let row = cart::Entity::find()
            .filter(cart::Column::UserId.eq(user_id))
            .filter(cart::Column::ItemId.eq(item_id))
            .filter(cart::Column::SizeId.eq(size.id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Cart row not found".to_string()))?;
        row.delete(&*self.db).await?;
        Ok(())
    }

    async fn apply_count_change(
        &self,
        row: cart::Model,
        action: CartAction,
    ) -> Result<(), ServiceError> {
        let new_quantity = match action {
            CartAction::Add => row.quantity + 1,
            CartAction::Remove => row.quantity - 1,
        };

        if new_quantity < 1 {
            row.delete(&*self.db).await?;
            return Ok(());
        }

        let mut active: cart::ActiveModel = row.into();
        active.quantity = Set(new_quantity);
        active.updated_at = Set(Utc::now());
        active.update(&*self.db).await?;
        Ok(())
    }

    async fn owned_row(&self, user_id: Uuid, cart_item_id: Uuid) -> Result<cart::Model, ServiceError> {
        cart::Entity::find_by_id(cart_item_id)
            .filter(cart::Column::UserId.eq(user_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Cart row {} not found", cart_item_id)))
    }

    async fn size_by_label(&self, label: &str) -> Result<size::Model, ServiceError> {
        size::Entity::find()
            .filter(size::Column::Label.eq(label))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Size '{}' not found", label)))
    }
}
