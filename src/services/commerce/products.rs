use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::entities::commerce::{
    cart, product, product_item, product_item_size, size, LifecycleState,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::storage::StorageService;

#[derive(Clone)]
pub struct ProductService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
    storage: StorageService,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductInput {
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[validate(length(min = 1, max = 25))]
    pub name: String,
    #[validate(range(min = 0))]
    pub price: i32,
    #[validate(length(max = 400))]
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProductInput {
    pub new_category: Option<Uuid>,
    #[validate(length(min = 1, max = 25))]
    pub new_name: Option<String>,
    #[validate(length(max = 400))]
    pub new_description: Option<String>,
    #[validate(range(min = 0))]
    pub new_price: Option<i32>,
    #[serde(skip)]
    pub new_photo_path: Option<String>,
}

/// Result of a lifecycle toggle: a repeat of the current state is reported,
/// not silently applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateChange {
    Changed,
    Already,
}

/// Store-front card.
#[derive(Debug, Serialize)]
pub struct StoreProduct {
    pub product_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub price: i32,
    pub photo: String,
}

/// Admin product list row.
#[derive(Debug, Serialize)]
pub struct AdminProduct {
    pub product_id: Uuid,
    pub name: String,
    pub photo: String,
    pub state: LifecycleState,
    pub description: String,
    pub price: i32,
}

/// Product page payload: the product, its purchasable variants and the
/// ordered union of available size labels.
#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub product_info: ProductInfo,
    pub product_items: Vec<ProductPageItem>,
    pub size_list: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductInfo {
    pub product_name: String,
    pub product_price: i32,
    pub product_description: String,
}

#[derive(Debug, Serialize)]
pub struct ProductPageItem {
    pub id: Uuid,
    pub color: String,
    /// Size label -> quantity already in the viewer's cart, if any.
    pub sizes: BTreeMap<String, Option<i32>>,
    pub item_photo: String,
}

impl ProductService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: Arc<EventSender>,
        storage: StorageService,
    ) -> Self {
        Self {
            db,
            event_sender,
            storage,
        }
    }

    /// Store front: active products that have at least one variant with at
    /// least one size, since anything else cannot be added to a cart.
    #[instrument(skip(self))]
    pub async fn list_store(&self) -> Result<Vec<StoreProduct>, ServiceError> {
        let products = product::Entity::find()
            .filter(product::Column::State.eq(LifecycleState::Active))
            .order_by_asc(product::Column::Name)
            .all(&*self.db)
            .await?;

        let mut cards = Vec::with_capacity(products.len());
        for p in products {
            if self.has_purchasable_item(p.id).await? {
                cards.push(StoreProduct {
                    product_id: p.id,
                    category_id: p.category_id,
                    name: p.name,
                    price: p.price,
                    photo: p.photo_path,
                });
            }
        }
        Ok(cards)
    }

    #[instrument(skip(self))]
    pub async fn list_admin(&self) -> Result<Vec<AdminProduct>, ServiceError> {
        let products = product::Entity::find()
            .order_by_asc(product::Column::State)
            .order_by_asc(product::Column::Name)
            .all(&*self.db)
            .await?;

        Ok(products
            .into_iter()
            .map(|p| AdminProduct {
                product_id: p.id,
                name: p.name,
                photo: p.photo_path,
                state: p.state,
                description: p.description,
                price: p.price,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<product::Model, ServiceError> {
        product::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))
    }

    #[instrument(skip(self, photo_path))]
    pub async fn create(
        &self,
        input: CreateProductInput,
        photo_path: String,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;

        let now = Utc::now();
        let record = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            category_id: Set(input.category_id),
            name: Set(input.name),
            price: Set(input.price),
            description: Set(input.description),
            photo_path: Set(photo_path),
            state: Set(LifecycleState::Active),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = record.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::ProductCreated(created.id))
            .await;
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateProductInput,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;

        let existing = self.get(id).await?;
        let old_photo = existing.photo_path.clone();
        let mut active: product::ActiveModel = existing.into();

        if let Some(category) = input.new_category {
            active.category_id = Set(Some(category));
        }
        if let Some(name) = input.new_name {
            active.name = Set(name);
        }
        if let Some(description) = input.new_description {
            active.description = Set(description);
        }
        if let Some(price) = input.new_price {
            active.price = Set(price);
        }
        let replaced_photo = if let Some(photo) = input.new_photo_path {
            active.photo_path = Set(photo);
            true
        } else {
            false
        };
        active.updated_at = Set(Utc::now());
        let updated = active.update(&*self.db).await?;

        if replaced_photo {
            self.storage.delete(&old_photo).await;
        }
        Ok(updated)
    }

    /// Idempotent lifecycle toggle: setting the state a product already has
    /// reports `Already` and writes nothing.
    #[instrument(skip(self))]
    pub async fn change_state(
        &self,
        id: Uuid,
        new_state: LifecycleState,
    ) -> Result<StateChange, ServiceError> {
        let existing = self.get(id).await?;
        if existing.state == new_state {
            return Ok(StateChange::Already);
        }

        let mut active: product::ActiveModel = existing.into();
        active.state = Set(new_state);
        active.updated_at = Set(Utc::now());
        active.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::ProductStateChanged {
                product_id: id,
                new_state: match new_state {
                    LifecycleState::Active => "active".to_string(),
                    LifecycleState::Archived => "archived".to_string(),
                },
            })
            .await;
        Ok(StateChange::Changed)
    }

    /// Delete a product along with its photo and its variants' photos.
    /// File cleanup runs before the row deletes and is best-effort.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;

        let items = product_item::Entity::find()
            .filter(product_item::Column::ProductId.eq(id))
            .all(&*self.db)
            .await?;
        for item in &items {
            self.storage.delete(&item.photo_path).await;
        }
        self.storage.delete(&existing.photo_path).await;

        product::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(())
    }

    /// Product page for the store, with the viewer's cart quantities
    /// resolved per variant/size.
    #[instrument(skip(self))]
    pub async fn product_page(
        &self,
        viewer_id: Uuid,
        product_id: Uuid,
    ) -> Result<ProductPage, ServiceError> {
        let product = self.get(product_id).await?;

        let items = product_item::Entity::find()
            .filter(product_item::Column::ProductId.eq(product_id))
            .all(&*self.db)
            .await?;

        let mut page_items = Vec::new();
        let mut all_labels: Vec<String> = Vec::new();

        for item in items {
            let sizes = self.sizes_of_item(item.id).await?;
            if sizes.is_empty() {
                continue;
            }

            let mut size_map = BTreeMap::new();
            for s in &sizes {
                let in_cart = cart::Entity::find()
                    .filter(cart::Column::UserId.eq(viewer_id))
                    .filter(cart::Column::ItemId.eq(item.id))
                    .filter(cart::Column::SizeId.eq(s.id))
                    .one(&*self.db)
                    .await?;
                size_map.insert(s.label.clone(), in_cart.map(|row| row.quantity));
                if !all_labels.contains(&s.label) {
                    all_labels.push(s.label.clone());
                }
            }

            page_items.push(ProductPageItem {
                id: item.id,
                color: item.color,
                sizes: size_map,
                item_photo: item.photo_path,
            });
        }

        all_labels.sort_by_key(|label| size::size_rank(label));

        Ok(ProductPage {
            product_info: ProductInfo {
                product_name: product.name,
                product_price: product.price,
                product_description: product.description,
            },
            product_items: page_items,
            size_list: all_labels,
        })
    }

    async fn has_purchasable_item(&self, product_id: Uuid) -> Result<bool, ServiceError> {
        let items = product_item::Entity::find()
            .filter(product_item::Column::ProductId.eq(product_id))
            .all(&*self.db)
            .await?;
        for item in items {
            let linked = product_item_size::Entity::find()
                .filter(product_item_size::Column::ItemId.eq(item.id))
                .one(&*self.db)
                .await?;
            if linked.is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn sizes_of_item(&self, item_id: Uuid) -> Result<Vec<size::Model>, ServiceError> {
        let links = product_item_size::Entity::find()
            .filter(product_item_size::Column::ItemId.eq(item_id))
            .all(&*self.db)
            .await?;
        let mut sizes = Vec::with_capacity(links.len());
        for link in links {
            if let Some(s) = size::Entity::find_by_id(link.size_id).one(&*self.db).await? {
                sizes.push(s);
            }
        }
        sizes.sort_by_key(|s| size::size_rank(&s.label));
        Ok(sizes)
    }
}
