use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::entities::commerce::order::{self, Office, OrderState};
use crate::entities::user_profile;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::commerce::carts::CartLine;

#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

/// Row on the user's personal page.
#[derive(Debug, Serialize)]
pub struct OrderSummary {
    pub order_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub full_price: i32,
    pub products_photo: Vec<String>,
    pub state: OrderState,
}

/// Row in the admin fulfilment queue.
#[derive(Debug, Serialize)]
pub struct PendingOrder {
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

/// Full order view for the admin detail page.
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub product_list: Vec<CartLine>,
    pub total_price: i32,
    pub office: Office,
    pub office_address: &'static str,
    pub state: OrderState,
    pub created_at: DateTime<Utc>,
}

impl OrderService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// A user's own orders, newest first. `limit` of `None` means all.
    #[instrument(skip(self))]
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<OrderSummary>, ServiceError> {
        let mut query = order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::CreatedAt);
        if let Some(n) = limit {
            query = query.limit(n);
        }
        let rows = query.all(&*self.db).await?;

        rows.into_iter()
            .map(|row| {
                let lines = parse_snapshot(&row)?;
                Ok(OrderSummary {
                    order_id: row.id,
                    created_at: row.created_at,
                    full_price: row.total_price,
                    products_photo: lines.iter().take(3).map(|l| l.photo.clone()).collect(),
                    state: row.state,
                })
            })
            .collect()
    }

    /// Orders still waiting for fulfilment.
    #[instrument(skip(self))]
    pub async fn list_pending(&self) -> Result<Vec<PendingOrder>, ServiceError> {
        let rows = order::Entity::find()
            .filter(order::Column::State.eq(OrderState::InProgress))
            .order_by_asc(order::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let mut pending = Vec::with_capacity(rows.len());
        for row in rows {
            let user_name = user_profile::Entity::find_by_id(row.user_id)
                .one(&*self.db)
                .await?
                .map(|p| p.full_name())
                .unwrap_or_default();
            pending.push(PendingOrder {
                order_id: row.id,
                user_id: row.user_id,
                user_name,
                created_at: row.created_at,
            });
        }
        Ok(pending)
    }

    #[instrument(skip(self))]
    pub async fn detail(&self, order_id: Uuid) -> Result<OrderDetail, ServiceError> {
        let row = self.find(order_id).await?;
        let user_name = user_profile::Entity::find_by_id(row.user_id)
            .one(&*self.db)
            .await?
            .map(|p| p.full_name())
            .unwrap_or_default();
        let product_list = parse_snapshot(&row)?;

        Ok(OrderDetail {
            order_id: row.id,
            user_id: row.user_id,
            user_name,
            product_list,
            total_price: row.total_price,
            office: row.office,
            office_address: row.office.address(),
            state: row.state,
            created_at: row.created_at,
        })
    }

    /// The only state transition an order supports after checkout. A second
    /// completion attempt is a conflict, not a silent overwrite.
    #[instrument(skip(self))]
    pub async fn complete(&self, order_id: Uuid) -> Result<(), ServiceError> {
        let row = self.find(order_id).await?;

        if row.state == OrderState::Completed {
            return Err(ServiceError::Conflict(format!(
                "Order {} is already completed",
                order_id
            )));
        }

        let mut active: order::ActiveModel = row.into();
        active.state = Set(OrderState::Completed);
        active.updated_at = Set(Utc::now());
        active.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::OrderStateChanged {
                order_id,
                new_state: "completed".to_string(),
            })
            .await;
        Ok(())
    }

    async fn find(&self, order_id: Uuid) -> Result<order::Model, ServiceError> {
        order::Entity::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))
    }
}

fn parse_snapshot(row: &order::Model) -> Result<Vec<CartLine>, ServiceError> {
    serde_json::from_slice(&row.products_list).map_err(|e| {
        ServiceError::SerializationError(format!("Order {} snapshot unreadable: {}", row.id, e))
    })
}
