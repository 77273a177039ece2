use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::entities::balance_history::{LedgerAction, LedgerCategory};
use crate::entities::commerce::cart;
use crate::entities::commerce::order::{self, Office, OrderState};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::commerce::carts::CartService;
use crate::services::rewards::ledger::LedgerService;

#[derive(Clone)]
pub struct CheckoutService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResult {
    pub order_id: Uuid,
    pub total_price: i32,
}

impl CheckoutService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Convert the user's cart into an order. One transaction covers the
    /// snapshot, the cart clear, the balance debit and the ledger row, so a
    /// crash can never leave a cleared cart without its order.
    ///
    /// The total is computed server-side from the cart rows read here; the
    /// client never supplies it.
    #[instrument(skip(self))]
    pub async fn checkout(
        &self,
        user_id: Uuid,
        office: Office,
    ) -> Result<CheckoutResult, ServiceError> {
        let txn = self.db.begin().await?;

        let lines = CartService::lines_for_user(&txn, user_id).await?;
        if lines.is_empty() {
            return Err(ServiceError::InvalidOperation(
                "Cart is empty".to_string(),
            ));
        }

        let total_price: i32 = lines.iter().map(|line| line.price * line.count).sum();

        // The snapshot freezes names, prices and photos as they are right
        // now; later product edits never touch past orders.
        let snapshot = serde_json::to_vec(&lines)?;

        LedgerService::adjust_balance(&txn, user_id, -total_price).await?;

        let order_id = Uuid::new_v4();
        let now = Utc::now();
        let record = order::ActiveModel {
            id: Set(order_id),
            user_id: Set(user_id),
            products_list: Set(snapshot),
            total_price: Set(total_price),
            office: Set(office),
            state: Set(OrderState::InProgress),
            created_at: Set(now),
            updated_at: Set(now),
        };
        record.insert(&txn).await?;

        cart::Entity::delete_many()
            .filter(cart::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;

        LedgerService::record(
            &txn,
            user_id,
            LedgerAction::Expense,
            LedgerCategory::Order,
            order_id,
            total_price,
        )
        .await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::OrderPlaced {
                order_id,
                user_id,
                total_price,
            })
            .await;

        Ok(CheckoutResult {
            order_id,
            total_price,
        })
    }
}
