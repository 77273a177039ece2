use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::balance_history::{self, LedgerAction, LedgerCategory};
use crate::entities::user_profile;
use crate::errors::ServiceError;

/// Balance bookkeeping shared by the coin request, present and checkout
/// workflows. All mutating helpers take a transaction handle so a caller
/// can group the balance change with its own writes.
#[derive(Clone)]
pub struct LedgerService;

impl LedgerService {
    /// Apply a signed delta to a user's balance. Fails without writing if
    /// the result would go negative.
    pub async fn adjust_balance<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        delta: i32,
    ) -> Result<i32, ServiceError> {
        let profile = user_profile::Entity::find_by_id(user_id)
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User profile {} not found", user_id)))?;

        let new_balance = profile.balance + delta;
        if new_balance < 0 {
            return Err(ServiceError::InsufficientBalance(format!(
                "balance {} cannot cover {}",
                profile.balance, -delta
            )));
        }

        let mut active: user_profile::ActiveModel = profile.into();
        active.balance = Set(new_balance);
        active.update(conn).await?;

        Ok(new_balance)
    }

    /// Append one ledger row. The ledger is append-only; rows are never
    /// updated or deleted.
    pub async fn record<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        action: LedgerAction,
        category: LedgerCategory,
        category_id: Uuid,
        amount: i32,
    ) -> Result<balance_history::Model, ServiceError> {
        let entry = balance_history::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            action: Set(action),
            category: Set(category),
            category_id: Set(category_id),
            amount: Set(amount),
            created_at: Set(Utc::now()),
        };
        Ok(entry.insert(conn).await?)
    }

    /// Balance history for a user, newest first. `limit` of `None` means all.
    pub async fn history_for_user<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<balance_history::Model>, ServiceError> {
        let mut query = balance_history::Entity::find()
            .filter(balance_history::Column::UserId.eq(user_id))
            .order_by_desc(balance_history::Column::CreatedAt);
        if let Some(n) = limit {
            query = query.limit(n);
        }
        Ok(query.all(conn).await?)
    }
}
