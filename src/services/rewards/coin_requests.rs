use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::entities::activity;
use crate::entities::balance_history::{LedgerAction, LedgerCategory};
use crate::entities::coin_request::{self, CoinRequestState};
use crate::entities::user_profile;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::rewards::ledger::LedgerService;

#[derive(Clone)]
pub struct CoinRequestService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCoinRequestInput {
    pub activity_id: Uuid,
    #[validate(length(min = 1, max = 250))]
    pub comment: String,
}

/// Row shown in the requester's personal history.
#[derive(Debug, Serialize)]
pub struct CoinRequestSummary {
    pub request_id: Uuid,
    pub ucoin_reward: i32,
    pub date: DateTime<Utc>,
    pub state: CoinRequestState,
}

/// Row shown in the moderation queue.
#[derive(Debug, Serialize)]
pub struct PendingCoinRequest {
    pub request_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub comment: String,
    pub activity_id: Uuid,
    pub activity_name: String,
    pub ucoin_reward: i32,
    pub created_at: DateTime<Utc>,
}

impl CoinRequestService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn create(
        &self,
        user_id: Uuid,
        input: CreateCoinRequestInput,
    ) -> Result<coin_request::Model, ServiceError> {
        input.validate()?;

        // Reject claims against unknown activities up front.
        activity::Entity::find_by_id(input.activity_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Activity {} not found", input.activity_id))
            })?;

        let record = coin_request::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            activity_id: Set(input.activity_id),
            comment: Set(input.comment),
            state: Set(CoinRequestState::InProgress),
            rejected_comment: Set(String::new()),
            created_at: Set(Utc::now()),
        };
        let created = record.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::CoinRequestCreated(created.id))
            .await;
        Ok(created)
    }

    /// A user's own requests, newest first. `limit` of `None` means all.
    #[instrument(skip(self))]
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<CoinRequestSummary>, ServiceError> {
        let mut query = coin_request::Entity::find()
            .filter(coin_request::Column::UserId.eq(user_id))
            .order_by_desc(coin_request::Column::CreatedAt);
        if let Some(n) = limit {
            query = query.limit(n);
        }
        let rows = query
            .find_also_related(activity::Entity)
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(request, activity)| CoinRequestSummary {
                request_id: request.id,
                ucoin_reward: activity.map(|a| a.ucoin_reward).unwrap_or(0),
                date: request.created_at,
                state: request.state,
            })
            .collect())
    }

    /// The moderation queue: every request still in progress.
    #[instrument(skip(self))]
    pub async fn list_pending(&self) -> Result<Vec<PendingCoinRequest>, ServiceError> {
        let rows = coin_request::Entity::find()
            .filter(coin_request::Column::State.eq(CoinRequestState::InProgress))
            .order_by_desc(coin_request::Column::CreatedAt)
            .find_also_related(activity::Entity)
            .all(&*self.db)
            .await?;

        let mut pending = Vec::with_capacity(rows.len());
        for (request, activity) in rows {
            let activity = activity.ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "Coin request {} references missing activity",
                    request.id
                ))
            })?;
            let profile = user_profile::Entity::find_by_id(request.user_id)
                .one(&*self.db)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("User profile {} not found", request.user_id))
                })?;

            pending.push(PendingCoinRequest {
                request_id: request.id,
                user_id: request.user_id,
                user_name: profile.full_name(),
                comment: request.comment,
                activity_id: activity.id,
                activity_name: activity.name,
                ucoin_reward: activity.ucoin_reward,
                created_at: request.created_at,
            });
        }
        Ok(pending)
    }

    /// Approve a request: credit the requester by the activity's reward,
    /// flip the state and append the ledger row, all in one transaction.
    /// Only an in-progress request can be approved.
    #[instrument(skip(self))]
    pub async fn accept(&self, request_id: Uuid) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let request = coin_request::Entity::find_by_id(request_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Request {} not found", request_id)))?;

        if request.state != CoinRequestState::InProgress {
            return Err(ServiceError::Conflict(format!(
                "Request {} has already been processed",
                request_id
            )));
        }

        let activity = activity::Entity::find_by_id(request.activity_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Activity {} not found", request.activity_id))
            })?;

        let user_id = request.user_id;
        let reward = activity.ucoin_reward;

        LedgerService::adjust_balance(&txn, user_id, reward).await?;
        LedgerService::record(
            &txn,
            user_id,
            LedgerAction::Add,
            LedgerCategory::Request,
            request_id,
            reward,
        )
        .await?;

        let mut active: coin_request::ActiveModel = request.into();
        active.state = Set(CoinRequestState::Accepted);
        active.update(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::CoinRequestAccepted {
                request_id,
                user_id,
                amount: reward,
            })
            .await;
        Ok(())
    }

    /// Reject a request with a comment. No balance change. Only an
    /// in-progress request can be rejected.
    #[instrument(skip(self))]
    pub async fn reject(&self, request_id: Uuid, comment: String) -> Result<(), ServiceError> {
        let request = coin_request::Entity::find_by_id(request_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Request {} not found", request_id)))?;

        if request.state != CoinRequestState::InProgress {
            return Err(ServiceError::Conflict(format!(
                "Request {} has already been processed",
                request_id
            )));
        }

        let mut active: coin_request::ActiveModel = request.into();
        active.state = Set(CoinRequestState::Rejected);
        active.rejected_comment = Set(comment);
        active.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::CoinRequestRejected(request_id))
            .await;
        Ok(())
    }
}
