use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::entities::balance_history::{LedgerAction, LedgerCategory};
use crate::entities::present::{self, PresentState};
use crate::entities::user;
use crate::entities::user_profile;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::rewards::ledger::LedgerService;

#[derive(Clone)]
pub struct PresentService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendPresentInput {
    pub recipient_id: Uuid,
    #[validate(length(min = 1, max = 500))]
    pub text: String,
    #[validate(length(min = 1, max = 100))]
    pub sign: String,
    #[validate(length(min = 1, max = 100))]
    pub background: String,
    #[validate(range(min = 1))]
    pub ucoin_amount: i32,
}

/// Present payload with the sender's display name resolved.
#[derive(Debug, Serialize)]
pub struct PresentInfo {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub sender_name: String,
    pub text: String,
    pub sign: String,
    pub ucoin_amount: i32,
    pub background: String,
    pub state: PresentState,
    pub created_at: DateTime<Utc>,
}

impl PresentService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Send a gift. The whole exchange is one transaction: validation,
    /// sender debit, recipient credit, the present row and both ledger
    /// rows either all land or none do.
    #[instrument(skip(self))]
    pub async fn send(
        &self,
        sender_id: Uuid,
        input: SendPresentInput,
    ) -> Result<present::Model, ServiceError> {
        input.validate()?;

        if input.recipient_id == sender_id {
            return Err(ServiceError::InvalidOperation(
                "Cannot send a present to yourself".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        user::Entity::find_by_id(input.recipient_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Recipient {} not found", input.recipient_id))
            })?;

        let present_id = Uuid::new_v4();
        let amount = input.ucoin_amount;

        // Debit fails on insufficient balance before anything is written.
        LedgerService::adjust_balance(&txn, sender_id, -amount).await?;
        LedgerService::adjust_balance(&txn, input.recipient_id, amount).await?;

        let record = present::ActiveModel {
            id: Set(present_id),
            recipient_id: Set(input.recipient_id),
            sender_id: Set(sender_id),
            text: Set(input.text),
            sign: Set(input.sign),
            background: Set(input.background),
            ucoin_amount: Set(amount),
            state: Set(PresentState::Sent),
            created_at: Set(Utc::now()),
        };
        let created = record.insert(&txn).await?;

        LedgerService::record(
            &txn,
            sender_id,
            LedgerAction::Expense,
            LedgerCategory::Present,
            present_id,
            amount,
        )
        .await?;
        LedgerService::record(
            &txn,
            input.recipient_id,
            LedgerAction::Add,
            LedgerCategory::Present,
            present_id,
            amount,
        )
        .await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::PresentSent {
                present_id,
                sender_id,
                recipient_id: created.recipient_id,
                amount,
            })
            .await;

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn unread_count(&self, recipient_id: Uuid) -> Result<u64, ServiceError> {
        Ok(present::Entity::find()
            .filter(present::Column::RecipientId.eq(recipient_id))
            .filter(present::Column::State.eq(PresentState::Sent))
            .count(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn list_unread(&self, recipient_id: Uuid) -> Result<Vec<PresentInfo>, ServiceError> {
        let rows = present::Entity::find()
            .filter(present::Column::RecipientId.eq(recipient_id))
            .filter(present::Column::State.eq(PresentState::Sent))
            .order_by_desc(present::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        self.with_sender_names(rows).await
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self, recipient_id: Uuid) -> Result<Vec<PresentInfo>, ServiceError> {
        let rows = present::Entity::find()
            .filter(present::Column::RecipientId.eq(recipient_id))
            .order_by_desc(present::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        self.with_sender_names(rows).await
    }

    /// A present is only visible to its recipient.
    #[instrument(skip(self))]
    pub async fn get(&self, recipient_id: Uuid, present_id: Uuid) -> Result<PresentInfo, ServiceError> {
        let row = self.owned_present(recipient_id, present_id).await?;
        let mut infos = self.with_sender_names(vec![row]).await?;
        Ok(infos.remove(0))
    }

    /// Flip Sent -> Read. Reading an already-read present is a no-op.
    #[instrument(skip(self))]
    pub async fn mark_read(&self, recipient_id: Uuid, present_id: Uuid) -> Result<(), ServiceError> {
        let row = self.owned_present(recipient_id, present_id).await?;
        if row.state == PresentState::Read {
            return Ok(());
        }

        let mut active: present::ActiveModel = row.into();
        active.state = Set(PresentState::Read);
        active.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::PresentRead(present_id))
            .await;
        Ok(())
    }

    async fn owned_present(
        &self,
        recipient_id: Uuid,
        present_id: Uuid,
    ) -> Result<present::Model, ServiceError> {
        present::Entity::find_by_id(present_id)
            .filter(present::Column::RecipientId.eq(recipient_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Present {} not found", present_id)))
    }

    async fn with_sender_names(
        &self,
        rows: Vec<present::Model>,
    ) -> Result<Vec<PresentInfo>, ServiceError> {
        let mut infos = Vec::with_capacity(rows.len());
        for row in rows {
            // The sender reference is loose; a deleted account shows as an
            // empty name rather than failing the listing.
            let sender_name = user_profile::Entity::find_by_id(row.sender_id)
                .one(&*self.db)
                .await?
                .map(|p| p.full_name())
                .unwrap_or_default();

            infos.push(PresentInfo {
                id: row.id,
                sender_id: row.sender_id,
                sender_name,
                text: row.text,
                sign: row.sign,
                ucoin_amount: row.ucoin_amount,
                background: row.background,
                state: row.state,
                created_at: row.created_at,
            });
        }
        Ok(infos)
    }
}
