use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Events emitted by the services after state changes commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Account events
    UserRegistered(Uuid),
    UserDeactivated(Uuid),
    BalanceChanged {
        user_id: Uuid,
        delta: i32,
        new_balance: i32,
    },

    // Coin request events
    CoinRequestCreated(Uuid),
    CoinRequestAccepted {
        request_id: Uuid,
        user_id: Uuid,
        amount: i32,
    },
    CoinRequestRejected(Uuid),

    // Present events
    PresentSent {
        present_id: Uuid,
        sender_id: Uuid,
        recipient_id: Uuid,
        amount: i32,
    },
    PresentRead(Uuid),

    // Store events
    ProductCreated(Uuid),
    ProductStateChanged {
        product_id: Uuid,
        new_state: String,
    },
    OrderPlaced {
        order_id: Uuid,
        user_id: Uuid,
        total_price: i32,
    },
    OrderStateChanged {
        order_id: Uuid,
        new_state: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing the caller. Events are
    /// best-effort notifications; a full channel must never abort a commit.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event.clone()).await {
            warn!("Dropping event {:?}: {}", event, e);
        }
    }
}

/// Consumes events off the channel and logs them. Runs for the lifetime of
/// the server; exits when every sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::BalanceChanged {
                user_id,
                delta,
                new_balance,
            } => {
                info!(
                    %user_id,
                    delta,
                    new_balance,
                    "balance changed"
                );
            }
            Event::CoinRequestAccepted {
                request_id,
                user_id,
                amount,
            } => {
                info!(%request_id, %user_id, amount, "coin request accepted");
            }
            Event::PresentSent {
                present_id,
                sender_id,
                recipient_id,
                amount,
            } => {
                info!(%present_id, %sender_id, %recipient_id, amount, "present sent");
            }
            Event::OrderPlaced {
                order_id,
                user_id,
                total_price,
            } => {
                info!(%order_id, %user_id, total_price, "order placed");
            }
            other => {
                info!("Received event: {:?}", other);
            }
        }
    }

    error!("Event channel closed; processing loop exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_event() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);
        sender.send(Event::UserRegistered(Uuid::new_v4())).await.unwrap();
        assert!(matches!(rx.recv().await, Some(Event::UserRegistered(_))));
    }

    #[tokio::test]
    async fn send_or_log_swallows_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        // Must not panic or error out.
        sender.send_or_log(Event::PresentRead(Uuid::new_v4())).await;
    }
}
