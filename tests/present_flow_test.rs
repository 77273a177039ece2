mod common;

use common::TestApp;
use ucoin_store_api::entities::present::PresentState;
use ucoin_store_api::errors::ServiceError;
use ucoin_store_api::services::rewards::presents::SendPresentInput;
use ucoin_store_api::services::rewards::LedgerService;

fn present_input(recipient: uuid::Uuid, amount: i32) -> SendPresentInput {
    SendPresentInput {
        recipient_id: recipient,
        text: "Thanks for the help!".to_string(),
        sign: "Ivan".to_string(),
        background: "confetti".to_string(),
        ucoin_amount: amount,
    }
}

#[tokio::test]
async fn sending_a_present_moves_coins_between_users() {
    let app = TestApp::new().await;
    let sender = app.create_user("Ivan", "Petrov", 100).await;
    let recipient = app.create_user("Anna", "Sidorova", 5).await;

    let present = app
        .services
        .presents
        .send(sender.user_id, present_input(recipient.user_id, 30))
        .await
        .unwrap();
    assert_eq!(present.state, PresentState::Sent);

    assert_eq!(app.balance_of(sender.user_id).await, 70);
    assert_eq!(app.balance_of(recipient.user_id).await, 35);

    // Both sides of the transfer are in the ledger.
    let sender_history = LedgerService::history_for_user(&*app.db, sender.user_id, None)
        .await
        .unwrap();
    let recipient_history = LedgerService::history_for_user(&*app.db, recipient.user_id, None)
        .await
        .unwrap();
    assert_eq!(sender_history.len(), 1);
    assert_eq!(recipient_history.len(), 1);
    assert_eq!(sender_history[0].category_id, present.id);
    assert_eq!(recipient_history[0].category_id, present.id);
}

#[tokio::test]
async fn unread_tracking_and_idempotent_reads() {
    let app = TestApp::new().await;
    let sender = app.create_user("Ivan", "Petrov", 50).await;
    let recipient = app.create_user("Petr", "Ivanov", 0).await;

    let present = app
        .services
        .presents
        .send(sender.user_id, present_input(recipient.user_id, 10))
        .await
        .unwrap();

    assert_eq!(
        app.services.presents.unread_count(recipient.user_id).await.unwrap(),
        1
    );

    app.services
        .presents
        .mark_read(recipient.user_id, present.id)
        .await
        .unwrap();
    assert_eq!(
        app.services.presents.unread_count(recipient.user_id).await.unwrap(),
        0
    );

    // Reading twice is fine.
    app.services
        .presents
        .mark_read(recipient.user_id, present.id)
        .await
        .unwrap();

    // The sender's name is resolved for display.
    let all = app.services.presents.list_all(recipient.user_id).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].sender_name, "Ivan Petrov");
}

#[tokio::test]
async fn a_present_is_invisible_to_non_recipients() {
    let app = TestApp::new().await;
    let sender = app.create_user("Ivan", "Petrov", 50).await;
    let recipient = app.create_user("Anna", "Sidorova", 0).await;
    let outsider = app.create_user("Olga", "Smirnova", 0).await;

    let present = app
        .services
        .presents
        .send(sender.user_id, present_input(recipient.user_id, 0))
        .await
        .unwrap();

    assert!(matches!(
        app.services.presents.get(outsider.user_id, present.id).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn insufficient_balance_aborts_the_whole_exchange() {
    let app = TestApp::new().await;
    let sender = app.create_user("Ivan", "Petrov", 10).await;
    let recipient = app.create_user("Anna", "Sidorova", 0).await;

    let result = app
        .services
        .presents
        .send(sender.user_id, present_input(recipient.user_id, 30))
        .await;
    assert!(matches!(result, Err(ServiceError::InsufficientBalance(_))));

    // Nothing moved and nothing was delivered.
    assert_eq!(app.balance_of(sender.user_id).await, 10);
    assert_eq!(app.balance_of(recipient.user_id).await, 0);
    assert_eq!(
        app.services.presents.unread_count(recipient.user_id).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn self_gifting_is_not_allowed() {
    let app = TestApp::new().await;
    let user = app.create_user("Ivan", "Petrov", 100).await;

    let result = app
        .services
        .presents
        .send(user.user_id, present_input(user.user_id, 10))
        .await;
    assert!(matches!(result, Err(ServiceError::InvalidOperation(_))));
    assert_eq!(app.balance_of(user.user_id).await, 100);
}

#[tokio::test]
async fn a_present_must_carry_at_least_one_coin() {
    let app = TestApp::new().await;
    let sender = app.create_user("Ivan", "Petrov", 100).await;
    let recipient = app.create_user("Anna", "Sidorova", 0).await;

    let result = app
        .services
        .presents
        .send(sender.user_id, present_input(recipient.user_id, 0))
        .await;
    assert!(matches!(result, Err(ServiceError::ValidationError(_))));

    // Nothing was written: no present, no ledger rows, balances intact.
    assert_eq!(app.services.presents.unread_count(recipient.user_id).await.unwrap(), 0);
    assert!(
        LedgerService::history_for_user(&*app.db, recipient.user_id, None)
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(app.balance_of(sender.user_id).await, 100);
}
