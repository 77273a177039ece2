mod common;

use common::TestApp;
use ucoin_store_api::entities::balance_history::{LedgerAction, LedgerCategory};
use ucoin_store_api::entities::coin_request::CoinRequestState;
use ucoin_store_api::errors::ServiceError;
use ucoin_store_api::services::rewards::activities::CreateActivityInput;
use ucoin_store_api::services::rewards::coin_requests::CreateCoinRequestInput;
use ucoin_store_api::services::rewards::LedgerService;

#[tokio::test]
async fn accepting_a_request_credits_the_reward() {
    let app = TestApp::new().await;
    let user = app.create_user("Ivan", "Petrov", 0).await;

    let activity = app
        .services
        .activities
        .create(CreateActivityInput {
            name: "Conference talk".to_string(),
            ucoin_reward: 50,
            description: "Gave a talk at an internal meetup".to_string(),
        })
        .await
        .unwrap();

    let request = app
        .services
        .coin_requests
        .create(
            user.user_id,
            CreateCoinRequestInput {
                activity_id: activity.id,
                comment: "Spoke about async Rust".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(request.state, CoinRequestState::InProgress);

    let pending = app.services.coin_requests.list_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].ucoin_reward, 50);

    app.services.coin_requests.accept(request.id).await.unwrap();
    assert_eq!(app.balance_of(user.user_id).await, 50);

    // The credit shows up in the ledger, tied back to the request.
    let history = LedgerService::history_for_user(&*app.db, user.user_id, None)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, LedgerAction::Add);
    assert_eq!(history[0].category, LedgerCategory::Request);
    assert_eq!(history[0].category_id, request.id);
    assert_eq!(history[0].amount, 50);

    assert!(app.services.coin_requests.list_pending().await.unwrap().is_empty());
}

#[tokio::test]
async fn processed_requests_cannot_be_processed_again() {
    let app = TestApp::new().await;
    let user = app.create_user("Petr", "Ivanov", 0).await;

    let activity = app
        .services
        .activities
        .create(CreateActivityInput {
            name: "Mentoring".to_string(),
            ucoin_reward: 20,
            description: String::new(),
        })
        .await
        .unwrap();

    let request = app
        .services
        .coin_requests
        .create(
            user.user_id,
            CreateCoinRequestInput {
                activity_id: activity.id,
                comment: "Mentored an intern".to_string(),
            },
        )
        .await
        .unwrap();

    app.services.coin_requests.accept(request.id).await.unwrap();

    // Neither a second accept nor a late reject may touch the balance.
    assert!(matches!(
        app.services.coin_requests.accept(request.id).await,
        Err(ServiceError::Conflict(_))
    ));
    assert!(matches!(
        app.services
            .coin_requests
            .reject(request.id, "too late".to_string())
            .await,
        Err(ServiceError::Conflict(_))
    ));
    assert_eq!(app.balance_of(user.user_id).await, 20);
}

#[tokio::test]
async fn rejection_stores_the_comment_and_leaves_balance_alone() {
    let app = TestApp::new().await;
    let user = app.create_user("Anna", "Sidorova", 10).await;

    let activity = app
        .services
        .activities
        .create(CreateActivityInput {
            name: "Blog post".to_string(),
            ucoin_reward: 30,
            description: String::new(),
        })
        .await
        .unwrap();

    let request = app
        .services
        .coin_requests
        .create(
            user.user_id,
            CreateCoinRequestInput {
                activity_id: activity.id,
                comment: "Wrote a post".to_string(),
            },
        )
        .await
        .unwrap();

    app.services
        .coin_requests
        .reject(request.id, "No link to the post".to_string())
        .await
        .unwrap();

    let own = app
        .services
        .coin_requests
        .list_for_user(user.user_id, None)
        .await
        .unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].state, CoinRequestState::Rejected);
    assert_eq!(app.balance_of(user.user_id).await, 10);
}

#[tokio::test]
async fn request_against_unknown_activity_is_rejected() {
    let app = TestApp::new().await;
    let user = app.create_user("Olga", "Smirnova", 0).await;

    let result = app
        .services
        .coin_requests
        .create(
            user.user_id,
            CreateCoinRequestInput {
                activity_id: uuid::Uuid::new_v4(),
                comment: "Ghost activity".to_string(),
            },
        )
        .await;

    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}
