mod common;

use common::TestApp;
use ucoin_store_api::entities::user_profile::Role;
use ucoin_store_api::errors::ServiceError;
use ucoin_store_api::services::users::CreateUserInput;

#[tokio::test]
async fn a_single_token_matches_either_name() {
    let app = TestApp::new().await;
    let requester = app.create_user("Olga", "Smirnova", 0).await;
    app.create_user("Ivan", "Petrov", 0).await;
    app.create_user("Petr", "Ivanov", 0).await;

    // "iva" hits Ivan's first name and Ivanov's last name, case-insensitively.
    let found = app
        .services
        .users
        .search(requester.user_id, "iva")
        .await
        .unwrap();
    assert_eq!(found.len(), 2);

    let found = app
        .services
        .users
        .search(requester.user_id, "petr")
        .await
        .unwrap();
    assert_eq!(found.len(), 2);
}

#[tokio::test]
async fn two_tokens_match_in_either_order() {
    let app = TestApp::new().await;
    let requester = app.create_user("Olga", "Smirnova", 0).await;
    app.create_user("Ivan", "Petrov", 0).await;

    let forward = app
        .services
        .users
        .search(requester.user_id, "ivan petrov")
        .await
        .unwrap();
    assert_eq!(forward.len(), 1);
    assert_eq!(forward[0].full_name, "Ivan Petrov");

    let reversed = app
        .services
        .users
        .search(requester.user_id, "petrov ivan")
        .await
        .unwrap();
    assert_eq!(reversed.len(), 1);

    // Tokens longer than 6 characters still match via their prefix.
    app.create_user("Konstantin", "Konstantinov", 0).await;
    let truncated = app
        .services
        .users
        .search(requester.user_id, "konstantin konstantinov")
        .await
        .unwrap();
    assert_eq!(truncated.len(), 1);
}

#[tokio::test]
async fn search_excludes_the_requester_and_caps_results() {
    let app = TestApp::new().await;
    let requester = app.create_user("Ivan", "Petrov", 0).await;
    app.create_user("Ivan", "Sidorov", 0).await;
    app.create_user("Ivan", "Smirnov", 0).await;
    app.create_user("Ivan", "Kuznetsov", 0).await;
    app.create_user("Ivan", "Popov", 0).await;

    let found = app
        .services
        .users
        .search(requester.user_id, "ivan")
        .await
        .unwrap();
    assert_eq!(found.len(), 3);
    assert!(found.iter().all(|p| p.user_id != requester.user_id));
}

#[tokio::test]
async fn malformed_queries_are_rejected() {
    let app = TestApp::new().await;
    let requester = app.create_user("Ivan", "Petrov", 0).await;

    assert!(matches!(
        app.services.users.search(requester.user_id, "   ").await,
        Err(ServiceError::ValidationError(_))
    ));
    assert!(matches!(
        app.services
            .users
            .search(requester.user_id, "ivan ivanovich petrov")
            .await,
        Err(ServiceError::ValidationError(_))
    ));
}

#[tokio::test]
async fn usernames_are_generated_and_deduplicated() {
    let app = TestApp::new().await;

    let first = app
        .services
        .users
        .create_user(CreateUserInput {
            username: None,
            first_name: "Ivan".to_string(),
            last_name: "Petrov".to_string(),
            patronymic: "Sergeevich".to_string(),
            position: None,
            balance: 0,
        })
        .await
        .unwrap();
    assert_eq!(first.username, "ivan_P_S");
    assert_eq!(first.user_name, "Ivan Petrov");

    // Same name again gets a numeric suffix.
    let second = app
        .services
        .users
        .create_user(CreateUserInput {
            username: None,
            first_name: "Ivan".to_string(),
            last_name: "Petrov".to_string(),
            patronymic: "Sergeevich".to_string(),
            position: None,
            balance: 0,
        })
        .await
        .unwrap();
    assert_eq!(second.username, "ivan_P_S_1");

    // Cyrillic names come out transliterated, without a dangling separator
    // when the patronymic is missing.
    let cyrillic = app
        .services
        .users
        .create_user(CreateUserInput {
            username: None,
            first_name: "Пётр".to_string(),
            last_name: "Иванов".to_string(),
            patronymic: String::new(),
            position: None,
            balance: 0,
        })
        .await
        .unwrap();
    assert_eq!(cyrillic.username, "pyotr_I");
}

#[tokio::test]
async fn moderator_role_can_be_granted_and_revoked() {
    let app = TestApp::new().await;
    let user = app.create_user("Anna", "Sidorova", 0).await;

    app.services
        .users
        .set_role(user.user_id, Role::Moderator)
        .await
        .unwrap();
    let moderators = app.services.users.list_moderators().await.unwrap();
    assert_eq!(moderators.len(), 1);
    assert_eq!(moderators[0].user_id, user.user_id);

    app.services
        .users
        .set_role(user.user_id, Role::Employee)
        .await
        .unwrap();
    assert!(app.services.users.list_moderators().await.unwrap().is_empty());
}
