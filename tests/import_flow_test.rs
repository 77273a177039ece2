mod common;

use common::TestApp;
use ucoin_store_api::errors::ServiceError;

const TABLE: &str = "\
last_name,first_name,patronymic,position,balance
Petrov,Ivan,Sergeevich,Engineer,100
Sidorova,Anna,,Designer,50
Petrov,Ivan,Sergeevich,Engineer,0
";

#[tokio::test]
async fn parse_generates_reviewable_rows() {
    let app = TestApp::new().await;

    let parsed = app.services.import.parse(TABLE.as_bytes()).await.unwrap();
    assert_eq!(parsed.len(), 3);

    assert_eq!(parsed[0].username, "ivan_P_S");
    assert_eq!(parsed[0].balance, 100);
    assert_eq!(parsed[1].username, "anna_S");
    // A name repeated within the same table gets suffixed before anything
    // is written to the database.
    assert_eq!(parsed[2].username, "ivan_P_S_1");
}

#[tokio::test]
async fn register_skips_excluded_rows() {
    let app = TestApp::new().await;

    let parsed = app.services.import.parse(TABLE.as_bytes()).await.unwrap();
    let outcome = app
        .services
        .import
        .register(parsed, &["anna_S".to_string()])
        .await
        .unwrap();

    assert_eq!(outcome.created.len(), 2);
    assert_eq!(outcome.skipped, vec!["anna_S".to_string()]);

    // The created accounts are real, with their balances applied.
    let imported = &outcome.created[0];
    assert_eq!(imported.username, "ivan_P_S");
    assert_eq!(app.balance_of(imported.user_id).await, 100);
}

#[tokio::test]
async fn broken_tables_are_rejected_with_the_row_number() {
    let app = TestApp::new().await;

    let missing_name = "last_name,first_name\nPetrov,\n";
    let err = app
        .services
        .import
        .parse(missing_name.as_bytes())
        .await
        .unwrap_err();
    match err {
        ServiceError::ValidationError(msg) => assert!(msg.contains("Row 1")),
        other => panic!("expected a validation error, got {:?}", other),
    }

    let empty = "last_name,first_name,balance\n";
    assert!(matches!(
        app.services.import.parse(empty.as_bytes()).await,
        Err(ServiceError::ValidationError(_))
    ));
}
