use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use ucoin_store_api::db::{self, DbConfig};
use ucoin_store_api::events::{self, EventSender};
use ucoin_store_api::services::storage::StorageService;
use ucoin_store_api::services::users::{CreateUserInput, CreatedUser};
use ucoin_store_api::services::AppServices;

/// Test harness backed by an in-memory SQLite database with the real
/// migrations applied. A single pooled connection keeps the in-memory
/// database alive and shared.
pub struct TestApp {
    pub db: Arc<db::DbPool>,
    pub services: AppServices,
    _upload_dir: tempfile::TempDir,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let pool = db::establish_connection_with_config(&config)
            .await
            .expect("failed to open test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");
        let db = Arc::new(pool);

        let (tx, rx) = mpsc::channel(64);
        let event_sender = Arc::new(EventSender::new(tx));
        let event_task = tokio::spawn(events::process_events(rx));

        let upload_dir = tempfile::tempdir().expect("failed to create upload dir");
        let storage = StorageService::new(upload_dir.path());
        let services = AppServices::new(db.clone(), event_sender, storage);

        Self {
            db,
            services,
            _upload_dir: upload_dir,
            _event_task: event_task,
        }
    }

    /// Register a user with the given starting balance.
    pub async fn create_user(&self, first_name: &str, last_name: &str, balance: i32) -> CreatedUser {
        self.services
            .users
            .create_user(CreateUserInput {
                username: None,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                patronymic: String::new(),
                position: None,
                balance,
            })
            .await
            .expect("failed to create test user")
    }

    pub async fn balance_of(&self, user_id: Uuid) -> i32 {
        self.services
            .users
            .get_balance(user_id)
            .await
            .expect("failed to read balance")
    }
}
