use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::services::users::{first_char, CreateUserInput, UserService};

/// Bulk user onboarding from an uploaded CSV table.
///
/// The flow is two-step: `parse` turns the file into candidate rows with
/// generated usernames for the admin to review, then `register` creates
/// accounts for everything not struck from the list.
#[derive(Clone)]
pub struct ImportService {
    users: Arc<UserService>,
}

/// One row of the uploaded table, as shown on the review screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedUser {
    pub last_name: String,
    pub first_name: String,
    pub patronymic: String,
    pub position: Option<String>,
    pub balance: i32,
    pub username: String,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    last_name: String,
    first_name: String,
    #[serde(default)]
    patronymic: String,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    balance: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct ImportOutcome {
    pub created: Vec<ImportedUser>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ImportedUser {
    pub user_id: Uuid,
    pub username: String,
    pub user_name: String,
}

impl ImportService {
    pub fn new(users: Arc<UserService>) -> Self {
        Self { users }
    }

    /// Parse an uploaded CSV into candidate users. Expects a header row with
    /// `last_name`, `first_name` and optionally `patronymic`, `position` and
    /// `balance` columns. Rows with an empty name are rejected rather than
    /// silently dropped.
    #[instrument(skip(self, bytes))]
    pub async fn parse(&self, bytes: &[u8]) -> Result<Vec<ParsedUser>, ServiceError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let mut parsed: Vec<ParsedUser> = Vec::new();
        for (index, record) in reader.deserialize::<CsvRow>().enumerate() {
            let row = record.map_err(|e| {
                ServiceError::ValidationError(format!("Row {}: {}", index + 1, e))
            })?;

            if row.last_name.is_empty() || row.first_name.is_empty() {
                return Err(ServiceError::ValidationError(format!(
                    "Row {}: first and last name are required",
                    index + 1
                )));
            }

            let first = row.first_name.to_lowercase();
            let last_initial = first_char(&row.last_name);
            let patronymic_initial = first_char(&row.patronymic);
            let parts: Vec<&str> = [
                first.as_str(),
                last_initial.as_str(),
                patronymic_initial.as_str(),
            ]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();
            let mut username = self.users.generate_username(&parts).await?;

            // The table itself may repeat a name that is new to the database;
            // the count-based suffix only sees stored accounts.
            let duplicates_in_batch = parsed
                .iter()
                .filter(|p| p.username.starts_with(&username))
                .count();
            if duplicates_in_batch > 0 {
                username = format!("{}_{}", username, duplicates_in_batch);
            }

            parsed.push(ParsedUser {
                last_name: row.last_name,
                first_name: row.first_name,
                patronymic: row.patronymic,
                position: row.position,
                balance: row.balance.unwrap_or(0).max(0),
                username,
            });
        }

        if parsed.is_empty() {
            return Err(ServiceError::ValidationError(
                "The table contains no user rows".to_string(),
            ));
        }
        Ok(parsed)
    }

    /// Create accounts for the reviewed rows. `excluded_usernames` lists the
    /// rows the admin struck from the preview; they are reported back as
    /// skipped.
    #[instrument(skip(self, parsed))]
    pub async fn register(
        &self,
        parsed: Vec<ParsedUser>,
        excluded_usernames: &[String],
    ) -> Result<ImportOutcome, ServiceError> {
        let mut created = Vec::new();
        let mut skipped = Vec::new();

        for candidate in parsed {
            if excluded_usernames.contains(&candidate.username) {
                skipped.push(candidate.username);
                continue;
            }

            let result = self
                .users
                .create_user(CreateUserInput {
                    username: Some(candidate.username.clone()),
                    first_name: candidate.first_name,
                    last_name: candidate.last_name,
                    patronymic: candidate.patronymic,
                    position: candidate.position,
                    balance: candidate.balance,
                })
                .await;

            match result {
                Ok(user) => created.push(ImportedUser {
                    user_id: user.user_id,
                    username: user.username,
                    user_name: user.user_name,
                }),
                Err(e) => {
                    warn!("Skipping import row '{}': {}", candidate.username, e);
                    skipped.push(candidate.username);
                }
            }
        }

        Ok(ImportOutcome { created, skipped })
    }
}
