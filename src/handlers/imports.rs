use crate::handlers::common::{map_service_error, success_response};
use crate::{errors::ApiError, services::import::ParsedUser, AppState};
use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Bulk user onboarding: upload a CSV table for review, then confirm
/// registration of the reviewed rows.
pub fn import_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/parse", post(parse_table))
        .route("/register", post(register_users))
}

async fn parse_table(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let mut file: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed form data: {}", e)))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Unreadable file: {}", e)))?;
            file = Some(bytes.to_vec());
        }
    }

    let bytes = file.ok_or_else(|| ApiError::BadRequest("Missing file part".to_string()))?;
    let parsed = state
        .services
        .import
        .parse(&bytes)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(parsed))
}

#[derive(Debug, Deserialize)]
struct RegisterUsersRequest {
    users: Vec<ParsedUser>,
    #[serde(default)]
    excluded_usernames: Vec<String>,
}

async fn register_users(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterUsersRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let outcome = state
        .services
        .import
        .register(payload.users, &payload.excluded_usernames)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(outcome))
}
