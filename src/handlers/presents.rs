use crate::handlers::common::{
    created_response, map_service_error, no_content_response, success_response,
};
use crate::{
    auth::AuthUser, errors::ApiError, services::rewards::presents::SendPresentInput, AppState,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

/// Peer-to-peer gift routes. Listing is always recipient-scoped; there is no
/// outbox view.
pub fn present_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_presents).post(send_present))
        .route("/unread", get(list_unread))
        .route("/unread/count", get(unread_count))
        .route("/:id", get(get_present))
        .route("/:id/read", post(mark_read))
}

async fn send_present(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<SendPresentInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let created = state
        .services
        .presents
        .send(user.user_id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(created))
}

async fn list_presents(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let presents = state
        .services
        .presents
        .list_all(user.user_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(presents))
}

async fn list_unread(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let presents = state
        .services
        .presents
        .list_unread(user.user_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(presents))
}

async fn unread_count(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let count = state
        .services
        .presents
        .unread_count(user.user_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({ "unread": count })))
}

async fn get_present(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let present = state
        .services
        .presents
        .get(user.user_id, id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(present))
}

async fn mark_read(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .presents
        .mark_read(user.user_id, id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}
