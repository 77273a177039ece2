use crate::handlers::common::{
    created_response, map_service_error, no_content_response, success_response, LimitParams,
};
use crate::{
    auth::AuthUser, errors::ApiError, services::rewards::coin_requests::CreateCoinRequestInput,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Routes for claiming activity rewards.
pub fn coin_request_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_own_requests).post(create_request))
}

/// Moderation queue routes.
pub fn coin_request_moderation_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/pending", get(list_pending))
        .route("/:id/accept", post(accept_request))
        .route("/:id/reject", post(reject_request))
}

async fn create_request(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateCoinRequestInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let created = state
        .services
        .coin_requests
        .create(user.user_id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(created))
}

async fn list_own_requests(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(params): Query<LimitParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let requests = state
        .services
        .coin_requests
        .list_for_user(user.user_id, params.limit)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(requests))
}

async fn list_pending(
    State(state): State<Arc<AppState>>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let pending = state
        .services
        .coin_requests
        .list_pending()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(pending))
}

async fn accept_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .coin_requests
        .accept(id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

#[derive(Debug, Deserialize)]
struct RejectRequest {
    comment: String,
}

async fn reject_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .coin_requests
        .reject(id, payload.comment)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}
