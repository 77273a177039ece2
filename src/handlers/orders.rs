use crate::handlers::common::{
    created_response, map_service_error, no_content_response, success_response, LimitParams,
};
use crate::{auth::AuthUser, entities::commerce::order::Office, errors::ApiError, AppState};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Routes for placing and viewing one's own orders.
pub fn order_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_own_orders))
        .route("/checkout", post(checkout))
}

/// Admin fulfilment routes.
pub fn order_admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/pending", get(list_pending))
        .route("/:id", get(order_detail))
        .route("/:id/complete", post(complete_order))
}

#[derive(Debug, Deserialize)]
struct CheckoutRequest {
    office: Office,
}

async fn checkout(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CheckoutRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let result = state
        .services
        .checkout
        .checkout(user.user_id, payload.office)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(result))
}

async fn list_own_orders(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(params): Query<LimitParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let orders = state
        .services
        .orders
        .list_for_user(user.user_id, params.limit)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(orders))
}

async fn list_pending(
    State(state): State<Arc<AppState>>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let pending = state
        .services
        .orders
        .list_pending()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(pending))
}

async fn order_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let detail = state
        .services
        .orders
        .detail(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(detail))
}

async fn complete_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .orders
        .complete(id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}
