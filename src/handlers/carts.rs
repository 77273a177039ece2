use crate::handlers::common::{map_service_error, no_content_response, success_response};
use crate::{
    auth::AuthUser,
    errors::ApiError,
    services::commerce::{AddToCartInput, CartAction},
    AppState,
};
use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Shopping cart routes. Every operation is scoped to the signed-in user;
/// a cart row id belonging to someone else reads as not found.
pub fn cart_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_cart).post(add_to_cart))
        .route("/item", delete(remove_by_item))
        .route("/:id", delete(remove_row))
        .route("/:id/count", post(change_count))
}

async fn list_cart(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let lines = state
        .services
        .carts
        .list(user.user_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(lines))
}

async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<AddToCartInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .carts
        .add(user.user_id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

#[derive(Debug, Deserialize)]
struct ChangeCountRequest {
    action: CartAction,
}

async fn change_count(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangeCountRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .carts
        .change_count(user.user_id, id, payload.action)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

async fn remove_row(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .carts
        .remove(user.user_id, id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

#[derive(Debug, Deserialize)]
struct RemoveByItemRequest {
    item_id: Uuid,
    size: String,
}

async fn remove_by_item(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<RemoveByItemRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .carts
        .remove_by_item(user.user_id, payload.item_id, &payload.size)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}
