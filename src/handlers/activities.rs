use crate::handlers::common::{
    created_response, map_service_error, no_content_response, success_response,
};
use crate::{
    errors::ApiError,
    services::rewards::activities::{CreateActivityInput, UpdateActivityInput},
    AppState,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

/// Read-only catalog of reward activities, visible to every signed-in user.
pub fn activity_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_activities))
}

/// Admin management of the activity catalog.
pub fn activity_admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_activity))
        .route("/:id", post(update_activity).delete(delete_activity))
}

async fn list_activities(
    State(state): State<Arc<AppState>>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let activities = state
        .services
        .activities
        .list()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(activities))
}

async fn create_activity(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateActivityInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let created = state
        .services
        .activities
        .create(payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(created))
}

async fn update_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateActivityInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let updated = state
        .services
        .activities
        .update(id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(updated))
}

async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .activities
        .delete(id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}
