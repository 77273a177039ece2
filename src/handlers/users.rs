use crate::handlers::common::{
    created_response, map_service_error, no_content_response, success_response, LimitParams,
};
use crate::{
    auth::AuthUser,
    entities::user_profile::Role,
    errors::ApiError,
    services::rewards::LedgerService,
    services::users::{CreateUserInput, PublicUserInfo},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Routes for the signed-in user's own profile data.
pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/userinfo", get(user_info))
        .route("/userbalance", get(user_balance))
        .route("/userhistory", get(user_history))
        .route("/search-user", get(search_users))
}

/// Admin routes for account management.
pub fn user_admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:id/deactivate", post(deactivate_user))
        .route("/moderators", get(list_moderators).post(grant_moderator))
        .route("/moderators/:id", delete(revoke_moderator))
}

#[derive(Debug, Serialize)]
struct UserInfoResponse {
    #[serde(flatten)]
    profile: PublicUserInfo,
    balance: i32,
    username: String,
}

async fn user_info(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let profile = state
        .services
        .users
        .get_profile(user.user_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(UserInfoResponse {
        balance: profile.balance,
        profile: PublicUserInfo::from_profile(&profile),
        username: user.username,
    }))
}

async fn user_balance(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let balance = state
        .services
        .users
        .get_balance(user.user_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({ "balance": balance })))
}

async fn user_history(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(params): Query<LimitParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let history = LedgerService::history_for_user(&*state.db, user.user_id, params.limit)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(history))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    name: String,
}

async fn search_users(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let matches = state
        .services
        .users
        .search(user.user_id, &params.name)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(matches))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let created = state
        .services
        .users
        .create_user(payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(created))
}

async fn deactivate_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .users
        .deactivate(id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

async fn list_moderators(
    State(state): State<Arc<AppState>>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let moderators = state
        .services
        .users
        .list_moderators()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(moderators))
}

#[derive(Debug, Deserialize)]
struct GrantModeratorRequest {
    user_id: Uuid,
}

async fn grant_moderator(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GrantModeratorRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .users
        .set_role(payload.user_id, Role::Moderator)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

async fn revoke_moderator(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .users
        .set_role(id, Role::Employee)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}
