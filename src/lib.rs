//! Internal rewards and merch store API.
//!
//! Employees earn ucoins for activities, gift them to each other and spend
//! them in the company merch store.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod services;

use axum::{extract::DefaultBodyLimit, response::Json, routing::get, Extension, Router};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use auth::{AuthRouterExt, AuthService};
use entities::user_profile::Role;
use services::AppServices;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: Arc<events::EventSender>,
    pub services: AppServices,
    pub auth_service: Arc<AuthService>,
}

/// Build the full application router.
///
/// Route tiers: `/auth` is public, `/api` needs a valid token, `/api/mod`
/// needs at least the moderator role and `/api/admin` the administrator
/// role. Uploaded photos are served statically under `/media`.
pub fn app_router(state: Arc<AppState>) -> Router {
    let user_api = Router::new()
        .merge(handlers::users::user_routes())
        .nest("/activities", handlers::activities::activity_routes())
        .nest("/requests", handlers::coin_requests::coin_request_routes())
        .nest("/presents", handlers::presents::present_routes())
        .nest("/store/products", handlers::products::store_product_routes())
        .nest("/store/cart", handlers::carts::cart_routes())
        .nest("/store/orders", handlers::orders::order_routes())
        .with_auth();

    let moderation_api = Router::new()
        .nest(
            "/requests",
            handlers::coin_requests::coin_request_moderation_routes(),
        )
        .with_role(Role::Moderator);

    let admin_api = Router::new()
        .merge(handlers::users::user_admin_routes())
        .nest("/users/import", handlers::imports::import_routes())
        .nest("/activities", handlers::activities::activity_admin_routes())
        .nest("/products", handlers::products::product_admin_routes())
        .nest("/orders", handlers::orders::order_admin_routes())
        .with_role(Role::Administrator);

    let api = Router::new()
        .merge(user_api)
        .nest("/mod", moderation_api)
        .nest("/admin", admin_api)
        .with_state(state.clone());

    let auth_router = auth::auth_routes().with_state(state.auth_service.clone());

    let media = ServeDir::new(state.config.upload_dir.clone());

    Router::new()
        .route("/health", get(health_check))
        .nest("/auth", auth_router)
        .nest("/api", api)
        .nest_service("/media", media)
        .layer(Extension(state.auth_service.clone()))
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    if cfg.cors_allow_any_origin {
        CorsLayer::permissive()
    } else {
        let origins: Vec<axum::http::HeaderValue> = cfg
            .cors_allowed_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter_map(|origin| origin.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(tower_http::cors::AllowOrigin::list(origins))
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    }
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
