use crate::handlers::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
};
use crate::{
    auth::AuthUser,
    entities::commerce::LifecycleState,
    errors::ApiError,
    services::commerce::{CreateProductInput, UpdateProductInput},
    services::storage::{ITEM_PHOTO_DIR, PRODUCT_PHOTO_DIR},
    AppState,
};
use axum::{
    extract::{Multipart, Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Store-front product routes.
pub fn store_product_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_store_products))
        .route("/:id", get(product_page))
}

/// Admin catalog management: products, their variants and sizes.
pub fn product_admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_admin_products).post(create_product))
        .route("/:id", post(update_product).delete(delete_product))
        .route("/:id/state", post(change_product_state))
        .route("/:id/items", get(list_items).post(create_item))
        .route("/items/:item_id", delete(delete_item))
        .route("/items/:item_id/sizes", post(add_item_size))
        .route("/items/:item_id/sizes/:label", delete(remove_item_size))
}

async fn list_store_products(
    State(state): State<Arc<AppState>>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let products = state
        .services
        .products
        .list_store()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(products))
}

async fn product_page(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let page = state
        .services
        .products
        .product_page(user.user_id, id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(page))
}

async fn list_admin_products(
    State(state): State<Arc<AppState>>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let products = state
        .services
        .products
        .list_admin()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(products))
}

/// Collected fields of a product multipart form. The photo arrives as a
/// file part named `photo`; everything else is plain text.
#[derive(Default)]
struct ProductForm {
    category_id: Option<Uuid>,
    name: Option<String>,
    price: Option<i32>,
    description: Option<String>,
    photo: Option<(String, Vec<u8>)>,
}

async fn read_product_form(mut multipart: Multipart) -> Result<ProductForm, ApiError> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed form data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "photo" => {
                let filename = field.file_name().unwrap_or("photo.bin").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Unreadable photo: {}", e)))?;
                form.photo = Some((filename, bytes.to_vec()));
            }
            "category_id" => {
                let text = read_text(field).await?;
                form.category_id = Some(
                    text.parse()
                        .map_err(|_| ApiError::BadRequest("Invalid category id".to_string()))?,
                );
            }
            "name" => form.name = Some(read_text(field).await?),
            "price" => {
                let text = read_text(field).await?;
                form.price = Some(
                    text.parse()
                        .map_err(|_| ApiError::BadRequest("Invalid price".to_string()))?,
                );
            }
            "description" => form.description = Some(read_text(field).await?),
            _ => {}
        }
    }
    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Unreadable field: {}", e)))
}

async fn create_product(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let form = read_product_form(multipart).await?;

    let input = CreateProductInput {
        category_id: form.category_id,
        name: form
            .name
            .ok_or_else(|| ApiError::BadRequest("Missing product name".to_string()))?,
        price: form
            .price
            .ok_or_else(|| ApiError::BadRequest("Missing product price".to_string()))?,
        description: form.description.unwrap_or_default(),
    };
    validate_input(&input)?;

    let (filename, bytes) = form
        .photo
        .ok_or_else(|| ApiError::BadRequest("Missing product photo".to_string()))?;
    let photo_path = state
        .services
        .storage
        .save(PRODUCT_PHOTO_DIR, &filename, &bytes)
        .await
        .map_err(map_service_error)?;

    let created = state
        .services
        .products
        .create(input, photo_path)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(created))
}

async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let form = read_product_form(multipart).await?;

    let new_photo_path = match form.photo {
        Some((filename, bytes)) => Some(
            state
                .services
                .storage
                .save(PRODUCT_PHOTO_DIR, &filename, &bytes)
                .await
                .map_err(map_service_error)?,
        ),
        None => None,
    };

    let input = UpdateProductInput {
        new_category: form.category_id,
        new_name: form.name,
        new_description: form.description,
        new_price: form.price,
        new_photo_path,
    };

    let updated = state
        .services
        .products
        .update(id, input)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(updated))
}

#[derive(Debug, Deserialize)]
struct ChangeStateRequest {
    state: LifecycleState,
}

async fn change_product_state(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangeStateRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let outcome = state
        .services
        .products
        .change_state(id, payload.state)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({ "result": outcome })))
}

async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .products
        .delete(id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

async fn list_items(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let items = state
        .services
        .items
        .list_for_product(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(items))
}

async fn create_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let mut color: Option<String> = None;
    let mut sized = true;
    let mut photo: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed form data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "photo" => {
                let filename = field.file_name().unwrap_or("photo.bin").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Unreadable photo: {}", e)))?;
                photo = Some((filename, bytes.to_vec()));
            }
            "color" => color = Some(read_text(field).await?),
            "sized" => {
                let text = read_text(field).await?;
                sized = text
                    .parse()
                    .map_err(|_| ApiError::BadRequest("Invalid sized flag".to_string()))?;
            }
            _ => {}
        }
    }

    let color = color.ok_or_else(|| ApiError::BadRequest("Missing item color".to_string()))?;
    let (filename, bytes) =
        photo.ok_or_else(|| ApiError::BadRequest("Missing item photo".to_string()))?;

    let photo_path = state
        .services
        .storage
        .save(ITEM_PHOTO_DIR, &filename, &bytes)
        .await
        .map_err(map_service_error)?;

    let created = state
        .services
        .items
        .create(id, color, photo_path, sized)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(created))
}

async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .items
        .delete(item_id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

#[derive(Debug, Deserialize)]
struct AddSizeRequest {
    label: String,
}

async fn add_item_size(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<AddSizeRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .items
        .add_size(item_id, &payload.label)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

async fn remove_item_size(
    State(state): State<Arc<AppState>>,
    Path((item_id, label)): Path<(Uuid, String)>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .items
        .remove_size(item_id, &label)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}
