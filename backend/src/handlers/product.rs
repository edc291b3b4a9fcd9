//! Product HTTP handlers

use axum::{
    extract::{Path, State},
    response::Redirect,
    Form, Json,
};
use shared::forms::ProductForm;
use shared::types::ActionState;

use super::{back_to, path_id};
use crate::error::{AppError, AppResult};
use crate::services::product::Product;
use crate::services::ProductService;
use crate::AppState;

/// List all products
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.db.clone());
    Ok(Json(service.list().await?))
}

/// Get a specific product
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let id = path_id(&id)?;
    let service = ProductService::new(state.db.clone());
    Ok(Json(service.get(id).await?))
}

/// Create a new product
pub async fn create_product(
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> AppResult<Redirect> {
    let input = form.parse().map_err(AppError::invalid_form)?;
    ProductService::new(state.db.clone()).create(input).await?;
    Ok(back_to("products"))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> AppResult<Redirect> {
    let id = path_id(&id)?;
    let input = form.parse().map_err(AppError::invalid_form)?;
    ProductService::new(state.db.clone()).update(id, input).await?;
    Ok(back_to("products"))
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ActionState>> {
    let id = path_id(&id)?;
    ProductService::new(state.db.clone()).delete(id).await?;
    Ok(Json(ActionState::message("Produk berhasil dihapus.")))
}
