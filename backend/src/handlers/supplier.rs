//! Supplier HTTP handlers

use axum::{
    extract::{Path, State},
    response::Redirect,
    Form, Json,
};
use shared::forms::SupplierForm;
use shared::types::ActionState;

use super::{back_to, path_id};
use crate::error::{AppError, AppResult};
use crate::services::supplier::Supplier;
use crate::services::SupplierService;
use crate::AppState;

/// List all suppliers
pub async fn list_suppliers(State(state): State<AppState>) -> AppResult<Json<Vec<Supplier>>> {
    let service = SupplierService::new(state.db.clone());
    Ok(Json(service.list().await?))
}

/// Get a specific supplier
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Supplier>> {
    let id = path_id(&id)?;
    let service = SupplierService::new(state.db.clone());
    Ok(Json(service.get(id).await?))
}

/// Create a new supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    Form(form): Form<SupplierForm>,
) -> AppResult<Redirect> {
    let input = form.parse().map_err(AppError::invalid_form)?;
    SupplierService::new(state.db.clone()).create(input).await?;
    Ok(back_to("suppliers"))
}

/// Update a supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<SupplierForm>,
) -> AppResult<Redirect> {
    let id = path_id(&id)?;
    let input = form.parse().map_err(AppError::invalid_form)?;
    SupplierService::new(state.db.clone()).update(id, input).await?;
    Ok(back_to("suppliers"))
}

/// Delete a supplier
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ActionState>> {
    let id = path_id(&id)?;
    SupplierService::new(state.db.clone()).delete(id).await?;
    Ok(Json(ActionState::message("Supplier berhasil dihapus.")))
}
