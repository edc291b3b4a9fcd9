//! Customer HTTP handlers

use axum::{
    extract::{Path, State},
    response::Redirect,
    Form, Json,
};
use shared::forms::CustomerForm;
use shared::types::ActionState;

use super::{back_to, path_id};
use crate::error::{AppError, AppResult};
use crate::services::customer::Customer;
use crate::services::CustomerService;
use crate::AppState;

/// List all customers
pub async fn list_customers(State(state): State<AppState>) -> AppResult<Json<Vec<Customer>>> {
    let service = CustomerService::new(state.db.clone());
    Ok(Json(service.list().await?))
}

/// Get a specific customer
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Customer>> {
    let id = path_id(&id)?;
    let service = CustomerService::new(state.db.clone());
    Ok(Json(service.get(id).await?))
}

/// Create a new customer
pub async fn create_customer(
    State(state): State<AppState>,
    Form(form): Form<CustomerForm>,
) -> AppResult<Redirect> {
    let input = form.parse().map_err(AppError::invalid_form)?;
    CustomerService::new(state.db.clone()).create(input).await?;
    Ok(back_to("customers"))
}

/// Update a customer
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<CustomerForm>,
) -> AppResult<Redirect> {
    let id = path_id(&id)?;
    let input = form.parse().map_err(AppError::invalid_form)?;
    CustomerService::new(state.db.clone()).update(id, input).await?;
    Ok(back_to("customers"))
}

/// Delete a customer
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ActionState>> {
    let id = path_id(&id)?;
    CustomerService::new(state.db.clone()).delete(id).await?;
    Ok(Json(ActionState::message("Pelanggan berhasil dihapus.")))
}
