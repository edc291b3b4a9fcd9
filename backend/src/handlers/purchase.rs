//! Purchase HTTP handlers

use axum::{
    extract::{Path, State},
    response::Redirect,
    Form, Json,
};
use shared::forms::{PurchaseForm, PurchaseUpdateForm};
use shared::types::ActionState;

use super::{back_to, path_id};
use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::purchase::PurchaseWithItems;
use crate::services::PurchaseService;
use crate::AppState;

/// List purchases with their lines, newest first
pub async fn list_purchases(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PurchaseWithItems>>> {
    let service = PurchaseService::new(state.db.clone());
    Ok(Json(service.list().await?))
}

/// Get a purchase with its lines
pub async fn get_purchase(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PurchaseWithItems>> {
    let id = path_id(&id)?;
    let service = PurchaseService::new(state.db.clone());
    Ok(Json(service.get(id).await?))
}

/// Record a purchase; stock of the bought product goes up
pub async fn create_purchase(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Form(form): Form<PurchaseForm>,
) -> AppResult<Redirect> {
    let input = form.parse().map_err(AppError::invalid_form)?;
    PurchaseService::new(state.db.clone())
        .create(auth.user_id(), input)
        .await?;
    Ok(back_to("purchases"))
}

/// Replace a purchase's supplier and line
pub async fn update_purchase(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<PurchaseUpdateForm>,
) -> AppResult<Redirect> {
    let id = path_id(&id)?;
    let changes = form.parse().map_err(AppError::invalid_form)?;
    PurchaseService::new(state.db.clone()).update(id, changes).await?;
    Ok(back_to("purchases"))
}

/// Delete a purchase and revert its stock
pub async fn delete_purchase(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ActionState>> {
    let id = path_id(&id)?;
    PurchaseService::new(state.db.clone()).delete(id).await?;
    Ok(Json(ActionState::message("Pembelian berhasil dihapus.")))
}
