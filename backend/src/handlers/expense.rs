//! Expense HTTP handlers

use axum::{
    extract::{Path, State},
    response::Redirect,
    Form, Json,
};
use shared::forms::ExpenseForm;
use shared::types::ActionState;

use super::{back_to, path_id};
use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::expense::Expense;
use crate::services::ExpenseService;
use crate::AppState;

/// List expenses, newest first
pub async fn list_expenses(State(state): State<AppState>) -> AppResult<Json<Vec<Expense>>> {
    let service = ExpenseService::new(state.db.clone());
    Ok(Json(service.list().await?))
}

pub async fn get_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Expense>> {
    let id = path_id(&id)?;
    let service = ExpenseService::new(state.db.clone());
    Ok(Json(service.get(id).await?))
}

/// Record an expense for the signed-in user
pub async fn create_expense(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Form(form): Form<ExpenseForm>,
) -> AppResult<Redirect> {
    let input = form.parse().map_err(AppError::invalid_form)?;
    ExpenseService::new(state.db.clone())
        .create(auth.user_id(), input)
        .await?;
    Ok(back_to("expenses"))
}

pub async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ExpenseForm>,
) -> AppResult<Redirect> {
    let id = path_id(&id)?;
    let input = form.parse().map_err(AppError::invalid_form)?;
    ExpenseService::new(state.db.clone()).update(id, input).await?;
    Ok(back_to("expenses"))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ActionState>> {
    let id = path_id(&id)?;
    ExpenseService::new(state.db.clone()).delete(id).await?;
    Ok(Json(ActionState::message("Pengeluaran berhasil dihapus.")))
}
