//! Sale HTTP handlers

use axum::{
    extract::{Path, State},
    response::Redirect,
    Form, Json,
};
use chrono::Utc;
use shared::forms::SaleForm;

use super::{back_to, path_id};
use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::sale::SaleWithItems;
use crate::services::SaleService;
use crate::AppState;

fn sale_service(state: &AppState) -> SaleService {
    SaleService::new(state.db.clone(), state.config.ledger.strict_sale_stock)
}

/// List sales with their lines, newest first
pub async fn list_sales(State(state): State<AppState>) -> AppResult<Json<Vec<SaleWithItems>>> {
    Ok(Json(sale_service(&state).list().await?))
}

pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SaleWithItems>> {
    let id = path_id(&id)?;
    Ok(Json(sale_service(&state).get(id).await?))
}

/// Record a sale priced at the product's selling price with a percentage
/// discount; stock of the sold product goes down
pub async fn create_sale(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Form(form): Form<SaleForm>,
) -> AppResult<Redirect> {
    let request = form.parse(Utc::now()).map_err(AppError::invalid_form)?;

    let service = sale_service(&state);
    let sale = service.quote(request).await?;
    service.create(auth.user_id(), sale).await?;

    Ok(back_to("sales"))
}
