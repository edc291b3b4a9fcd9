//! Payable and receivable HTTP handlers

use axum::{
    extract::{Path, State},
    response::Redirect,
    Form, Json,
};
use chrono::Utc;
use shared::forms::PaymentForm;
use shared::models::PaymentKind;

use super::{back_to, path_id};
use crate::error::{AppError, AppResult};
use crate::services::payment::PaymentSummary;
use crate::services::PaymentService;
use crate::AppState;

async fn summary(state: &AppState, kind: PaymentKind, raw_id: &str) -> AppResult<Json<PaymentSummary>> {
    let id = path_id(raw_id)?;
    let service = PaymentService::new(state.db.clone());
    Ok(Json(service.summary(kind, id).await?))
}

async fn record(state: &AppState, kind: PaymentKind, raw_id: &str, form: PaymentForm) -> AppResult<()> {
    let id = path_id(raw_id)?;
    let input = form.parse(Utc::now()).map_err(AppError::invalid_form)?;
    PaymentService::new(state.db.clone()).record(kind, id, input).await?;
    Ok(())
}

/// Payments made to the supplier of a purchase
pub async fn list_purchase_payments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PaymentSummary>> {
    summary(&state, PaymentKind::Payable, &id).await
}

pub async fn record_purchase_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<PaymentForm>,
) -> AppResult<Redirect> {
    record(&state, PaymentKind::Payable, &id, form).await?;
    Ok(back_to("purchases"))
}

/// Payments received from the customer of a sale
pub async fn list_sale_payments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PaymentSummary>> {
    summary(&state, PaymentKind::Receivable, &id).await
}

pub async fn record_sale_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<PaymentForm>,
) -> AppResult<Redirect> {
    record(&state, PaymentKind::Receivable, &id, form).await?;
    Ok(back_to("sales"))
}
