//! Dashboard handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::product::Product;
use crate::services::ProductService;
use crate::AppState;

#[derive(Serialize)]
pub struct DashboardResponse {
    pub greeting: String,
    pub product_count: i64,
    pub products: Vec<Product>,
}

/// Product summary shown on the landing page
pub async fn dashboard_summary(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> AppResult<Json<DashboardResponse>> {
    let service = ProductService::new(state.db.clone());
    let product_count = service.count().await?;
    let products = service.list().await?;

    Ok(Json(DashboardResponse {
        greeting: format!("Selamat datang, {}", auth.user.name),
        product_count,
        products,
    }))
}
