//! Readiness check
//!
//! `/api/v1/health` answers 503 while PostgreSQL cannot be reached; the
//! root `/health` stays a plain liveness check.

use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub database: DatabaseState,
    /// Whether a sale naming a missing product aborts
    pub strict_sale_stock: bool,
}

#[derive(Debug, Serialize)]
pub struct DatabaseState {
    pub reachable: bool,
    pub latency_ms: Option<u64>,
}

async fn ping_database(state: &AppState) -> DatabaseState {
    let started = Instant::now();
    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => DatabaseState {
            reachable: true,
            latency_ms: Some(started.elapsed().as_millis() as u64),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Database unreachable");
            DatabaseState {
                reachable: false,
                latency_ms: None,
            }
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let database = ping_database(&state).await;
    let (code, status) = if database.reachable {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        code,
        Json(ReadinessResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            environment: state.config.environment.clone(),
            database,
            strict_sale_stock: state.config.ledger.strict_sale_stock,
        }),
    )
}
