//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod budgets;
pub mod import;
pub mod recurring;
pub mod reports;
pub mod transactions;

// Re-export all handlers for use in router
pub use budgets::*;
pub use import::*;
pub use recurring::*;
pub use reports::*;
pub use transactions::*;

use axum::Json;
use serde::Serialize;

/// GET /api/health - liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}
