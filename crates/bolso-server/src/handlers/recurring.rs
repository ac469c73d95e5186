//! Recurring template handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{AppError, AppState, SuccessResponse};
use bolso_core::models::{MonthRef, NewRecurringTemplate, RecurringTemplate};
use bolso_core::recurring::materialize_month;
use bolso_core::TransactionInsertResult;

/// GET /api/recurring - List all templates
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RecurringTemplate>>, AppError> {
    Ok(Json(state.db.list_templates()?))
}

#[derive(Serialize)]
pub struct CreateTemplateResponse {
    pub id: i64,
}

/// POST /api/recurring - Create a template
pub async fn create_template(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewRecurringTemplate>,
) -> Result<Json<CreateTemplateResponse>, AppError> {
    if body.day_of_month < 1 {
        return Err(AppError::bad_request("day_of_month must be at least 1"));
    }
    if body.amount < 0.0 {
        return Err(AppError::bad_request("amount must be non-negative"));
    }

    let id = state.db.create_template(&body)?;
    Ok(Json(CreateTemplateResponse { id }))
}

#[derive(Serialize)]
pub struct DeleteTemplateResponse {
    pub success: bool,
    /// Materialized transactions removed by the cascade
    pub transactions_removed: usize,
}

/// DELETE /api/recurring/:id - Delete a template and its transactions
pub async fn delete_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteTemplateResponse>, AppError> {
    let transactions_removed = state.db.delete_template(id)?;
    Ok(Json(DeleteTemplateResponse {
        success: true,
        transactions_removed,
    }))
}

/// Body for materialization
#[derive(Debug, Deserialize)]
pub struct MaterializeRequest {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

/// Per-month materialization outcome
///
/// Each synthesized transaction persists as its own unit of work; a failed
/// write is counted and does not roll back its siblings.
#[derive(Serialize)]
pub struct MaterializeResponse {
    pub materialized: usize,
    pub persisted: usize,
    pub duplicates: usize,
    pub failed: usize,
}

/// POST /api/recurring/materialize - Fill in the target month's bills
pub async fn materialize(
    State(state): State<Arc<AppState>>,
    Json(body): Json<MaterializeRequest>,
) -> Result<Json<MaterializeResponse>, AppError> {
    if !(1..=12).contains(&body.month) {
        return Err(AppError::bad_request("month must be 1-12"));
    }

    let month = MonthRef::new(body.year, body.month);
    let templates = state.db.list_templates()?;
    let existing = state.db.all_transactions()?;

    let new = materialize_month(&templates, &existing, month);

    let mut persisted = 0;
    let mut duplicates = 0;
    let mut failed = 0;
    for tx in &new {
        match state.db.insert_transaction(tx) {
            Ok(TransactionInsertResult::Inserted(_)) => persisted += 1,
            Ok(TransactionInsertResult::Duplicate(_)) => duplicates += 1,
            Err(e) => {
                warn!("Failed to persist materialized transaction {}: {}", tx.description, e);
                failed += 1;
            }
        }
    }

    Ok(Json(MaterializeResponse {
        materialized: new.len(),
        persisted,
        duplicates,
        failed,
    }))
}
