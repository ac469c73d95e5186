//! Budget goal handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, SuccessResponse};
use bolso_core::models::BudgetGoal;

/// GET /api/budgets - List all goals
pub async fn list_budget_goals(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BudgetGoal>>, AppError> {
    Ok(Json(state.db.list_budget_goals()?))
}

/// Body for setting a goal
#[derive(Debug, Deserialize)]
pub struct UpsertBudgetGoalRequest {
    pub category: String,
    pub target_percentage: f64,
}

#[derive(Serialize)]
pub struct UpsertBudgetGoalResponse {
    pub id: i64,
}

/// PUT /api/budgets - Create or update the goal for a category
pub async fn upsert_budget_goal(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UpsertBudgetGoalRequest>,
) -> Result<Json<UpsertBudgetGoalResponse>, AppError> {
    if body.category.trim().is_empty() {
        return Err(AppError::bad_request("category must not be empty"));
    }
    if !(0.0..=100.0).contains(&body.target_percentage) {
        return Err(AppError::bad_request("target_percentage must be 0-100"));
    }

    let id = state
        .db
        .upsert_budget_goal(body.category.trim(), body.target_percentage)?;
    Ok(Json(UpsertBudgetGoalResponse { id }))
}

/// DELETE /api/budgets/:category
pub async fn delete_budget_goal(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_budget_goal(&category)?;
    Ok(Json(SuccessResponse { success: true }))
}
