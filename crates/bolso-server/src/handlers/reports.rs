//! Report handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState};
use bolso_core::budget::{monthly_report, MonthlyBudgetReport};
use bolso_core::models::MonthRef;

/// Query params for the monthly report
#[derive(Debug, Deserialize)]
pub struct MonthlyReportQuery {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

/// GET /api/reports/monthly - Budget-vs-actual for one month
pub async fn monthly_report_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonthlyReportQuery>,
) -> Result<Json<MonthlyBudgetReport>, AppError> {
    if !(1..=12).contains(&query.month) {
        return Err(AppError::bad_request("month must be 1-12"));
    }

    let month = MonthRef::new(query.year, query.month);
    let transactions = state.db.transactions_for_month(month)?;
    let goals = state.db.list_budget_goals()?;

    Ok(Json(monthly_report(&transactions, &goals, month)))
}
