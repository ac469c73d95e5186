//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, SuccessResponse, MAX_PAGE_LIMIT};
use bolso_core::models::{MonthRef, NewTransaction, Transaction, TransactionType};
use bolso_core::TransactionInsertResult;

/// Query params for listing transactions
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/transactions - List transactions, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let limit = query.limit.unwrap_or(100).clamp(1, MAX_PAGE_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);

    let transactions = state.db.list_transactions(limit, offset)?;
    Ok(Json(transactions))
}

/// Body for creating a transaction
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub description: String,
    pub amount: f64,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    /// YYYY-MM-DD
    pub date: NaiveDate,
}

#[derive(Serialize)]
pub struct CreateTransactionResponse {
    pub id: i64,
    pub duplicate: bool,
}

/// POST /api/transactions - Create a one-off transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTransactionRequest>,
) -> Result<Json<CreateTransactionResponse>, AppError> {
    if body.amount < 0.0 {
        return Err(AppError::bad_request(
            "amount must be a non-negative magnitude; direction is carried by type",
        ));
    }

    // wall-clock nonce keeps repeated identical submissions distinct
    let nonce = Utc::now().timestamp_nanos_opt().unwrap_or_default().to_string();
    let tx = NewTransaction::manual(
        &body.description,
        body.amount,
        body.category,
        body.tx_type,
        body.date,
        &nonce,
    );

    let (id, duplicate) = match state.db.insert_transaction(&tx)? {
        TransactionInsertResult::Inserted(id) => (id, false),
        TransactionInsertResult::Duplicate(id) => (id, true),
    };

    Ok(Json(CreateTransactionResponse { id, duplicate }))
}

/// Body for marking a transaction paid/unpaid
#[derive(Debug, Deserialize)]
pub struct SetPaidRequest {
    pub paid: bool,
    /// Defaults to today when marking paid
    pub paid_date: Option<NaiveDate>,
}

/// PUT /api/transactions/:id/pay - Toggle payment tracking
pub async fn set_transaction_paid(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<SetPaidRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let paid_date = if body.paid {
        Some(body.paid_date.unwrap_or_else(|| Utc::now().date_naive()))
    } else {
        None
    };

    state.db.set_transaction_paid(id, body.paid, paid_date)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// DELETE /api/transactions/:id
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_transaction(id)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Body for creating an installment purchase
#[derive(Debug, Deserialize)]
pub struct CreateInstallmentsRequest {
    pub description: String,
    pub total: f64,
    pub count: u32,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct CreateInstallmentsResponse {
    pub ids: Vec<i64>,
    pub group_id: Option<i64>,
}

/// POST /api/transactions/installments - Split a purchase into siblings
pub async fn create_installments(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateInstallmentsRequest>,
) -> Result<Json<CreateInstallmentsResponse>, AppError> {
    if body.count == 0 {
        return Err(AppError::bad_request("count must be at least 1"));
    }
    if !(1..=12).contains(&body.month) {
        return Err(AppError::bad_request("month must be 1-12"));
    }

    let siblings = bolso_core::installments::plan(
        &body.description,
        body.total,
        body.count,
        MonthRef::new(body.year, body.month),
        body.day,
        body.category,
    );

    let ids = state.db.insert_installments(&siblings)?;
    let group_id = ids.first().copied();

    Ok(Json(CreateInstallmentsResponse { ids, group_id }))
}
