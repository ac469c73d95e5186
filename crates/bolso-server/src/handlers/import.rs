//! Statement import handler

use std::io::Write;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{AppError, AppState};
use bolso_core::ai::fallback_categorization;
use bolso_core::models::MonthRef;
use bolso_core::statement::{normalize, to_transaction};
use bolso_core::TransactionInsertResult;

/// Query params for the import reference month
#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    /// Reference year for year-less statement dates (default: current)
    pub year: Option<i32>,
    /// Reference month 1-12 (default: current)
    pub month: Option<u32>,
}

#[derive(Serialize)]
pub struct ImportResponse {
    /// Rows that survived the admission filter
    pub rows_found: usize,
    pub imported: usize,
    pub duplicates: usize,
    /// Distinct "nothing found" marker for structurally valid statements
    /// with no transaction rows
    pub empty: bool,
}

/// POST /api/import - Upload and import a bank statement
///
/// Accepts a multipart `file` field (CSV or, with the xlsx feature, a
/// spreadsheet). Decode failures are 400s; a decodable statement with no
/// admissible rows is a 200 with `empty = true` so clients can message it
/// distinctly.
pub async fn import_statement(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ImportQuery>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, AppError> {
    let today = Utc::now().date_naive();
    let reference = MonthRef::new(
        query.year.unwrap_or_else(|| today.year()),
        query.month.unwrap_or_else(|| today.month()),
    );
    if !(1..=12).contains(&reference.month) {
        return Err(AppError::bad_request("month must be 1-12"));
    }

    let (filename, bytes) = read_upload(&mut multipart).await?;

    // stage to a temp file with the original extension so ingestion can
    // dispatch between CSV and spreadsheet decoding
    let suffix = std::path::Path::new(&filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_else(|| ".csv".to_string());
    let mut staged = tempfile::Builder::new()
        .prefix("bolso_upload_")
        .suffix(&suffix)
        .tempfile()
        .map_err(|e| {
            warn!("Failed to stage upload: {}", e);
            AppError::internal()
        })?;
    staged.write_all(&bytes).map_err(|e| {
        warn!("Failed to stage upload: {}", e);
        AppError::internal()
    })?;

    let table = bolso_core::ingest::read_table(staged.path())?;
    let rows = normalize(&table);

    if rows.is_empty() {
        return Ok(Json(ImportResponse {
            rows_found: 0,
            imported: 0,
            duplicates: 0,
            empty: true,
        }));
    }

    // categorize through the oracle when configured, otherwise derive from
    // the statement itself
    let assignments = match &state.categorizer {
        Some(categorizer) => {
            let categories = state.db.distinct_categories()?;
            match categorizer.categorize_rows(&rows, &categories).await {
                Ok(assignments) => assignments,
                Err(e) => {
                    warn!("Categorization failed, falling back: {}", e);
                    rows.iter().map(fallback_categorization).collect()
                }
            }
        }
        None => rows.iter().map(fallback_categorization).collect(),
    };

    let mut imported = 0;
    let mut duplicates = 0;
    for (row, assignment) in rows.iter().zip(&assignments) {
        let tx = to_transaction(row, assignment, reference);
        match state.db.insert_transaction(&tx)? {
            TransactionInsertResult::Inserted(_) => imported += 1,
            TransactionInsertResult::Duplicate(_) => duplicates += 1,
        }
    }

    info!(
        "Imported {} of {} statement rows from {} ({} duplicates)",
        imported,
        rows.len(),
        filename,
        duplicates
    );

    Ok(Json(ImportResponse {
        rows_found: rows.len(),
        imported,
        duplicates,
        empty: false,
    }))
}

/// Pull the `file` field out of the multipart body
async fn read_upload(multipart: &mut Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::bad_request(&format!("Invalid multipart body: {}", e))
    })? {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .unwrap_or("statement.csv")
                .to_string();
            let bytes = field.bytes().await.map_err(|e| {
                AppError::bad_request(&format!("Failed to read upload: {}", e))
            })?;
            return Ok((filename, bytes.to_vec()));
        }
    }

    Err(AppError::bad_request("Missing `file` field"))
}
