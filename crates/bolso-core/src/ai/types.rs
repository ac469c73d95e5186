//! Categorizer backend response types

use serde::{Deserialize, Serialize};

use crate::models::{ParsedStatementRow, TransactionType};

/// One row's category assignment from the oracle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowCategorization {
    /// Category label, drawn from the user's category list when possible
    pub category: String,
    /// Income/expense direction
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
}

/// Sign-derived assignment used when the oracle is unavailable or returns
/// fewer rows than asked
pub fn fallback_categorization(row: &ParsedStatementRow) -> RowCategorization {
    RowCategorization {
        category: row.category.clone().unwrap_or_else(|| "Outros".to_string()),
        tx_type: if row.amount >= 0.0 {
            TransactionType::Income
        } else {
            TransactionType::Expense
        },
    }
}
