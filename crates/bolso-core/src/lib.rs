//! bolso Core Library
//!
//! Shared functionality for the bolso personal finance tracker:
//! - Domain models and SQLite persistence
//! - Statement ingestion (CSV/XLSX) and normalization across bank formats
//! - Recurring bill materialization with day-of-month clamping
//! - Installment purchase planning
//! - Budget-vs-actual reporting
//! - Pluggable LLM categorization backends (Ollama, mock)

pub mod ai;
pub mod budget;
pub mod db;
pub mod error;
pub mod ingest;
pub mod installments;
pub mod models;
pub mod recurring;
pub mod statement;

pub use ai::{CategorizerBackend, CategorizerClient, MockBackend, OllamaBackend, RowCategorization};
pub use budget::{BudgetLine, MonthlyBudgetReport};
pub use db::{Database, TransactionInsertResult};
pub use error::{Error, Result};
pub use models::{
    BudgetGoal, MonthRef, NewRecurringTemplate, NewTransaction, ParsedStatementRow,
    RecurringTemplate, Transaction, TransactionCategory, TransactionType,
};
pub use statement::{Cell, ColumnMap};
