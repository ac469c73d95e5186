//! Statement normalization
//!
//! Converts an arbitrary rectangular table — rows of loosely-typed cells
//! under arbitrary, locale-dependent column headers — into canonical
//! [`ParsedStatementRow`]s. Header position is inferred, fields are matched
//! through a token table, amounts are parsed across number locales, and
//! rows without enough signal (footers, subtotals, blank padding) are
//! silently discarded.
//!
//! The normalizer is format-agnostic: decoding files into the cell table is
//! the ingestion layer's job (see [`crate::ingest`]).

pub mod amount;
pub mod columns;

pub use amount::{parse_amount, parse_amount_str};
pub use columns::{detect_columns, find_header_row, ColumnMap, StatementField};

use chrono::NaiveDate;
use tracing::debug;

use crate::ai::RowCategorization;
use crate::models::{
    origin_hash, MonthRef, NewTransaction, ParsedStatementRow, TransactionCategory,
    TransactionType,
};

/// A loosely-typed spreadsheet cell
///
/// Statement tables never get a fixed record type: all field detection
/// operates over column positions resolved from the header row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// The cell's text, if it holds any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Render the cell for use as a raw field value
    fn to_field(&self) -> String {
        match self {
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Cell::Empty => String::new(),
        }
    }
}

/// Normalize a decoded statement table into canonical rows
///
/// Output preserves input order minus discarded rows; no deduplication
/// happens here. An empty result from a well-formed table is the normal
/// "nothing found" outcome, not an error — callers message it distinctly
/// from a decode failure.
pub fn normalize(table: &[Vec<Cell>]) -> Vec<ParsedStatementRow> {
    if table.is_empty() {
        return Vec::new();
    }

    let header_index = find_header_row(table);
    let headers: Vec<String> = table[header_index]
        .iter()
        .map(|cell| cell.to_field())
        .collect();
    let map = detect_columns(&headers);

    let mut rows = Vec::new();
    let mut discarded = 0usize;

    for raw in table.iter().skip(header_index + 1) {
        if raw.iter().all(Cell::is_empty) {
            continue;
        }

        let date = field_at(raw, map.date);
        let value = map
            .amount
            .and_then(|i| raw.get(i))
            .map(parse_amount)
            .unwrap_or(0.0);
        // fallback applies only when the file has no description column at
        // all; an empty cell under a real description column stays empty
        let description = match map.description {
            Some(i) => field_at(raw, Some(i)),
            None => longest_text_cell(raw),
        };
        let category = optional_field_at(raw, map.category);
        let bank = optional_field_at(raw, map.bank);

        // admission filter: some identity (description or date) and a
        // non-zero amount, or the row carries no transaction signal
        if (description.is_empty() && date.is_empty()) || value == 0.0 {
            discarded += 1;
            continue;
        }

        rows.push(ParsedStatementRow {
            date,
            description,
            amount: value,
            category,
            bank,
        });
    }

    debug!(
        "Normalized {} statement rows ({} discarded)",
        rows.len(),
        discarded
    );

    rows
}

fn field_at(row: &[Cell], index: Option<usize>) -> String {
    index
        .and_then(|i| row.get(i))
        .map(Cell::to_field)
        .unwrap_or_default()
}

fn optional_field_at(row: &[Cell], index: Option<usize>) -> Option<String> {
    let value = field_at(row, index);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Parse a raw statement date, day-first
///
/// Statement dates arrive in whatever format the bank chose; day-first
/// formats are tried before ISO. Day/month-only dates ("10/05") borrow the
/// reference month's year — the reference is an explicit parameter so
/// nothing here reads the wall clock.
pub fn parse_row_date(raw: &str, reference: MonthRef) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let formats = [
        "%d/%m/%Y", // 02/05/2024
        "%d/%m/%y", // 02/05/24
        "%Y-%m-%d", // 2024-05-02
        "%d-%m-%Y", // 02-05-2024
        "%d.%m.%Y", // 02.05.2024
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }

    // day/month without a year
    if let Some((day, month)) = raw.split_once('/') {
        if let (Ok(day), Ok(month)) = (day.trim().parse::<u32>(), month.trim().parse::<u32>()) {
            return NaiveDate::from_ymd_opt(reference.year, month, day);
        }
    }

    None
}

/// Build the persistable transaction for one normalized, categorized row
///
/// The signed statement amount splits into a direction and a magnitude.
/// Rows whose date cannot be parsed fall back to the 1st of the reference
/// month rather than being dropped — they passed admission, so they carry
/// real money. The origin hash covers the raw row, making re-imports of the
/// same file no-ops at the persistence layer.
pub fn to_transaction(
    row: &ParsedStatementRow,
    assignment: &RowCategorization,
    reference: MonthRef,
) -> NewTransaction {
    let date = parse_row_date(&row.date, reference).unwrap_or_else(|| reference.clamped_day(1));

    NewTransaction {
        amount: row.amount.abs(),
        description: row.description.clone(),
        category: Some(assignment.category.clone()),
        tx_type: assignment.tx_type,
        transaction_category: match assignment.tx_type {
            TransactionType::Income => TransactionCategory::Income,
            TransactionType::Expense => TransactionCategory::Variable,
        },
        date,
        is_recurring: false,
        recurring_id: None,
        is_paid: false,
        paid_date: None,
        origin_hash: origin_hash(&[
            "statement",
            &row.date,
            &row.description,
            &row.amount.to_string(),
        ]),
    }
}

/// Fallback description: the longest string cell in the row, when it says
/// more than a stray token (length > 3)
fn longest_text_cell(row: &[Cell]) -> String {
    row.iter()
        .filter_map(Cell::as_text)
        .map(str::trim)
        .filter(|s| s.len() > 3)
        .max_by_key(|s| s.len())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(cells: &[&str]) -> Vec<Cell> {
        cells
            .iter()
            .map(|s| {
                if s.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(s.to_string())
                }
            })
            .collect()
    }

    #[test]
    fn test_normalize_basic_statement() {
        let table = vec![
            text_row(&["Data", "Descrição", "Valor"]),
            text_row(&["02/05/2024", "Supermercado Pão", "-152,30"]),
            text_row(&["05/05/2024", "Pix recebido", "300,00"]),
        ];

        let rows = normalize(&table);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].description, "Supermercado Pão");
        assert_eq!(rows[0].amount, -152.30);
        assert_eq!(rows[1].amount, 300.00);
        assert_eq!(rows[0].date, "02/05/2024");
    }

    #[test]
    fn test_normalize_skips_banner_rows() {
        let table = vec![
            text_row(&["Banco XYZ", "", ""]),
            text_row(&["Relatório mensal"]),
            text_row(&["Data", "Descrição", "Valor"]),
            text_row(&["10/05/2024", "Farmácia", "-42,00"]),
        ];

        let rows = normalize(&table);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Farmácia");
    }

    #[test]
    fn test_admission_filter() {
        let table = vec![
            text_row(&["Data", "Descrição", "Valor"]),
            // no description, but a date and a non-zero amount: kept
            text_row(&["10/05", "", "42"]),
            // a description but zero amount (subtotal-style row): dropped
            text_row(&["", "Taxa", "0"]),
            // entirely empty: dropped
            text_row(&["", "", ""]),
        ];

        let rows = normalize(&table);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, "10/05");
        assert_eq!(rows[0].amount, 42.0);
    }

    #[test]
    fn test_description_falls_back_to_longest_text() {
        // no header matches a description token, so each row falls back to
        // its longest string cell
        let table = vec![
            text_row(&["Data", "Valor", "Obs1", "Obs2"]),
            text_row(&["10/05/2024", "-15,00", "Uber", "Corrida até o centro"]),
        ];

        let rows = normalize(&table);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Corrida até o centro");
    }

    #[test]
    fn test_category_and_bank_captured() {
        let table = vec![
            text_row(&["Data", "Descrição", "Valor", "Categoria", "Banco"]),
            text_row(&["01/05/2024", "Cinema", "-30,00", "Lazer", "Nubank"]),
        ];

        let rows = normalize(&table);

        assert_eq!(rows[0].category.as_deref(), Some("Lazer"));
        assert_eq!(rows[0].bank.as_deref(), Some("Nubank"));
    }

    #[test]
    fn test_numeric_cells() {
        let table = vec![
            text_row(&["Data", "Descrição", "Valor"]),
            vec![
                Cell::Text("03/05/2024".to_string()),
                Cell::Text("Estacionamento".to_string()),
                Cell::Number(-8.5),
            ],
        ];

        let rows = normalize(&table);

        assert_eq!(rows[0].amount, -8.5);
    }

    #[test]
    fn test_zero_signal_yields_empty_not_error() {
        let table = vec![
            text_row(&["Data", "Descrição", "Valor"]),
            text_row(&["", "Saldo anterior", "0"]),
            text_row(&["", "Saldo final", "0"]),
        ];

        assert!(normalize(&table).is_empty());
    }

    #[test]
    fn test_empty_table() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn test_parse_row_date() {
        use crate::models::MonthRef;
        use chrono::NaiveDate;

        let reference = MonthRef::new(2024, 5);
        assert_eq!(
            parse_row_date("02/05/2024", reference),
            NaiveDate::from_ymd_opt(2024, 5, 2)
        );
        assert_eq!(
            parse_row_date("2024-05-02", reference),
            NaiveDate::from_ymd_opt(2024, 5, 2)
        );
        // day/month only borrows the reference year
        assert_eq!(
            parse_row_date("10/05", reference),
            NaiveDate::from_ymd_opt(2024, 5, 10)
        );
        assert_eq!(parse_row_date("", reference), None);
        assert_eq!(parse_row_date("não é data", reference), None);
    }

    #[test]
    fn test_to_transaction_splits_sign_and_magnitude() {
        use crate::models::{MonthRef, TransactionType};

        let row = ParsedStatementRow {
            date: "02/05/2024".to_string(),
            description: "Mercado".to_string(),
            amount: -152.30,
            category: None,
            bank: None,
        };
        let assignment = RowCategorization {
            category: "Mercado".to_string(),
            tx_type: TransactionType::Expense,
        };

        let tx = to_transaction(&row, &assignment, MonthRef::new(2024, 5));

        assert_eq!(tx.amount, 152.30);
        assert_eq!(tx.tx_type, TransactionType::Expense);
        assert_eq!(
            tx.date,
            chrono::NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
        );
        assert!(!tx.is_recurring);

        // same raw row always hashes the same, so re-imports dedupe
        let again = to_transaction(&row, &assignment, MonthRef::new(2024, 5));
        assert_eq!(tx.origin_hash, again.origin_hash);
    }

    #[test]
    fn test_to_transaction_unparsable_date_falls_back() {
        use crate::models::{MonthRef, TransactionType};

        let row = ParsedStatementRow {
            date: "???".to_string(),
            description: "Ajuste".to_string(),
            amount: 10.0,
            category: None,
            bank: None,
        };
        let assignment = RowCategorization {
            category: "Outros".to_string(),
            tx_type: TransactionType::Income,
        };

        let tx = to_transaction(&row, &assignment, MonthRef::new(2024, 7));
        assert_eq!(
            tx.date,
            chrono::NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
        );
    }

    #[test]
    fn test_row_order_preserved() {
        let table = vec![
            text_row(&["Data", "Descrição", "Valor"]),
            text_row(&["01/05", "Primeiro", "-1,00"]),
            text_row(&["02/05", "Segundo", "-2,00"]),
            text_row(&["03/05", "Terceiro", "-3,00"]),
        ];

        let rows = normalize(&table);

        let names: Vec<&str> = rows.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(names, vec!["Primeiro", "Segundo", "Terceiro"]);
    }
}
