//! Statement header and column detection
//!
//! Bank exports disagree about everything: header row position, column
//! names, language. Field detection runs a prioritized token table against
//! the header set once per file — new bank formats are added by extending
//! the table, not the control flow.

use regex::RegexBuilder;
use tracing::debug;

use super::Cell;

/// Statement fields a column can be matched to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementField {
    Date,
    Amount,
    Description,
    Bank,
    Category,
}

/// Column-name token table, ordered by evaluation priority
///
/// Case-insensitive substring semantics; the first (leftmost) column whose
/// name matches wins the field. Portuguese tokens cover the common Brazilian
/// bank exports, English tokens the international ones.
const FIELD_PATTERNS: &[(StatementField, &str)] = &[
    (
        StatementField::Date,
        r"data|date|dt|lançamento|transação|movimento|vencimento",
    ),
    (
        StatementField::Amount,
        r"valor|value|amount|quantia|importância|saldo|credito|debito|crédito|débito|r\$|reais|montante",
    ),
    (
        StatementField::Description,
        r"descri|description|memo|histórico|detalhe|observ|lançamento|nome|titulo|origem|destino|favorecido|pagador|estabelecimento",
    ),
    (StatementField::Bank, r"banco|bank|instituição|conta"),
    (
        StatementField::Category,
        r"categoria|category|tipo|natureza|classificação",
    ),
];

/// Number of leading rows inspected when hunting for the header row
const HEADER_SCAN_WINDOW: usize = 20;

/// Column indices resolved for one statement file
#[derive(Debug, Default, Clone)]
pub struct ColumnMap {
    pub date: Option<usize>,
    pub amount: Option<usize>,
    pub description: Option<usize>,
    pub bank: Option<usize>,
    pub category: Option<usize>,
}

/// Find the header row within the first [`HEADER_SCAN_WINDOW`] rows
///
/// A row qualifies when its concatenated lower-cased text carries a date
/// token together with an amount or description token, or a
/// transaction+amount token pair. Banner/title rows above the real header
/// fail the test and are skipped; if nothing qualifies, row 0 is assumed.
pub fn find_header_row(table: &[Vec<Cell>]) -> usize {
    for (index, row) in table.iter().take(HEADER_SCAN_WINDOW).enumerate() {
        let joined = row
            .iter()
            .filter_map(Cell::as_text)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        let has_date = joined.contains("data") || joined.contains("date");
        let has_amount =
            joined.contains("valor") || joined.contains("amount") || joined.contains("value");
        let has_description = joined.contains("descri");
        let has_transaction = joined.contains("transa") || joined.contains("lançamento");

        if (has_date && (has_amount || has_description)) || (has_transaction && has_amount) {
            debug!("Statement header detected at row {}", index);
            return index;
        }
    }

    0
}

/// Match header names to statement fields
///
/// Evaluated once per file; every row then reads through the resolved
/// indices. A header can satisfy more than one field ("Lançamento" is both
/// a date and a description token) — fields are resolved independently.
pub fn detect_columns(headers: &[String]) -> ColumnMap {
    let mut map = ColumnMap::default();

    for (field, pattern) in FIELD_PATTERNS {
        let re = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .expect("field pattern table is valid");

        let found = headers.iter().position(|h| re.is_match(h));

        match field {
            StatementField::Date => map.date = found,
            StatementField::Amount => map.amount = found,
            StatementField::Description => map.description = found,
            StatementField::Bank => map.bank = found,
            StatementField::Category => map.category = found,
        }
    }

    debug!(?map, "Resolved statement columns");
    map
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

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_header_after_banner_rows() {
        let table = vec![
            text_row(&["Banco XYZ", "", ""]),
            text_row(&["Relatório mensal"]),
            text_row(&["Data", "Descrição", "Valor"]),
            text_row(&["01/05/2024", "Mercado", "-120,50"]),
        ];

        assert_eq!(find_header_row(&table), 2);
    }

    #[test]
    fn test_header_defaults_to_row_zero() {
        let table = vec![
            text_row(&["foo", "bar"]),
            text_row(&["baz", "qux"]),
        ];

        assert_eq!(find_header_row(&table), 0);
    }

    #[test]
    fn test_header_transaction_amount_pair() {
        let table = vec![
            text_row(&["Extrato"]),
            text_row(&["Transação", "Valor"]),
        ];

        assert_eq!(find_header_row(&table), 1);
    }

    #[test]
    fn test_detect_portuguese_columns() {
        let map = detect_columns(&headers(&["Data", "Descrição", "Valor", "Banco"]));

        assert_eq!(map.date, Some(0));
        assert_eq!(map.description, Some(1));
        assert_eq!(map.amount, Some(2));
        assert_eq!(map.bank, Some(3));
        assert_eq!(map.category, None);
    }

    #[test]
    fn test_detect_english_columns() {
        let map = detect_columns(&headers(&["Date", "Description", "Amount", "Category"]));

        assert_eq!(map.date, Some(0));
        assert_eq!(map.description, Some(1));
        assert_eq!(map.amount, Some(2));
        assert_eq!(map.category, Some(3));
    }

    #[test]
    fn test_first_match_wins() {
        // both "Valor" and "Saldo" match the amount tokens; leftmost wins
        let map = detect_columns(&headers(&["Data", "Valor", "Saldo"]));
        assert_eq!(map.amount, Some(1));
    }

    #[test]
    fn test_shared_token_serves_two_fields() {
        // "Lançamento" is simultaneously a date and a description token
        let map = detect_columns(&headers(&["Lançamento", "Valor"]));
        assert_eq!(map.date, Some(0));
        assert_eq!(map.description, Some(0));
    }

    #[test]
    fn test_case_insensitive() {
        let map = detect_columns(&headers(&["DATA", "HISTÓRICO", "VALOR (R$)"]));
        assert_eq!(map.date, Some(0));
        assert_eq!(map.description, Some(1));
        assert_eq!(map.amount, Some(2));
    }
}
