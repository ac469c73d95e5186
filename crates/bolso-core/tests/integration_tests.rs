//! Integration tests for bolso-core
//!
//! These tests exercise the full statement import → categorize → persist
//! workflow and the materialize → report workflow end to end.

use std::io::Cursor;

use chrono::NaiveDate;

use bolso_core::{
    ai::{CategorizerBackend, MockBackend},
    db::{Database, TransactionInsertResult},
    ingest::read_delimited,
    models::{MonthRef, NewRecurringTemplate},
    recurring::materialize_month,
    statement::{normalize, to_transaction},
    TransactionType,
};

/// A Brazilian-style statement export: banner rows above the header,
/// semicolon delimiter, comma decimals, and a zero-amount footer row.
fn sample_statement() -> &'static str {
    "Banco XYZ;;\n\
     Extrato Mensal;;\n\
     Data;Descrição;Valor\n\
     02/05/2024;Supermercado Boa Compra;-230,40\n\
     05/05/2024;UBER *TRIP;-18,90\n\
     07/05/2024;Pix recebido - João;150,00\n\
     ;Saldo final;0\n"
}

#[tokio::test]
async fn test_full_import_workflow() {
    let db = Database::in_memory().expect("Failed to create test database");
    let reference = MonthRef::new(2024, 5);

    // decode → normalize
    let table = read_delimited(Cursor::new(sample_statement())).expect("Failed to decode");
    let rows = normalize(&table);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].description, "Supermercado Boa Compra");
    assert_eq!(rows[0].amount, -230.40);

    // categorize through the oracle
    let categorizer = MockBackend::new();
    let assignments = categorizer
        .categorize_rows(&rows, &[])
        .await
        .expect("Categorization failed");
    assert_eq!(assignments.len(), rows.len());
    assert_eq!(assignments[0].category, "Mercado");
    assert_eq!(assignments[2].tx_type, TransactionType::Income);

    // persist; sign becomes direction, magnitude becomes amount
    let mut imported = 0;
    for (row, assignment) in rows.iter().zip(&assignments) {
        let tx = to_transaction(row, assignment, reference);
        if let TransactionInsertResult::Inserted(_) = db.insert_transaction(&tx).unwrap() {
            imported += 1;
        }
    }
    assert_eq!(imported, 3);

    let stored = db.list_transactions(100, 0).unwrap();
    let income = stored
        .iter()
        .find(|tx| tx.tx_type == TransactionType::Income)
        .unwrap();
    assert_eq!(income.amount, 150.0);
    assert_eq!(income.date, NaiveDate::from_ymd_opt(2024, 5, 7).unwrap());

    // re-importing the same file is a no-op
    let mut duplicates = 0;
    for (row, assignment) in rows.iter().zip(&assignments) {
        let tx = to_transaction(row, assignment, reference);
        if let TransactionInsertResult::Duplicate(_) = db.insert_transaction(&tx).unwrap() {
            duplicates += 1;
        }
    }
    assert_eq!(duplicates, 3);
    assert_eq!(db.list_transactions(100, 0).unwrap().len(), 3);
}

#[test]
fn test_materialize_and_report_workflow() {
    let db = Database::in_memory().expect("Failed to create test database");

    let rent_id = db
        .create_template(&NewRecurringTemplate {
            name: "Aluguel".to_string(),
            amount: 1500.0,
            category: Some("Moradia".to_string()),
            tx_type: TransactionType::Expense,
            day_of_month: 31,
        })
        .unwrap();
    db.create_template(&NewRecurringTemplate {
        name: "Salário".to_string(),
        amount: 6000.0,
        category: Some("Renda".to_string()),
        tx_type: TransactionType::Income,
        day_of_month: 5,
    })
    .unwrap();

    let month = MonthRef::new(2024, 2); // leap February
    let templates = db.list_templates().unwrap();

    // first pass materializes both templates; each persists independently
    let new = materialize_month(&templates, &db.all_transactions().unwrap(), month);
    assert_eq!(new.len(), 2);
    for tx in &new {
        db.insert_transaction(tx).unwrap();
    }

    let in_month = db.transactions_for_month(month).unwrap();
    assert_eq!(in_month.len(), 2);
    let rent = in_month
        .iter()
        .find(|tx| tx.recurring_id == Some(rent_id))
        .unwrap();
    assert_eq!(rent.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    assert!(rent.is_recurring);
    assert!(!rent.is_paid);

    // second pass sees the persisted month and produces nothing
    let again = materialize_month(&templates, &db.all_transactions().unwrap(), month);
    assert!(again.is_empty());

    // budget report over the materialized month
    db.upsert_budget_goal("Moradia", 30.0).unwrap();
    let report = bolso_core::budget::monthly_report(
        &db.all_transactions().unwrap(),
        &db.list_budget_goals().unwrap(),
        month,
    );
    assert_eq!(report.income_total, 6000.0);
    assert_eq!(report.lines[0].target_amount, 1800.0);
    assert_eq!(report.lines[0].actual_amount, 1500.0);
}

#[test]
fn test_statement_with_no_transactions_is_distinct_from_decode_failure() {
    // structurally fine, but only footer rows: empty result, not an error
    let table = read_delimited(Cursor::new(
        "Data;Descrição;Valor\n;Saldo anterior;0\n;Saldo final;0\n",
    ))
    .unwrap();
    assert!(normalize(&table).is_empty());

    // an empty file fails hard at decode
    assert!(read_delimited(Cursor::new("")).is_err());
}
