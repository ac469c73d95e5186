//! Statement import command

use std::path::Path;

use anyhow::{Context, Result};

use bolso_core::ai::{fallback_categorization, CategorizerClient};
use bolso_core::statement::{normalize, to_transaction};
use bolso_core::TransactionInsertResult;

use super::{open_db, parse_month_arg};

pub async fn cmd_import(
    db_path: &Path,
    file: &Path,
    month: Option<&str>,
    no_ai: bool,
) -> Result<()> {
    let reference = parse_month_arg(month)?;

    println!("📥 Importing {}...", file.display());

    let table = bolso_core::ingest::read_table(file)
        .with_context(|| format!("Failed to decode statement {}", file.display()))?;
    let rows = normalize(&table);

    if rows.is_empty() {
        println!("🫙 No transactions found in this statement.");
        println!("   The file decoded fine but no row had a date/description and a non-zero value.");
        return Ok(());
    }

    println!("   Found {} transactions", rows.len());

    let db = open_db(db_path)?;

    // categorize through the oracle when one is configured
    let categorizer = if no_ai { None } else { CategorizerClient::from_env() };
    let assignments = match &categorizer {
        Some(client) => {
            println!("🏷️  Categorizing with AI backend...");
            let categories = db.distinct_categories()?;
            match client.categorize_rows(&rows, &categories).await {
                Ok(assignments) => assignments,
                Err(e) => {
                    println!("   ⚠️ Categorization failed ({}), using statement data", e);
                    rows.iter().map(fallback_categorization).collect()
                }
            }
        }
        None => {
            if !no_ai {
                println!("💡 Tip: Set OLLAMA_HOST to enable AI categorization");
            }
            rows.iter().map(fallback_categorization).collect()
        }
    };

    let mut imported = 0;
    let mut skipped = 0;
    for (row, assignment) in rows.iter().zip(&assignments) {
        let tx = to_transaction(row, assignment, reference);
        match db.insert_transaction(&tx)? {
            TransactionInsertResult::Inserted(_) => imported += 1,
            TransactionInsertResult::Duplicate(_) => skipped += 1,
        }
    }

    println!("✅ Import complete!");
    println!("   Imported: {}", imported);
    println!("   Skipped (duplicates): {}", skipped);

    Ok(())
}
