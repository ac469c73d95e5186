//! Recurring template command implementations

use anyhow::{Context, Result};
use tracing::warn;

use bolso_core::db::Database;
use bolso_core::models::{NewRecurringTemplate, TransactionType};
use bolso_core::recurring::materialize_month;
use bolso_core::TransactionInsertResult;

use super::parse_month_arg;

pub fn cmd_recurring_list(db: &Database) -> Result<()> {
    let templates = db.list_templates()?;

    if templates.is_empty() {
        println!("No recurring templates yet. Try 'bolso recurring add'.");
        return Ok(());
    }

    for template in &templates {
        println!(
            "{:>5}  dia {:>2}  {}  R$ {:>10.2}  {:<12}  {}",
            template.id,
            template.day_of_month,
            template.tx_type,
            template.amount,
            template.category.as_deref().unwrap_or("-"),
            template.name,
        );
    }

    Ok(())
}

pub fn cmd_recurring_add(
    db: &Database,
    name: &str,
    amount: f64,
    day: u32,
    kind: &str,
    category: Option<String>,
) -> Result<()> {
    if amount < 0.0 {
        anyhow::bail!("Amount must be non-negative");
    }
    if day < 1 {
        anyhow::bail!("Day of month must be at least 1");
    }

    let tx_type: TransactionType = kind
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("Use --kind income or --kind expense")?;

    let id = db.create_template(&NewRecurringTemplate {
        name: name.to_string(),
        amount,
        category,
        tx_type,
        day_of_month: day,
    })?;

    println!("✅ Added recurring template #{}: {} (day {})", id, name, day);
    Ok(())
}

pub fn cmd_recurring_remove(db: &Database, id: i64) -> Result<()> {
    let cascaded = db.delete_template(id)?;
    println!(
        "🗑️  Template #{} removed along with {} materialized transaction(s)",
        id, cascaded
    );
    Ok(())
}

pub fn cmd_recurring_materialize(db: &Database, month: Option<&str>) -> Result<()> {
    let month = parse_month_arg(month)?;

    let templates = db.list_templates()?;
    if templates.is_empty() {
        println!("No recurring templates to materialize.");
        return Ok(());
    }

    let existing = db.all_transactions()?;
    let new = materialize_month(&templates, &existing, month);

    if new.is_empty() {
        println!("✅ {} is already up to date ({} templates)", month, templates.len());
        return Ok(());
    }

    // each synthesized transaction is its own unit of work: a failed write
    // is reported and does not block the others
    let mut persisted = 0;
    let mut failed = 0;
    for tx in &new {
        match db.insert_transaction(tx) {
            Ok(TransactionInsertResult::Inserted(_))
            | Ok(TransactionInsertResult::Duplicate(_)) => persisted += 1,
            Err(e) => {
                warn!("Failed to persist {}: {}", tx.description, e);
                failed += 1;
            }
        }
    }

    println!("✅ Materialized {} bill(s) for {}", persisted, month);
    for tx in &new {
        println!("   {}  R$ {:>10.2}  {}", tx.date, tx.amount, tx.description);
    }
    if failed > 0 {
        println!("⚠️  {} transaction(s) failed to persist; run again to retry", failed);
    }

    Ok(())
}
