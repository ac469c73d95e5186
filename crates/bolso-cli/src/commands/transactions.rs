//! Transaction command implementations

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};

use bolso_core::db::Database;
use bolso_core::models::{NewTransaction, TransactionType};
use bolso_core::TransactionInsertResult;

pub fn cmd_transactions_list(db: &Database, limit: i64) -> Result<()> {
    let transactions = db.list_transactions(limit, 0)?;

    if transactions.is_empty() {
        println!("No transactions yet. Try 'bolso import' or 'bolso transactions add'.");
        return Ok(());
    }

    for tx in &transactions {
        let sign = match tx.tx_type {
            TransactionType::Income => '+',
            TransactionType::Expense => '-',
        };
        let paid = if tx.is_paid { " ✓pago" } else { "" };
        let recurring = if tx.is_recurring { " ↻" } else { "" };
        println!(
            "{:>5}  {}  {}R$ {:>10.2}  {:<12}  {}{}{}",
            tx.id,
            tx.date,
            sign,
            tx.amount,
            tx.category.as_deref().unwrap_or("-"),
            tx.description,
            recurring,
            paid,
        );
    }

    Ok(())
}

pub fn cmd_transactions_add(
    db: &Database,
    description: &str,
    amount: f64,
    kind: &str,
    category: Option<String>,
    date: Option<&str>,
) -> Result<()> {
    if amount < 0.0 {
        anyhow::bail!("Amount must be a non-negative magnitude; use --kind for direction");
    }

    let tx_type: TransactionType = kind
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("Use --kind income or --kind expense")?;

    let date = match date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("Invalid date {} (use YYYY-MM-DD)", raw))?,
        None => Utc::now().date_naive(),
    };

    // wall-clock nonce keeps repeated identical entries distinct
    let nonce = Utc::now().timestamp_nanos_opt().unwrap_or_default().to_string();
    let tx = NewTransaction::manual(description, amount, category, tx_type, date, &nonce);

    match db.insert_transaction(&tx)? {
        TransactionInsertResult::Inserted(id) => {
            println!("✅ Added transaction #{}: {} ({})", id, description, date)
        }
        TransactionInsertResult::Duplicate(id) => {
            println!("⏭️  Already recorded as transaction #{}", id)
        }
    }

    Ok(())
}

pub fn cmd_transactions_pay(db: &Database, id: i64, undo: bool) -> Result<()> {
    let paid_date = if undo {
        None
    } else {
        Some(Utc::now().date_naive())
    };
    db.set_transaction_paid(id, !undo, paid_date)?;

    if undo {
        println!("↩️  Transaction #{} marked unpaid", id);
    } else {
        println!("✅ Transaction #{} marked paid", id);
    }
    Ok(())
}

pub fn cmd_transactions_delete(db: &Database, id: i64) -> Result<()> {
    db.delete_transaction(id)?;
    println!("🗑️  Transaction #{} deleted", id);
    Ok(())
}

pub fn cmd_installment(
    db: &Database,
    description: &str,
    total: f64,
    count: u32,
    start: &str,
    day: u32,
    category: Option<String>,
) -> Result<()> {
    if count == 0 {
        anyhow::bail!("Installment count must be at least 1");
    }

    let first_month = super::parse_month_arg(Some(start))?;
    let siblings = bolso_core::installments::plan(
        description,
        total,
        count,
        first_month,
        day,
        category,
    );

    let ids = db.insert_installments(&siblings)?;

    println!(
        "✅ Registered {} in {} installments starting {}",
        description, count, first_month
    );
    for (sibling, id) in siblings.iter().zip(&ids) {
        println!("   #{:<5} {}  R$ {:>10.2}", id, sibling.date, sibling.amount);
    }

    Ok(())
}
