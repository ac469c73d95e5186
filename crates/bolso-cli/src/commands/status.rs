//! Init and status command implementations

use std::path::Path;

use anyhow::Result;

use super::open_db;

pub fn cmd_init(db_path: &Path) -> Result<()> {
    let db = open_db(db_path)?;
    println!("✅ Database initialized at {}", db.path());
    Ok(())
}

pub fn cmd_status(db_path: &Path) -> Result<()> {
    let db = open_db(db_path)?;

    let transactions = db.list_transactions(i64::MAX, 0)?;
    let templates = db.list_templates()?;
    let goals = db.list_budget_goals()?;

    println!("📂 Database: {}", db.path());
    println!("   Transactions: {}", transactions.len());
    println!("   Recurring templates: {}", templates.len());
    println!("   Budget goals: {}", goals.len());

    Ok(())
}
