//! Budget command implementations

use anyhow::Result;

use bolso_core::budget::monthly_report;
use bolso_core::db::Database;

use super::parse_month_arg;

pub fn cmd_budget_list(db: &Database) -> Result<()> {
    let goals = db.list_budget_goals()?;

    if goals.is_empty() {
        println!("No budget goals yet. Try 'bolso budget set'.");
        return Ok(());
    }

    for goal in &goals {
        println!("{:<16} {:>5.1}% of income", goal.category, goal.target_percentage);
    }

    Ok(())
}

pub fn cmd_budget_set(db: &Database, category: &str, percent: f64) -> Result<()> {
    if category.trim().is_empty() {
        anyhow::bail!("Category must not be empty");
    }
    if !(0.0..=100.0).contains(&percent) {
        anyhow::bail!("Percentage must be between 0 and 100");
    }

    db.upsert_budget_goal(category.trim(), percent)?;
    println!("✅ Budget for {} set to {:.1}% of income", category.trim(), percent);
    Ok(())
}

pub fn cmd_budget_remove(db: &Database, category: &str) -> Result<()> {
    db.delete_budget_goal(category)?;
    println!("🗑️  Budget goal for {} removed", category);
    Ok(())
}

pub fn cmd_budget_report(db: &Database, month: Option<&str>, json: bool) -> Result<()> {
    let month = parse_month_arg(month)?;

    let transactions = db.transactions_for_month(month)?;
    let goals = db.list_budget_goals()?;
    let report = monthly_report(&transactions, &goals, month);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("📊 Budget report for {}", month);
    println!("   Income:   R$ {:>12.2}", report.income_total);
    println!("   Expenses: R$ {:>12.2}", report.expense_total);
    println!();

    if report.lines.is_empty() {
        println!("   No budget goals set. Try 'bolso budget set'.");
    }
    for line in &report.lines {
        let marker = if line.remaining < 0.0 { "⚠️ " } else { "  " };
        println!(
            "{} {:<16} alvo R$ {:>10.2} ({:>4.1}%)  gasto R$ {:>10.2}  resta R$ {:>10.2}",
            marker,
            line.category,
            line.target_amount,
            line.target_percentage,
            line.actual_amount,
            line.remaining,
        );
    }

    if report.unbudgeted > 0.0 {
        println!();
        println!("   Fora do orçamento: R$ {:>10.2}", report.unbudgeted);
    }

    Ok(())
}
