//! Budget-vs-actual reporting
//!
//! Pure computation over in-memory transaction and goal lists for one
//! calendar month. Targets are a percentage share of the month's income,
//! so the same goals adapt as income changes.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{BudgetGoal, MonthRef, Transaction, TransactionType};

/// Budget-vs-actual for one category
#[derive(Debug, Clone, Serialize)]
pub struct BudgetLine {
    pub category: String,
    pub target_percentage: f64,
    /// target_percentage of the month's income
    pub target_amount: f64,
    pub actual_amount: f64,
    /// Positive = under budget, negative = overspent
    pub remaining: f64,
}

/// Monthly budget report
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyBudgetReport {
    pub month: MonthRef,
    pub income_total: f64,
    pub expense_total: f64,
    pub lines: Vec<BudgetLine>,
    /// Spend in categories without a goal (including uncategorized)
    pub unbudgeted: f64,
}

/// Compute budget-vs-actual for `month`
///
/// Transactions outside the month are ignored, so callers can pass the full
/// ledger. Goal order is preserved from the input.
pub fn monthly_report(
    transactions: &[Transaction],
    goals: &[BudgetGoal],
    month: MonthRef,
) -> MonthlyBudgetReport {
    let in_month: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| month.contains(tx.date))
        .collect();

    let income_total: f64 = in_month
        .iter()
        .filter(|tx| tx.tx_type == TransactionType::Income)
        .map(|tx| tx.amount)
        .sum();

    // expense magnitude per category label
    let mut spend_by_category: BTreeMap<&str, f64> = BTreeMap::new();
    let mut expense_total = 0.0;
    for tx in &in_month {
        if tx.tx_type != TransactionType::Expense {
            continue;
        }
        expense_total += tx.amount;
        let label = tx.category.as_deref().unwrap_or("");
        *spend_by_category.entry(label).or_default() += tx.amount;
    }

    let mut budgeted = 0.0;
    let lines: Vec<BudgetLine> = goals
        .iter()
        .map(|goal| {
            let actual = spend_by_category
                .get(goal.category.as_str())
                .copied()
                .unwrap_or(0.0);
            budgeted += actual;
            let target = income_total * goal.target_percentage / 100.0;
            BudgetLine {
                category: goal.category.clone(),
                target_percentage: goal.target_percentage,
                target_amount: target,
                actual_amount: actual,
                remaining: target - actual,
            }
        })
        .collect();

    MonthlyBudgetReport {
        month,
        income_total,
        expense_total,
        lines,
        unbudgeted: expense_total - budgeted,
    }
}
