//! Installment purchase planning
//!
//! One purchase split across N monthly charges becomes N sibling
//! transactions. Planning is pure; the persistence layer stamps the shared
//! group id (the first sibling's row id) when the batch is inserted.

use crate::models::{origin_hash, MonthRef, NewTransaction, TransactionCategory, TransactionType};

/// Split one purchase into monthly installment transactions
///
/// Amounts are split in whole cents with the remainder on the first
/// installment, so the siblings always sum to `total`. Each sibling is
/// dated at `day` within its month, clamped like a recurring bill, and
/// described as `"{description} (k/n)"`.
pub fn plan(
    description: &str,
    total: f64,
    count: u32,
    first_month: MonthRef,
    day: u32,
    category: Option<String>,
) -> Vec<NewTransaction> {
    if count == 0 {
        return Vec::new();
    }

    let total_cents = (total * 100.0).round() as i64;
    let base_cents = total_cents / count as i64;
    let remainder_cents = total_cents - base_cents * count as i64;

    let mut month = first_month;
    let mut siblings = Vec::with_capacity(count as usize);

    for k in 0..count {
        let cents = if k == 0 {
            base_cents + remainder_cents
        } else {
            base_cents
        };

        let label = format!("{} ({}/{})", description, k + 1, count);
        siblings.push(NewTransaction {
            amount: cents as f64 / 100.0,
            description: label,
            category: category.clone(),
            tx_type: TransactionType::Expense,
            transaction_category: TransactionCategory::Installment,
            date: month.clamped_day(day),
            is_recurring: false,
            recurring_id: None,
            is_paid: false,
            paid_date: None,
            origin_hash: origin_hash(&[
                "installment",
                description,
                &total_cents.to_string(),
                &count.to_string(),
                &first_month.to_string(),
                &k.to_string(),
            ]),
        });

        month = month.next();
    }

    siblings
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_amounts_sum_to_total() {
        // 100.00 / 3 doesn't divide evenly; the first sibling absorbs the
        // remainder
        let siblings = plan("Notebook", 100.0, 3, MonthRef::new(2024, 1), 10, None);

        assert_eq!(siblings.len(), 3);
        assert_eq!(siblings[0].amount, 33.34);
        assert_eq!(siblings[1].amount, 33.33);
        assert_eq!(siblings[2].amount, 33.33);

        let sum: f64 = siblings.iter().map(|s| s.amount).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_descriptions_and_dates() {
        let siblings = plan(
            "Geladeira",
            1200.0,
            2,
            MonthRef::new(2024, 12),
            15,
            Some("Casa".to_string()),
        );

        assert_eq!(siblings[0].description, "Geladeira (1/2)");
        assert_eq!(siblings[1].description, "Geladeira (2/2)");
        assert_eq!(
            siblings[0].date,
            NaiveDate::from_ymd_opt(2024, 12, 15).unwrap()
        );
        // wraps across the year boundary
        assert_eq!(
            siblings[1].date,
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
        );
        assert!(siblings
            .iter()
            .all(|s| s.transaction_category == TransactionCategory::Installment));
    }

    #[test]
    fn test_day_31_clamps_per_month() {
        let siblings = plan("Sofá", 300.0, 3, MonthRef::new(2024, 1), 31, None);

        assert_eq!(
            siblings[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
        assert_eq!(
            siblings[1].date,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            siblings[2].date,
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
        );
    }

    #[test]
    fn test_distinct_hashes_per_sibling() {
        let siblings = plan("TV", 900.0, 3, MonthRef::new(2024, 5), 1, None);
        assert_ne!(siblings[0].origin_hash, siblings[1].origin_hash);
        assert_ne!(siblings[1].origin_hash, siblings[2].origin_hash);
    }

    #[test]
    fn test_zero_count() {
        assert!(plan("Nada", 10.0, 0, MonthRef::new(2024, 1), 1, None).is_empty());
    }
}
