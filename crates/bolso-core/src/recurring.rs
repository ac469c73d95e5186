//! Recurring bill materialization
//!
//! Turns monthly templates into concrete transactions for a target month.
//! The check for "already materialized" is calendar-based (an existing
//! transaction referencing the template and dated inside the month), never a
//! stored pointer, so running the function repeatedly in one session is a
//! no-op after the first pass.

use tracing::debug;

use crate::models::{
    origin_hash, MonthRef, NewTransaction, RecurringTemplate, Transaction, TransactionCategory,
    TransactionType,
};

/// Produce the transactions still missing for `month`
///
/// For each template, scans `existing` for a transaction with a matching
/// `recurring_id` dated inside the target month; templates already covered
/// are skipped. The synthesized date is the template's nominal day clamped
/// to the month's last valid day (a day-31 template lands on April 30, and
/// on February 28 or 29 depending on the year).
///
/// Persistence is the caller's job and must treat each returned transaction
/// as an independent unit of work — one failed write must not block or roll
/// back its siblings.
pub fn materialize_month(
    templates: &[RecurringTemplate],
    existing: &[Transaction],
    month: MonthRef,
) -> Vec<NewTransaction> {
    let mut synthesized = Vec::new();

    for template in templates {
        let already_present = existing.iter().any(|tx| {
            tx.recurring_id == Some(template.id) && month.contains(tx.date)
        });
        if already_present {
            continue;
        }

        synthesized.push(materialize_one(template, month));
    }

    debug!(
        "Materialized {} of {} templates for {}",
        synthesized.len(),
        templates.len(),
        month
    );

    synthesized
}

/// Synthesize the transaction for one template in one month
fn materialize_one(template: &RecurringTemplate, month: MonthRef) -> NewTransaction {
    let transaction_category = match template.tx_type {
        TransactionType::Income => TransactionCategory::Income,
        TransactionType::Expense => TransactionCategory::Fixed,
    };

    NewTransaction {
        amount: template.amount,
        description: template.name.clone(),
        category: template.category.clone(),
        tx_type: template.tx_type,
        transaction_category,
        date: month.clamped_day(template.day_of_month),
        is_recurring: true,
        recurring_id: Some(template.id),
        is_paid: false,
        paid_date: None,
        origin_hash: origin_hash(&[
            "recurring",
            &template.id.to_string(),
            &month.to_string(),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn template(id: i64, name: &str, day_of_month: u32) -> RecurringTemplate {
        RecurringTemplate {
            id,
            name: name.to_string(),
            amount: 100.0,
            category: Some("Moradia".to_string()),
            tx_type: TransactionType::Expense,
            day_of_month,
            created_at: Utc::now(),
        }
    }

    fn as_persisted(id: i64, new: &NewTransaction) -> Transaction {
        Transaction {
            id,
            amount: new.amount,
            description: new.description.clone(),
            category: new.category.clone(),
            tx_type: new.tx_type,
            transaction_category: new.transaction_category,
            date: new.date,
            is_recurring: new.is_recurring,
            recurring_id: new.recurring_id,
            is_paid: new.is_paid,
            paid_date: new.paid_date,
            installment_group_id: None,
            origin_hash: new.origin_hash.clone(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_materializes_one_per_template() {
        let templates = vec![template(1, "Aluguel", 5), template(2, "Internet", 10)];

        let new = materialize_month(&templates, &[], MonthRef::new(2024, 6));

        assert_eq!(new.len(), 2);
        assert_eq!(new[0].recurring_id, Some(1));
        assert_eq!(new[1].recurring_id, Some(2));
        for tx in &new {
            assert!(tx.is_recurring);
            assert!(!tx.is_paid);
            assert_eq!(tx.transaction_category, TransactionCategory::Fixed);
        }
    }

    #[test]
    fn test_idempotent_within_month() {
        let templates = vec![template(1, "Aluguel", 5), template(2, "Internet", 10)];
        let month = MonthRef::new(2024, 6);

        let first = materialize_month(&templates, &[], month);
        assert_eq!(first.len(), 2);

        let persisted: Vec<Transaction> = first
            .iter()
            .enumerate()
            .map(|(i, tx)| as_persisted(i as i64 + 1, tx))
            .collect();

        let second = materialize_month(&templates, &persisted, month);
        assert!(second.is_empty());
    }

    #[test]
    fn test_same_template_different_month_is_fresh() {
        let templates = vec![template(1, "Aluguel", 5)];

        let june = materialize_month(&templates, &[], MonthRef::new(2024, 6));
        let persisted = vec![as_persisted(1, &june[0])];

        let july = materialize_month(&templates, &persisted, MonthRef::new(2024, 7));
        assert_eq!(july.len(), 1);
        assert_eq!(
            july[0].date,
            NaiveDate::from_ymd_opt(2024, 7, 5).unwrap()
        );
    }

    #[test]
    fn test_day_31_clamps_to_short_months() {
        let templates = vec![template(1, "Cartão", 31)];

        let april = materialize_month(&templates, &[], MonthRef::new(2024, 4));
        assert_eq!(
            april[0].date,
            NaiveDate::from_ymd_opt(2024, 4, 30).unwrap()
        );

        let feb_leap = materialize_month(&templates, &[], MonthRef::new(2024, 2));
        assert_eq!(
            feb_leap[0].date,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );

        let feb = materialize_month(&templates, &[], MonthRef::new(2023, 2));
        assert_eq!(feb[0].date, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
    }

    #[test]
    fn test_out_of_range_day_never_errors() {
        // corrupt upstream data: clamp, don't panic
        let templates = vec![template(1, "Zoado", 99)];
        let new = materialize_month(&templates, &[], MonthRef::new(2024, 2));
        assert_eq!(new[0].date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_income_template_lands_in_income_bucket() {
        let mut salary = template(1, "Salário", 1);
        salary.tx_type = TransactionType::Income;
        salary.amount = 7000.0;

        let new = materialize_month(&[salary], &[], MonthRef::new(2024, 3));
        assert_eq!(new[0].tx_type, TransactionType::Income);
        assert_eq!(new[0].transaction_category, TransactionCategory::Income);
    }

    #[test]
    fn test_unrelated_transactions_do_not_mask() {
        // a transaction in the month that references a different template
        // must not suppress materialization
        let templates = vec![template(1, "Aluguel", 5)];
        let other = materialize_month(&[template(9, "Luz", 5)], &[], MonthRef::new(2024, 6));
        let persisted = vec![as_persisted(1, &other[0])];

        let new = materialize_month(&templates, &persisted, MonthRef::new(2024, 6));
        assert_eq!(new.len(), 1);
        assert_eq!(new[0].recurring_id, Some(1));
    }

    #[test]
    fn test_rent_for_leap_february() {
        let rent = RecurringTemplate {
            id: 1,
            name: "Aluguel".to_string(),
            amount: 1500.0,
            category: Some("Moradia".to_string()),
            tx_type: TransactionType::Expense,
            day_of_month: 31,
            created_at: Utc::now(),
        };

        let new = materialize_month(&[rent], &[], MonthRef::new(2024, 2));

        assert_eq!(new.len(), 1);
        assert_eq!(new[0].date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(new[0].amount, 1500.0);
        assert_eq!(new[0].description, "Aluguel");
        assert_eq!(new[0].transaction_category, TransactionCategory::Fixed);
        assert!(!new[0].is_paid);
    }
}
