//! Transaction operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{MonthRef, NewTransaction, Transaction};

/// Result of inserting a transaction
#[derive(Debug, Clone)]
pub enum TransactionInsertResult {
    /// Transaction was inserted, contains new transaction ID
    Inserted(i64),
    /// Transaction was a duplicate (same origin_hash), contains existing ID
    Duplicate(i64),
}

fn map_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get(0)?,
        amount: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        tx_type: row
            .get::<_, String>(4)?
            .parse()
            .unwrap_or(crate::models::TransactionType::Expense),
        transaction_category: row
            .get::<_, String>(5)?
            .parse()
            .unwrap_or(crate::models::TransactionCategory::Variable),
        date: parse_date(&row.get::<_, String>(6)?),
        is_recurring: row.get(7)?,
        recurring_id: row.get(8)?,
        is_paid: row.get(9)?,
        paid_date: row.get::<_, Option<String>>(10)?.map(|s| parse_date(&s)),
        installment_group_id: row.get(11)?,
        origin_hash: row.get(12)?,
        created_at: parse_datetime(&row.get::<_, String>(13)?),
    })
}

const TRANSACTION_COLUMNS: &str = "id, amount, description, category, tx_type, \
     transaction_category, date, is_recurring, recurring_id, is_paid, \
     paid_date, installment_group_id, origin_hash, created_at";

impl Database {
    /// Insert a transaction (idempotent on origin_hash)
    ///
    /// Re-persisting the same logical entry — a second materialization run,
    /// a re-imported statement — reports the existing row instead of
    /// duplicating it.
    pub fn insert_transaction(&self, tx: &NewTransaction) -> Result<TransactionInsertResult> {
        let conn = self.conn()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM transactions WHERE origin_hash = ?",
                params![tx.origin_hash],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(existing_id) = existing {
            return Ok(TransactionInsertResult::Duplicate(existing_id));
        }

        conn.execute(
            r#"
            INSERT INTO transactions
                (amount, description, category, tx_type, transaction_category,
                 date, is_recurring, recurring_id, is_paid, paid_date, origin_hash)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                tx.amount,
                tx.description,
                tx.category,
                tx.tx_type.as_str(),
                tx.transaction_category.as_str(),
                tx.date.to_string(),
                tx.is_recurring,
                tx.recurring_id,
                tx.is_paid,
                tx.paid_date.map(|d| d.to_string()),
                tx.origin_hash,
            ],
        )?;

        Ok(TransactionInsertResult::Inserted(conn.last_insert_rowid()))
    }

    /// Insert installment siblings as one batch sharing a group id
    ///
    /// The group id is the first sibling's row id. Returns the ids of all
    /// inserted siblings.
    pub fn insert_installments(&self, siblings: &[NewTransaction]) -> Result<Vec<i64>> {
        let mut ids = Vec::with_capacity(siblings.len());
        let mut group_id: Option<i64> = None;

        for sibling in siblings {
            let id = match self.insert_transaction(sibling)? {
                TransactionInsertResult::Inserted(id) => id,
                TransactionInsertResult::Duplicate(id) => id,
            };

            let group = *group_id.get_or_insert(id);
            let conn = self.conn()?;
            conn.execute(
                "UPDATE transactions SET installment_group_id = ? WHERE id = ?",
                params![group, id],
            )?;

            ids.push(id);
        }

        Ok(ids)
    }

    /// List all transactions, newest date first
    pub fn list_transactions(&self, limit: i64, offset: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions ORDER BY date DESC, id DESC LIMIT ? OFFSET ?",
            TRANSACTION_COLUMNS
        ))?;

        let rows = stmt.query_map(params![limit, offset], map_transaction)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// All transactions, oldest first (materializer input)
    pub fn all_transactions(&self) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions ORDER BY date ASC, id ASC",
            TRANSACTION_COLUMNS
        ))?;

        let rows = stmt.query_map([], map_transaction)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Transactions dated inside one calendar month
    pub fn transactions_for_month(&self, month: MonthRef) -> Result<Vec<Transaction>> {
        let first = month.first_day();
        let last = month.clamped_day(31);

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE date >= ? AND date <= ? ORDER BY date ASC, id ASC",
            TRANSACTION_COLUMNS
        ))?;

        let rows = stmt.query_map(
            params![first.to_string(), last.to_string()],
            map_transaction,
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Fetch one transaction
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let tx = conn
            .query_row(
                &format!(
                    "SELECT {} FROM transactions WHERE id = ?",
                    TRANSACTION_COLUMNS
                ),
                params![id],
                map_transaction,
            )
            .optional()?;
        Ok(tx)
    }

    /// Mark a transaction paid or unpaid
    ///
    /// `paid_date` is stored when marking paid and cleared when unmarking.
    pub fn set_transaction_paid(
        &self,
        id: i64,
        paid: bool,
        paid_date: Option<NaiveDate>,
    ) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE transactions SET is_paid = ?, paid_date = ? WHERE id = ?",
            params![
                paid,
                if paid {
                    paid_date.map(|d| d.to_string())
                } else {
                    None
                },
                id
            ],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("Transaction {} not found", id)));
        }
        Ok(())
    }

    /// Delete one transaction
    pub fn delete_transaction(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;

        if deleted == 0 {
            return Err(Error::NotFound(format!("Transaction {} not found", id)));
        }
        Ok(())
    }

    /// Delete every sibling of an installment group, returns the count
    pub fn delete_installment_group(&self, group_id: i64) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM transactions WHERE installment_group_id = ?",
            params![group_id],
        )?;
        Ok(deleted)
    }

    /// Distinct category labels in use, for the categorization oracle
    pub fn distinct_categories(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT category FROM transactions \
             WHERE category IS NOT NULL AND category != '' ORDER BY category",
        )?;

        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
