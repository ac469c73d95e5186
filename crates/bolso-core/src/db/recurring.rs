//! Recurring template operations

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewRecurringTemplate, RecurringTemplate};

fn map_template(row: &Row<'_>) -> rusqlite::Result<RecurringTemplate> {
    Ok(RecurringTemplate {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        tx_type: row
            .get::<_, String>(4)?
            .parse()
            .unwrap_or(crate::models::TransactionType::Expense),
        day_of_month: row.get(5)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

impl Database {
    /// Create a recurring template
    pub fn create_template(&self, template: &NewRecurringTemplate) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO recurring_templates (name, amount, category, tx_type, day_of_month) \
             VALUES (?, ?, ?, ?, ?)",
            params![
                template.name,
                template.amount,
                template.category,
                template.tx_type.as_str(),
                template.day_of_month,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List all templates, oldest first
    pub fn list_templates(&self) -> Result<Vec<RecurringTemplate>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, amount, category, tx_type, day_of_month, created_at \
             FROM recurring_templates ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], map_template)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Fetch one template
    pub fn get_template(&self, id: i64) -> Result<Option<RecurringTemplate>> {
        let conn = self.conn()?;
        let template = conn
            .query_row(
                "SELECT id, name, amount, category, tx_type, day_of_month, created_at \
                 FROM recurring_templates WHERE id = ?",
                params![id],
                map_template,
            )
            .optional()?;
        Ok(template)
    }

    /// Delete a template, cascading to its materialized transactions
    ///
    /// The foreign key on `transactions.recurring_id` removes every
    /// transaction the template produced. Returns how many transactions
    /// were cascaded away.
    pub fn delete_template(&self, id: i64) -> Result<usize> {
        let conn = self.conn()?;

        let cascaded: i64 = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE recurring_id = ?",
            params![id],
            |row| row.get(0),
        )?;

        let deleted = conn.execute("DELETE FROM recurring_templates WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Template {} not found", id)));
        }

        Ok(cascaded as usize)
    }
}
