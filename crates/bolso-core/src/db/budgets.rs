//! Budget goal operations

use rusqlite::{params, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::BudgetGoal;

fn map_goal(row: &Row<'_>) -> rusqlite::Result<BudgetGoal> {
    Ok(BudgetGoal {
        id: row.get(0)?,
        category: row.get(1)?,
        target_percentage: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
    })
}

impl Database {
    /// Create or update the goal for one category
    ///
    /// At most one goal exists per category; setting an existing category
    /// replaces its percentage.
    pub fn upsert_budget_goal(&self, category: &str, target_percentage: f64) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO budget_goals (category, target_percentage) VALUES (?, ?) \
             ON CONFLICT(category) DO UPDATE SET target_percentage = excluded.target_percentage",
            params![category, target_percentage],
        )?;

        let id: i64 = conn.query_row(
            "SELECT id FROM budget_goals WHERE category = ?",
            params![category],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// List all goals, by category
    pub fn list_budget_goals(&self) -> Result<Vec<BudgetGoal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, category, target_percentage, created_at \
             FROM budget_goals ORDER BY category ASC",
        )?;

        let rows = stmt.query_map([], map_goal)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Delete the goal for one category
    pub fn delete_budget_goal(&self, category: &str) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM budget_goals WHERE category = ?",
            params![category],
        )?;

        if deleted == 0 {
            return Err(Error::NotFound(format!(
                "No budget goal for category {}",
                category
            )));
        }
        Ok(())
    }
}
