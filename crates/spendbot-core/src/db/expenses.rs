//! Expense operations

use chrono::DateTime;
use chrono_tz::Tz;
use rusqlite::{params, Row};

use super::Database;
use crate::error::Result;
use crate::models::Expense;
use crate::timestamp;

const EXPENSE_COLUMNS: &str = "id, date, category, amount, description";

fn row_to_expense(row: &Row) -> rusqlite::Result<Expense> {
    let category: Option<String> = row.get(2)?;
    let description: Option<String> = row.get(4)?;

    Ok(Expense {
        id: row.get(0)?,
        date: row.get(1)?,
        category: category.unwrap_or_default(),
        amount: row.get(3)?,
        description: description.unwrap_or_default(),
    })
}

impl Database {
    /// Record a new expense stamped with the current time in America/Santiago
    pub fn insert_expense(&self, category: &str, amount: f64, description: &str) -> Result<i64> {
        self.insert_expense_at(&timestamp::now(), category, amount, description)
    }

    /// Record a new expense with an explicit timestamp
    pub fn insert_expense_at(
        &self,
        at: &DateTime<Tz>,
        category: &str,
        amount: f64,
        description: &str,
    ) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO expenses (date, category, amount, description) VALUES (?, ?, ?, ?)",
            params![timestamp::to_stored(at), category, amount, description],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List every expense in insertion order
    pub fn list_expenses(&self) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses ORDER BY id",
            EXPENSE_COLUMNS
        ))?;

        let expenses = stmt
            .query_map([], row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// List expenses recorded in the given month and year
    ///
    /// Compares the year and month text of the stored local timestamp
    /// verbatim, so the month must be zero padded ("03", not "3").
    pub fn list_expenses_by_month_year(&self, month: &str, year: &str) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses
             WHERE substr(date, 1, 4) = ? AND substr(date, 6, 2) = ?
             ORDER BY id",
            EXPENSE_COLUMNS
        ))?;

        let expenses = stmt
            .query_map(params![year, month], row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Count stored expenses
    pub fn count_expenses(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;
        Ok(count)
    }
}
