//! Local expense commands (add, list)

use anyhow::{Context, Result};
use spendbot_core::db::Database;
use spendbot_core::format::format_expenses;
use spendbot_core::models::Period;

use crate::dispatch::{parse_amount, NO_EXPENSES};

pub fn cmd_add(db: &Database, category: &str, amount: &str, description: &[String]) -> Result<()> {
    let amount = parse_amount(amount)?;
    let description = description.join(" ");

    let id = db
        .insert_expense(category, amount, &description)
        .context("Failed to record expense")?;

    println!("✅ Recorded expense #{}: {} ${:.2} {}", id, category, amount, description);
    Ok(())
}

/// Render the same reply the bot would send for a listing
pub fn render_list(db: &Database, period: Option<&Period>) -> Result<String> {
    let expenses = match period {
        Some(p) => db.list_expenses_by_month_year(&p.month, &p.year)?,
        None => db.list_expenses()?,
    };

    if expenses.is_empty() {
        return Ok(NO_EXPENSES.to_string());
    }
    Ok(format_expenses(&expenses, period)?)
}

pub fn cmd_list(db: &Database, month: Option<&str>, year: Option<&str>) -> Result<()> {
    let period = match (month, year) {
        (Some(m), Some(y)) => Some(Period::new(m, y)),
        _ => None,
    };

    println!("{}", render_list(db, period.as_ref())?);
    Ok(())
}
