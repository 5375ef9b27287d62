//! Reply formatting
//!
//! Turns query results into the text block sent back to the user. The caller
//! decides what to say when there is nothing to list; an empty slice still
//! formats to a header and a zero total.

use crate::error::Result;
use crate::models::{Expense, Period};

/// Layout of the date shown on each expense line
const DATE_FORMAT: &str = "%d/%m/%Y";

/// Sum of all amounts
pub fn total(expenses: &[Expense]) -> f64 {
    expenses.iter().fold(0.0, |acc, e| acc + e.amount)
}

/// Render an amount with two decimals, never as `-0.00`
pub fn format_amount(amount: f64) -> String {
    let cents = (amount * 100.0).round();
    if cents == 0.0 {
        return "0.00".to_string();
    }
    format!("{:.2}", cents / 100.0)
}

/// Format one expense as a reply line (without trailing newline)
pub fn format_line(expense: &Expense) -> Result<String> {
    let date = expense.timestamp()?.format(DATE_FORMAT);
    Ok(format!(
        " ► {} | {} | ${} | {}",
        date,
        expense.category,
        format_amount(expense.amount),
        expense.description
    ))
}

/// Render expenses as a reply: header, one line per expense, then the total
///
/// With a period the header reads `Expenses for MM/YYYY:`, otherwise
/// `All expenses:`.
pub fn format_expenses(expenses: &[Expense], period: Option<&Period>) -> Result<String> {
    let mut reply = match period {
        Some(period) => format!("Expenses for {}:\n", period),
        None => "All expenses:\n".to_string(),
    };

    for expense in expenses {
        reply.push_str(&format_line(expense)?);
        reply.push('\n');
    }

    reply.push_str(&format!("Total: ${}", format_amount(total(expenses))));
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn expense(id: i64, date: &str, category: &str, amount: f64, description: &str) -> Expense {
        Expense {
            id,
            date: date.to_string(),
            category: category.to_string(),
            amount,
            description: description.to_string(),
        }
    }

    #[test]
    fn test_empty_formats_zero_total() {
        let reply = format_expenses(&[], None).unwrap();
        assert_eq!(reply, "All expenses:\nTotal: $0.00");
    }

    #[test]
    fn test_line_layout() {
        let e = expense(1, "2024-12-03 14:05:10.123456-03:00", "food", 15.5, "lunch");
        assert_eq!(
            format_line(&e).unwrap(),
            " ► 03/12/2024 | food | $15.50 | lunch"
        );
    }

    #[test]
    fn test_date_is_local_not_utc() {
        // 22:30 local on the 31st is already the 1st in UTC
        let e = expense(1, "2024-03-31 22:30:00.000000-03:00", "food", 1.0, "");
        assert!(format_line(&e).unwrap().contains("31/03/2024"));
    }

    #[test]
    fn test_n_lines_plus_total() {
        let expenses = vec![
            expense(1, "2024-03-01 10:00:00.000000-03:00", "food", 12.0, "lunch"),
            expense(2, "2024-03-02 10:00:00.000000-03:00", "transport", 3.5, "bus"),
            expense(3, "2024-03-03 10:00:00.000000-03:00", "misc", 0.333, ""),
        ];

        let reply = format_expenses(&expenses, None).unwrap();
        let lines: Vec<&str> = reply.lines().collect();

        // header + 3 expenses + total
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "All expenses:");
        assert_eq!(lines[3], " ► 03/03/2024 | misc | $0.33 | ");
        assert_eq!(lines[4], "Total: $15.83");
    }

    #[test]
    fn test_period_header() {
        let expenses = vec![expense(
            1,
            "2024-03-01 10:00:00.000000-03:00",
            "food",
            12.0,
            "lunch",
        )];
        let period = Period::new("03", "2024");

        let reply = format_expenses(&expenses, Some(&period)).unwrap();
        assert!(reply.starts_with("Expenses for 03/2024:\n"));
        assert!(reply.ends_with("Total: $12.00"));
    }

    #[test]
    fn test_negative_amounts_reduce_total() {
        let expenses = vec![
            expense(1, "2024-03-01 10:00:00-03:00", "food", 10.0, ""),
            expense(2, "2024-03-01 11:00:00-03:00", "refund", -4.25, ""),
        ];
        assert_eq!(total(&expenses), 5.75);

        let reply = format_expenses(&expenses, None).unwrap();
        assert!(reply.contains("$-4.25"));
        assert!(reply.ends_with("Total: $5.75"));
    }

    #[test]
    fn test_cancelling_amounts_total_zero() {
        let expenses = vec![
            expense(1, "2024-03-01 10:00:00-03:00", "a", -0.1, ""),
            expense(2, "2024-03-01 11:00:00-03:00", "b", -0.2, ""),
            expense(3, "2024-03-01 12:00:00-03:00", "c", 0.3, ""),
        ];

        let reply = format_expenses(&expenses, None).unwrap();
        assert_eq!(reply.lines().last(), Some("Total: $0.00"));
    }

    #[test]
    fn test_format_amount_has_no_negative_zero() {
        assert_eq!(format_amount(-0.0), "0.00");
        assert_eq!(format_amount(-0.001), "0.00");
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(-4.25), "-4.25");
        assert_eq!(format_amount(15.5), "15.50");
        assert_eq!(format_amount(0.333), "0.33");
    }

    #[test]
    fn test_corrupt_timestamp_is_format_error() {
        let expenses = vec![expense(1, "yesterday-ish", "food", 1.0, "")];
        let err = format_expenses(&expenses, None).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }
}
