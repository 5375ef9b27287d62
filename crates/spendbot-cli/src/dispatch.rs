//! Chat command dispatch
//!
//! Maps chat commands onto storage calls and turns every outcome, including
//! failures, into a reply string. A failing command never takes the bot down.
//!
//! | command           | arguments                        |
//! |-------------------|----------------------------------|
//! | `/start`          |                                  |
//! | `/add`            | `category amount [description…]` |
//! | `/get`            |                                  |
//! | `/get_month_year` | `month year`                     |
//! | `/help`           |                                  |

use spendbot_core::db::Database;
use spendbot_core::error::{Error, Result};
use spendbot_core::format::format_expenses;
use spendbot_core::models::Period;
use tracing::{debug, error, info, warn};

pub const WELCOME: &str = "Welcome to the expense tracker bot!";
pub const ADDED: &str = "Expense added!";
pub const NO_EXPENSES: &str = "No expenses found!";

pub const HELP: &str = "Commands:\n\
/add <category> <amount> [description] - record an expense\n\
/get - list all expenses\n\
/get_month_year <MM> <YYYY> - list expenses for a month\n\
/help - show this message";

const USAGE_ADD: &str = "Usage: /add <category> <amount> [description]";
const USAGE_MONTH_YEAR: &str = "Usage: /get_month_year <MM> <YYYY> (e.g. /get_month_year 03 2024)";

/// A chat command split into its name and arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine<'a> {
    pub name: &'a str,
    pub args: Vec<&'a str>,
}

/// Split `/name@bot arg1 arg2` into name and arguments
///
/// Returns `None` for text that is not a command.
pub fn parse_command(text: &str) -> Option<CommandLine<'_>> {
    let mut tokens = text.split_whitespace();
    let head = tokens.next()?.strip_prefix('/')?;
    // Group chats address commands as /name@botname
    let name = head.split('@').next().unwrap_or(head);
    if name.is_empty() {
        return None;
    }

    Some(CommandLine {
        name,
        args: tokens.collect(),
    })
}

/// Parse a user-supplied amount
///
/// Anything that reads as a finite number is accepted, negative and zero included.
pub fn parse_amount(raw: &str) -> Result<f64> {
    match raw.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(Error::Validation(format!("'{}' is not a valid amount", raw))),
    }
}

/// Routes chat commands to storage and formatting
#[derive(Clone)]
pub struct Dispatcher {
    db: Database,
}

impl Dispatcher {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Handle one incoming message, returning the reply to send
    ///
    /// Plain text that is not a command gets no reply.
    pub fn handle(&self, text: &str) -> Option<String> {
        let command = parse_command(text)?;
        info!("Command /{} ({} args)", command.name, command.args.len());

        let reply = match self.execute(&command) {
            Ok(reply) => reply,
            Err(e) => {
                // Storage failures are the operator's problem; the rest are bad input or bad rows
                if e.is_storage() {
                    error!("Command /{} hit a storage failure: {}", command.name, e);
                } else {
                    warn!("Command /{} failed: {}", command.name, e);
                }
                format!("Error: {}", e)
            }
        };

        Some(reply)
    }

    fn execute(&self, command: &CommandLine<'_>) -> Result<String> {
        match command.name {
            "start" => self.start(),
            "add" => self.add(&command.args),
            "get" => self.get(),
            "get_month_year" => self.get_month_year(&command.args),
            "help" => Ok(HELP.to_string()),
            other => Ok(format!("Unknown command: /{}\n\n{}", other, HELP)),
        }
    }

    fn start(&self) -> Result<String> {
        self.db.ensure_schema()?;
        Ok(WELCOME.to_string())
    }

    fn add(&self, args: &[&str]) -> Result<String> {
        let (category, raw_amount, rest) = match args {
            [category, amount, rest @ ..] => (*category, *amount, rest),
            _ => return Ok(USAGE_ADD.to_string()),
        };

        let amount = parse_amount(raw_amount)?;
        let description = rest.join(" ");

        self.db.ensure_schema()?;
        let id = self.db.insert_expense(category, amount, &description)?;
        debug!("Stored expense {} ({} {:.2})", id, category, amount);

        Ok(ADDED.to_string())
    }

    fn get(&self) -> Result<String> {
        let expenses = self.db.list_expenses()?;
        if expenses.is_empty() {
            return Ok(NO_EXPENSES.to_string());
        }
        format_expenses(&expenses, None)
    }

    fn get_month_year(&self, args: &[&str]) -> Result<String> {
        // Tokens go through untouched; "3" does not match "03"
        let period = match args {
            [month, year] => Period::new(*month, *year),
            _ => return Ok(USAGE_MONTH_YEAR.to_string()),
        };

        let expenses = self
            .db
            .list_expenses_by_month_year(&period.month, &period.year)?;
        if expenses.is_empty() {
            return Ok(NO_EXPENSES.to_string());
        }
        format_expenses(&expenses, Some(&period))
    }
}
