//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// spendbot - Track personal expenses from a chat
#[derive(Parser)]
#[command(name = "spendbot")]
#[command(about = "Telegram expense tracker backed by SQLite", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, env = "SPENDBOT_DB", default_value = "expenses.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the Telegram bot
    Run {
        /// Bot API token issued by @BotFather
        #[arg(long, env = "TOKEN", hide_env_values = true)]
        token: String,

        /// Long polling timeout in seconds
        #[arg(long, default_value = "30")]
        poll_timeout: u64,
    },

    /// Initialize the database
    Init,

    /// Record an expense
    Add {
        /// Category label (e.g. food, transport)
        category: String,

        /// Amount spent
        #[arg(allow_negative_numbers = true)]
        amount: String,

        /// Free-text description
        #[arg(trailing_var_arg = true)]
        description: Vec<String>,
    },

    /// List expenses, optionally for a single month
    List {
        /// Two-digit month (e.g. 03)
        #[arg(long, requires = "year")]
        month: Option<String>,

        /// Four-digit year (e.g. 2024)
        #[arg(long, requires = "month")]
        year: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_with_description() {
        let cli = Cli::parse_from([
            "spendbot", "--db", "x.db", "add", "food", "12.5", "lunch", "with", "friends",
        ]);
        assert_eq!(cli.db, PathBuf::from("x.db"));
        match cli.command {
            Commands::Add {
                category,
                amount,
                description,
            } => {
                assert_eq!(category, "food");
                assert_eq!(amount, "12.5");
                assert_eq!(description, vec!["lunch", "with", "friends"]);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_negative_amount() {
        let cli = Cli::parse_from(["spendbot", "add", "refund", "-4.5"]);
        match cli.command {
            Commands::Add { amount, .. } => assert_eq!(amount, "-4.5"),
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_list_month_requires_year() {
        assert!(Cli::try_parse_from(["spendbot", "list", "--month", "03"]).is_err());
        let cli = Cli::try_parse_from(["spendbot", "list", "--month", "03", "--year", "2024"])
            .unwrap();
        match cli.command {
            Commands::List { month, year } => {
                assert_eq!(month.as_deref(), Some("03"));
                assert_eq!(year.as_deref(), Some("2024"));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_run_takes_token_flag() {
        let cli = Cli::parse_from(["spendbot", "run", "--token", "123:abc"]);
        match cli.command {
            Commands::Run {
                token,
                poll_timeout,
            } => {
                assert_eq!(token, "123:abc");
                assert_eq!(poll_timeout, 30);
            }
            _ => panic!("expected run"),
        }
    }
}
