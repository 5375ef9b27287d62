//! spendbot CLI - Telegram expense tracker
//!
//! Usage:
//!   spendbot run --token TOKEN       Run the Telegram bot
//!   spendbot init                    Initialize database
//!   spendbot add food 12.5 lunch     Record an expense
//!   spendbot list --month 03 --year 2024

mod bot;
mod cli;
mod commands;
mod dispatch;
mod telegram;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Run {
            token,
            poll_timeout,
        } => commands::cmd_run(&cli.db, &token, poll_timeout).await,
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Add {
            category,
            amount,
            description,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_add(&db, &category, &amount, &description)
        }
        Commands::List { month, year } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_list(&db, month.as_deref(), year.as_deref())
        }
    }
}
