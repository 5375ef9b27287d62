//! Bot command implementation

use std::path::Path;

use anyhow::{Context, Result};

use super::open_db;
use crate::bot;
use crate::dispatch::Dispatcher;
use crate::telegram::TelegramClient;

pub async fn cmd_run(db_path: &Path, token: &str, poll_timeout: u64) -> Result<()> {
    println!("🚀 Starting spendbot...");
    println!("   Database: {}", db_path.display());
    println!("   Poll timeout: {}s", poll_timeout);

    if token.trim().is_empty() {
        anyhow::bail!("Bot token is empty. Set TOKEN or pass --token");
    }

    let db = open_db(db_path)?;
    db.ensure_schema().context("Failed to create schema")?;

    let client =
        TelegramClient::new(token, poll_timeout).context("Failed to create Telegram client")?;
    let dispatcher = Dispatcher::new(db);

    bot::run(&client, &dispatcher).await?;
    Ok(())
}
