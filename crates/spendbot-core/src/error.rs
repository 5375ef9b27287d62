//! Error types for spendbot

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unreadable stored timestamp: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    Validation(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Telegram API error: {0}")]
    Telegram(String),
}

impl Error {
    /// True when the persistence layer was unavailable or rejected the operation
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Database(_) | Error::Pool(_) | Error::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
