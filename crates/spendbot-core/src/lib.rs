//! spendbot Core Library
//!
//! Shared functionality for the spendbot expense tracker:
//! - SQLite storage for expense records
//! - The stored timestamp layout shared by writer and reader
//! - Reply formatting for expense listings

pub mod db;
pub mod error;
pub mod format;
pub mod models;
pub mod timestamp;

pub use db::Database;
pub use error::{Error, Result};
pub use format::format_expenses;
pub use models::{Expense, Period};
