//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Database initialization and shared utilities (open_db)
//! - `expenses` - Local add/list commands
//! - `run` - Telegram bot command

pub mod core;
pub mod expenses;
pub mod run;

// Re-export command functions for main.rs
pub use self::core::*;
pub use expenses::*;
pub use run::*;
