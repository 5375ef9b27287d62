//! Domain models for spendbot

use chrono::{DateTime, FixedOffset};

use crate::error::Result;
use crate::timestamp;

/// A single recorded spending event
///
/// `date` is the raw `date` column text in the layout defined by
/// [`crate::timestamp`]. It is only parsed when a caller asks for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: i64,
    pub date: String,
    pub category: String,
    pub amount: f64,
    pub description: String,
}

impl Expense {
    /// Parse the stored timestamp
    pub fn timestamp(&self) -> Result<DateTime<FixedOffset>> {
        timestamp::parse_stored(&self.date)
    }
}

/// Month/year filter as typed by the user
///
/// Both parts are kept as text and compared verbatim against the stored
/// timestamp, so `"3"` never matches March while `"03"` does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub month: String,
    pub year: String,
}

impl Period {
    pub fn new(month: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            month: month.into(),
            year: year.into(),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}
