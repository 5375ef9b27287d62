//! Stored timestamp layout
//!
//! Expense timestamps are written by the storage layer and read back by the
//! reply formatter. Both sides go through this module so the text layout in
//! the `date` column is defined in exactly one place:
//!
//! ```text
//! 2024-12-03 14:05:10.123456-03:00
//! ```
//!
//! Local wall-clock time in America/Santiago, microsecond precision, and the
//! UTC offset in effect at insertion time.

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;

use crate::error::{Error, Result};

/// Zone every expense timestamp is recorded in
pub const ZONE: Tz = chrono_tz::America::Santiago;

/// Layout used when writing the `date` column
pub const STORED_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f%:z";

/// Layout accepted when reading the `date` column (fraction optional)
const PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

/// Current instant in the recording zone
pub fn now() -> DateTime<Tz> {
    Utc::now().with_timezone(&ZONE)
}

/// Render a zoned timestamp in the stored layout
pub fn to_stored(ts: &DateTime<Tz>) -> String {
    ts.format(STORED_FORMAT).to_string()
}

/// Parse a `date` column value, keeping the offset it was recorded with
pub fn parse_stored(s: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_str(s, PARSE_FORMAT)
        .map_err(|e| Error::Format(format!("'{}': {}", s, e)))
}
