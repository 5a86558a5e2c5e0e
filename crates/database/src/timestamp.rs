//! Local wall-clock timestamps as stored in every table.

use chrono::{Local, NaiveDate};

/// Storage format for timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format of the calendar-date prefix used by quota queries.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Current local time in storage format.
pub fn now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Current local calendar date (`YYYY-MM-DD`).
pub fn today() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

/// Format a calendar date as a quota prefix.
pub fn date_prefix(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_starts_with_today() {
        let stamp = now();
        assert_eq!(stamp.len(), 19);
        // Midnight can tick between the two calls; the shape still holds.
        assert_eq!(&stamp[4..5], "-");
        assert_eq!(&stamp[10..11], " ");
        assert_eq!(today().len(), 10);
    }

    #[test]
    fn test_date_prefix() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(date_prefix(date), "2025-03-09");
    }
}
