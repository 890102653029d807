//! Display helpers used by the menu.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Format a byte count with binary (1024) steps and one decimal.
///
/// A size of zero means the indexer did not report one.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "Unknown".to_string();
    }
    let mut size = bytes as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} PB", size)
}

/// Format an ISO-8601 timestamp as `YYYY-MM-DD`, or `Unknown`.
pub fn format_date(date: &str) -> String {
    let date = date.trim();
    let parsed = DateTime::parse_from_rfc3339(date)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(date, "%Y-%m-%d"));
    match parsed {
        Ok(day) => day.format("%Y-%m-%d").to_string(),
        Err(_) => "Unknown".to_string(),
    }
}

/// Cut `text` to `max` characters, appending `...` when something was cut.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

/// Three-line section banner.
pub fn header(text: &str) -> String {
    let rule = "=".repeat(60);
    format!("\n{rule}\n  {text}\n{rule}\n")
}
