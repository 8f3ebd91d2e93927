//! Validation utilities for the Parts Inventory Management system

use chrono::{Datelike, Utc};

/// Validate that a required text field is present and not just whitespace.
pub fn validate_required(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        Err("Required field is blank")
    } else {
        Ok(())
    }
}

/// Validate a `YYYY-MM` month key.
pub fn validate_year_month(ym: &str) -> Result<(), &'static str> {
    let bytes = ym.as_bytes();
    if bytes.len() != 7 || bytes[4] != b'-' {
        return Err("Month must be in YYYY-MM form");
    }
    if !ym[..4].chars().all(|c| c.is_ascii_digit()) {
        return Err("Invalid year in month key");
    }
    match ym[5..].parse::<u8>() {
        Ok(m) if (1..=12).contains(&m) => Ok(()),
        _ => Err("Invalid month in month key"),
    }
}

/// The current calendar month in `YYYY-MM` form.
pub fn current_month() -> String {
    let now = Utc::now();
    format!("{:04}-{:02}", now.year(), now.month())
}
