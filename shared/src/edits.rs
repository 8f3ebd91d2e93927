//! Cell-edit parsing
//!
//! Inventory cells accept a small spreadsheet-style syntax: a value prefixed
//! with `+` or `-` adjusts the current reconciled value, an unprefixed value
//! replaces it. An unparseable number counts as zero, so a stray `+abc`
//! becomes a zero-adjustment rather than an error.

use serde::{Deserialize, Serialize};

/// The three directly editable view-row fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellField {
    InQty,
    StockQty,
    OrderQty,
}

impl CellField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellField::InQty => "in_qty",
            CellField::StockQty => "stock_qty",
            CellField::OrderQty => "order_qty",
        }
    }
}

/// Resolve a raw cell input against the current reconciled value.
pub fn apply_cell_input(raw: &str, current: i32) -> i32 {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix('+') {
        current + parse_or_zero(rest)
    } else if let Some(rest) = trimmed.strip_prefix('-') {
        current - parse_or_zero(rest)
    } else {
        parse_or_zero(trimmed)
    }
}

fn parse_or_zero(s: &str) -> i32 {
    s.trim().parse().unwrap_or(0)
}
