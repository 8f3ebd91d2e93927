//! Shortage and stock-level alert classification
//!
//! Alerts are recomputed on every pass from reconciled view rows; nothing is
//! persisted. Dismissal is a presentation concern and never reaches here.

use serde::{Deserialize, Serialize};

use crate::models::ViewRow;

/// Stock at or below this count raises a low-stock alert.
pub const LOW_STOCK_THRESHOLD: i32 = 10;

/// Stock-to-order ratio below this raises a high-demand alert.
pub const HIGH_DEMAND_RATIO: f64 = 0.2;

/// Alert kinds, most severe condition first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    OutOfStock,
    LowStock,
    HighDemand,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::OutOfStock => "out_of_stock",
            AlertKind::LowStock => "low_stock",
            AlertKind::HighDemand => "high_demand",
        }
    }
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// One classified anomaly for a single reconciled row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub order_id: i64,
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
    pub stock_qty: i32,
    pub order_qty: i32,
}

/// Classify one view row. Rules are evaluated independently per row with no
/// cross-row state; the first matching condition wins.
pub fn classify(row: &ViewRow) -> Option<Alert> {
    let (kind, severity, message) = if row.stock_qty <= 0 {
        (
            AlertKind::OutOfStock,
            Severity::High,
            format!("{} - {} is out of stock", row.company, row.part_number),
        )
    } else if row.stock_qty <= LOW_STOCK_THRESHOLD {
        (
            AlertKind::LowStock,
            Severity::Medium,
            format!(
                "{} - {} is low on stock ({} remaining)",
                row.company, row.part_number, row.stock_qty
            ),
        )
    } else if row.order_qty > 0
        && (row.stock_qty as f64) / (row.order_qty as f64) < HIGH_DEMAND_RATIO
    {
        (
            AlertKind::HighDemand,
            Severity::Medium,
            format!(
                "{} - {} is in high demand (stock {}/{})",
                row.company, row.part_number, row.stock_qty, row.order_qty
            ),
        )
    } else {
        return None;
    };

    Some(Alert {
        order_id: row.id,
        kind,
        severity,
        message,
        stock_qty: row.stock_qty,
        order_qty: row.order_qty,
    })
}

/// Classify a batch of rows, sorted most severe first.
pub fn classify_all(rows: &[ViewRow]) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = rows.iter().filter_map(classify).collect();
    alerts.sort_by(|a, b| b.severity.cmp(&a.severity));
    alerts
}
