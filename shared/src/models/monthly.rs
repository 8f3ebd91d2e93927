//! Per-month override records

use serde::{Deserialize, Serialize};

/// Zero-or-one per order per calendar month, keyed by `(year_month, order_id)`.
///
/// Every field is an independent override: a present value shadows the
/// corresponding cumulative figure for that month's view, an absent one
/// falls back to it. Upserting replaces the whole row for the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyOverride {
    /// Calendar month in `YYYY-MM` form
    pub year_month: String,
    pub order_id: i64,
    pub in_qty: Option<i32>,
    pub out_qty: Option<i32>,
    pub stock_qty: Option<i32>,
    pub order_qty: Option<i32>,
}

impl MonthlyOverride {
    /// An empty override for the given key. Useful as a base when a mutation
    /// fills in only some fields.
    pub fn empty(year_month: impl Into<String>, order_id: i64) -> Self {
        Self {
            year_month: year_month.into(),
            order_id,
            in_qty: None,
            out_qty: None,
            stock_qty: None,
            order_qty: None,
        }
    }
}
