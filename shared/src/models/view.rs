//! Derived view rows

use serde::{Deserialize, Serialize};

/// The reconciled row every screen consumes. Computed fresh on each read,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRow {
    pub id: i64,
    pub company: String,
    pub model: String,
    pub part_number: String,
    pub part_name: String,
    pub in_qty: i32,
    pub stock_qty: i32,
    /// Signed shortage display: `"-N"` under-received, `"+N"` over-received,
    /// `"0"` exactly filled.
    pub shortage: String,
    pub order_qty: i32,
    pub out_qty: i32,
    pub note: String,
}
