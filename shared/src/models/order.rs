//! Cumulative order records and the inbound event log

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Cumulative record for one (company, model, part_number) combination.
///
/// The triple is the business-level natural key; `id` is the store's
/// surrogate key. The quantity totals are all-time running figures that a
/// monthly override can shadow for a single month's view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: i64,
    /// Supplier name
    pub company: String,
    /// Vehicle model
    pub model: String,
    pub part_number: String,
    pub part_name: String,
    /// Cumulative inbound quantity
    pub in_qty_total: i32,
    /// Cumulative outbound quantity
    pub out_qty_total: i32,
    /// Cumulative ordered quantity
    pub order_qty_total: i32,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRecord {
    /// The natural key as a display string, used in alert and error messages.
    pub fn natural_key(&self) -> String {
        format!("{} / {} / {}", self.company, self.model, self.part_number)
    }
}

/// Descriptive fields for creating a new order record.
///
/// Quantity totals always start at zero; only mutations move them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub company: String,
    pub model: String,
    pub part_number: String,
    pub part_name: String,
    pub note: String,
}

/// Partial update of an order record. Absent fields are left untouched.
///
/// The quantity totals are set by the full-record edit path only; the
/// import path refreshes just the descriptive fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub part_name: Option<String>,
    pub note: Option<String>,
    pub in_qty_total: Option<i32>,
    pub out_qty_total: Option<i32>,
    pub order_qty_total: Option<i32>,
}

/// One inbound stock registration, append-only.
///
/// Events feed the dashboard trend aggregation; reconciliation never reads
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub id: i64,
    pub order_id: i64,
    pub date: NaiveDate,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}
