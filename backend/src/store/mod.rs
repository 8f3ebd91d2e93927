//! Row-store boundary
//!
//! The core's only persistence contract. Lookups that legitimately find
//! nothing return `Ok(None)`; infrastructure failures surface as
//! [`AppError::Store`]/[`AppError::Database`]. No optimistic concurrency is
//! used anywhere; concurrent editors race last-writer-wins.

use async_trait::async_trait;
use chrono::NaiveDate;

use shared::{
    AuditEntry, FieldChange, InboundEvent, MonthlyOverride, NewOrder, OrderRecord, OrderUpdate,
};

use crate::error::AppResult;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Look up an order by its (company, model, part_number) natural key.
    async fn find_order(
        &self,
        company: &str,
        model: &str,
        part_number: &str,
    ) -> AppResult<Option<OrderRecord>>;

    async fn get_order(&self, id: i64) -> AppResult<Option<OrderRecord>>;

    /// Create an order with zeroed quantity totals. Implementations resolve
    /// natural-key collisions as an upsert so that concurrent find-or-create
    /// callers converge on one row.
    async fn create_order(&self, fields: &NewOrder) -> AppResult<OrderRecord>;

    async fn update_order(&self, id: i64, fields: &OrderUpdate) -> AppResult<()>;

    async fn delete_order(&self, id: i64) -> AppResult<()>;

    async fn list_orders(&self) -> AppResult<Vec<OrderRecord>>;

    async fn find_monthly_override(
        &self,
        year_month: &str,
        order_id: i64,
    ) -> AppResult<Option<MonthlyOverride>>;

    /// Full replace of the row keyed by `(year_month, order_id)`.
    async fn upsert_monthly_override(&self, record: &MonthlyOverride) -> AppResult<()>;

    /// Delete a month's overrides, optionally narrowed to one order.
    async fn delete_monthly_overrides(
        &self,
        year_month: &str,
        order_id: Option<i64>,
    ) -> AppResult<()>;

    async fn list_monthly_overrides(&self, year_month: &str) -> AppResult<Vec<MonthlyOverride>>;

    /// Distinct months carrying overrides, newest first.
    async fn list_months(&self) -> AppResult<Vec<String>>;

    async fn append_inbound_event(
        &self,
        order_id: i64,
        date: NaiveDate,
        quantity: i32,
    ) -> AppResult<()>;

    async fn list_inbound_events_since(&self, date: NaiveDate) -> AppResult<Vec<InboundEvent>>;

    async fn append_audit_entry(
        &self,
        order_id: i64,
        actor_name: &str,
        changes: &[FieldChange],
    ) -> AppResult<()>;

    /// Audit entries, newest first, optionally narrowed to one order.
    async fn list_audit_entries(&self, order_id: Option<i64>) -> AppResult<Vec<AuditEntry>>;
}
