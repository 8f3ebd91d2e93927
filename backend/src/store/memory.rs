//! In-memory implementation of the row-store contract
//!
//! Backs the service test suites and local demos; state lives for the
//! lifetime of the process and is dropped with it.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use shared::{
    AuditEntry, FieldChange, InboundEvent, MonthlyOverride, NewOrder, OrderRecord, OrderUpdate,
};

use crate::error::{AppError, AppResult};
use crate::store::RecordStore;

#[derive(Default)]
struct Inner {
    orders: Vec<OrderRecord>,
    overrides: Vec<MonthlyOverride>,
    inbound_events: Vec<InboundEvent>,
    audit_entries: Vec<AuditEntry>,
    faults: HashSet<String>,
    next_order_id: i64,
    next_event_id: i64,
    next_audit_id: i64,
}

impl Inner {
    fn take_fault(&mut self, op: &str) -> AppResult<()> {
        if self.faults.remove(op) {
            return Err(AppError::Store(format!("Injected failure: {op}")));
        }
        Ok(())
    }
}

/// Mutex-guarded in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| AppError::Store("Memory store lock poisoned".to_string()))
    }

    /// Arrange for the next call of the named operation to fail with a
    /// store error. Drives the error-path tests.
    pub fn fail_next(&self, op: &str) -> AppResult<()> {
        let mut inner = self.lock()?;
        inner.faults.insert(op.to_string());
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_order(
        &self,
        company: &str,
        model: &str,
        part_number: &str,
    ) -> AppResult<Option<OrderRecord>> {
        let mut inner = self.lock()?;
        inner.take_fault("find_order")?;
        Ok(inner
            .orders
            .iter()
            .find(|o| o.company == company && o.model == model && o.part_number == part_number)
            .cloned())
    }

    async fn get_order(&self, id: i64) -> AppResult<Option<OrderRecord>> {
        let mut inner = self.lock()?;
        inner.take_fault("get_order")?;
        Ok(inner.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn create_order(&self, fields: &NewOrder) -> AppResult<OrderRecord> {
        let mut inner = self.lock()?;
        inner.take_fault("create_order")?;
        let now = Utc::now();

        // Natural-key collision resolves as a descriptive upsert, matching
        // the Postgres ON CONFLICT behavior.
        if let Some(existing) = inner.orders.iter_mut().find(|o| {
            o.company == fields.company
                && o.model == fields.model
                && o.part_number == fields.part_number
        }) {
            existing.part_name = fields.part_name.clone();
            existing.note = fields.note.clone();
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        inner.next_order_id += 1;
        let order = OrderRecord {
            id: inner.next_order_id,
            company: fields.company.clone(),
            model: fields.model.clone(),
            part_number: fields.part_number.clone(),
            part_name: fields.part_name.clone(),
            in_qty_total: 0,
            out_qty_total: 0,
            order_qty_total: 0,
            note: fields.note.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.orders.push(order.clone());
        Ok(order)
    }

    async fn update_order(&self, id: i64, fields: &OrderUpdate) -> AppResult<()> {
        let mut inner = self.lock()?;
        inner.take_fault("update_order")?;
        let order = inner
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        if let Some(part_name) = &fields.part_name {
            order.part_name = part_name.clone();
        }
        if let Some(note) = &fields.note {
            order.note = note.clone();
        }
        if let Some(in_qty_total) = fields.in_qty_total {
            order.in_qty_total = in_qty_total;
        }
        if let Some(out_qty_total) = fields.out_qty_total {
            order.out_qty_total = out_qty_total;
        }
        if let Some(order_qty_total) = fields.order_qty_total {
            order.order_qty_total = order_qty_total;
        }
        order.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_order(&self, id: i64) -> AppResult<()> {
        let mut inner = self.lock()?;
        inner.take_fault("delete_order")?;
        let before = inner.orders.len();
        inner.orders.retain(|o| o.id != id);
        if inner.orders.len() == before {
            return Err(AppError::NotFound("Order".to_string()));
        }
        Ok(())
    }

    async fn list_orders(&self) -> AppResult<Vec<OrderRecord>> {
        let mut inner = self.lock()?;
        inner.take_fault("list_orders")?;
        let mut orders = inner.orders.clone();
        orders.sort_by(|a, b| {
            (a.company.as_str(), a.part_number.as_str())
                .cmp(&(b.company.as_str(), b.part_number.as_str()))
        });
        Ok(orders)
    }

    async fn find_monthly_override(
        &self,
        year_month: &str,
        order_id: i64,
    ) -> AppResult<Option<MonthlyOverride>> {
        let mut inner = self.lock()?;
        inner.take_fault("find_monthly_override")?;
        Ok(inner
            .overrides
            .iter()
            .find(|m| m.year_month == year_month && m.order_id == order_id)
            .cloned())
    }

    async fn upsert_monthly_override(&self, record: &MonthlyOverride) -> AppResult<()> {
        let mut inner = self.lock()?;
        inner.take_fault("upsert_monthly_override")?;
        inner
            .overrides
            .retain(|m| !(m.year_month == record.year_month && m.order_id == record.order_id));
        inner.overrides.push(record.clone());
        Ok(())
    }

    async fn delete_monthly_overrides(
        &self,
        year_month: &str,
        order_id: Option<i64>,
    ) -> AppResult<()> {
        let mut inner = self.lock()?;
        inner.take_fault("delete_monthly_overrides")?;
        inner.overrides.retain(|m| {
            m.year_month != year_month || order_id.is_some_and(|id| m.order_id != id)
        });
        Ok(())
    }

    async fn list_monthly_overrides(&self, year_month: &str) -> AppResult<Vec<MonthlyOverride>> {
        let mut inner = self.lock()?;
        inner.take_fault("list_monthly_overrides")?;
        Ok(inner
            .overrides
            .iter()
            .filter(|m| m.year_month == year_month)
            .cloned()
            .collect())
    }

    async fn list_months(&self) -> AppResult<Vec<String>> {
        let mut inner = self.lock()?;
        inner.take_fault("list_months")?;
        let mut months: Vec<String> =
            inner.overrides.iter().map(|m| m.year_month.clone()).collect();
        months.sort();
        months.dedup();
        months.reverse();
        Ok(months)
    }

    async fn append_inbound_event(
        &self,
        order_id: i64,
        date: NaiveDate,
        quantity: i32,
    ) -> AppResult<()> {
        let mut inner = self.lock()?;
        inner.take_fault("append_inbound_event")?;
        inner.next_event_id += 1;
        let event = InboundEvent {
            id: inner.next_event_id,
            order_id,
            date,
            quantity,
            created_at: Utc::now(),
        };
        inner.inbound_events.push(event);
        Ok(())
    }

    async fn list_inbound_events_since(&self, date: NaiveDate) -> AppResult<Vec<InboundEvent>> {
        let mut inner = self.lock()?;
        inner.take_fault("list_inbound_events_since")?;
        let mut events: Vec<InboundEvent> = inner
            .inbound_events
            .iter()
            .filter(|e| e.date >= date)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.date);
        Ok(events)
    }

    async fn append_audit_entry(
        &self,
        order_id: i64,
        actor_name: &str,
        changes: &[FieldChange],
    ) -> AppResult<()> {
        let mut inner = self.lock()?;
        inner.take_fault("append_audit_entry")?;
        inner.next_audit_id += 1;
        let entry = AuditEntry {
            id: inner.next_audit_id,
            order_id,
            actor_name: actor_name.to_string(),
            changes: changes.to_vec(),
            created_at: Utc::now(),
        };
        inner.audit_entries.push(entry);
        Ok(())
    }

    async fn list_audit_entries(&self, order_id: Option<i64>) -> AppResult<Vec<AuditEntry>> {
        let mut inner = self.lock()?;
        inner.take_fault("list_audit_entries")?;
        let mut entries: Vec<AuditEntry> = inner
            .audit_entries
            .iter()
            .filter(|e| order_id.map_or(true, |id| e.order_id == id))
            .cloned()
            .collect();
        entries.reverse();
        Ok(entries)
    }
}
