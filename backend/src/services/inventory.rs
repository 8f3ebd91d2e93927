//! Inventory service: monthly views and the attributable write paths
//!
//! The write paths keep `order_register` and the current month's
//! `monthly_data` row consistent and append `edit_history` entries for every
//! value-changing edit. Steps within one call are sequenced; across calls the
//! store is last-writer-wins.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use shared::{
    apply_cell_input, current_month, reconcile, reconcile_month, validate_required,
    validate_year_month, AuditEntry, CellField, FieldChange, MonthlyOverride, NewOrder,
    OrderRecord, OrderUpdate, ViewRow,
};

use crate::error::{AppError, AppResult};
use crate::store::RecordStore;

/// Inventory service over the row-store boundary
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn RecordStore>,
}

/// Input for registering inbound stock
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInboundInput {
    pub company: String,
    pub model: String,
    pub part_number: String,
    #[serde(default)]
    pub part_name: String,
    /// Defaults to today when omitted
    pub date: Option<NaiveDate>,
    pub in_qty: i32,
    pub order_qty: i32,
    #[serde(default)]
    pub note: String,
}

/// Input for a full-record edit. All four quantities and the note are
/// absolute replacement values, compared against the current reconciled row.
#[derive(Debug, Clone, Deserialize)]
pub struct EditOrderRequest {
    pub in_qty: i32,
    pub stock_qty: i32,
    pub order_qty: i32,
    pub out_qty: i32,
    #[serde(default)]
    pub note: String,
    pub actor_name: String,
}

/// Input for a single-cell edit
#[derive(Debug, Clone, Deserialize)]
pub struct EditCellRequest {
    pub field: CellField,
    /// Raw cell text; `+N`/`-N` adjust the current reconciled value,
    /// anything else replaces it
    pub value: String,
    pub actor_name: String,
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Reconciled rows for one calendar month.
    pub async fn month_view(&self, year_month: &str) -> AppResult<Vec<ViewRow>> {
        validate_year_month(year_month).map_err(|m| AppError::validation("month", m))?;

        let orders = self.store.list_orders().await?;
        let overrides = self.store.list_monthly_overrides(year_month).await?;
        Ok(reconcile_month(&orders, &overrides))
    }

    /// Months that carry override data, newest first. Falls back to the
    /// current month so a fresh deployment still renders a month picker.
    pub async fn months(&self) -> AppResult<Vec<String>> {
        let months = self.store.list_months().await?;
        if months.is_empty() {
            return Ok(vec![current_month()]);
        }
        Ok(months)
    }

    /// Register inbound stock against the order identified by its natural
    /// key, creating the cumulative record when the key was never seen.
    ///
    /// Appends an inbound event and fully replaces the current month's
    /// override: `stock = inbound - (prior override's outbound or 0)`. Any
    /// store failure aborts the remaining steps, so a partial write is never
    /// reported as success.
    pub async fn register_inbound(&self, input: RegisterInboundInput) -> AppResult<ViewRow> {
        for (field, value) in [
            ("company", &input.company),
            ("model", &input.model),
            ("part_number", &input.part_number),
        ] {
            validate_required(value).map_err(|m| AppError::validation(field, m))?;
        }

        let order = self.find_or_create_order(&input).await?;

        let date = input.date.unwrap_or_else(|| Utc::now().date_naive());
        self.store
            .append_inbound_event(order.id, date, input.in_qty)
            .await?;

        let year_month = current_month();
        let prior = self
            .store
            .find_monthly_override(&year_month, order.id)
            .await?;
        let existing_out = prior.as_ref().and_then(|m| m.out_qty).unwrap_or(0);

        let record = MonthlyOverride {
            year_month,
            order_id: order.id,
            in_qty: Some(input.in_qty),
            out_qty: Some(existing_out),
            stock_qty: Some(input.in_qty - existing_out),
            order_qty: Some(input.order_qty),
        };
        self.store.upsert_monthly_override(&record).await?;

        tracing::info!(
            order_id = order.id,
            in_qty = input.in_qty,
            "Registered inbound stock for {}",
            order.natural_key()
        );

        Ok(reconcile(&order, Some(&record)))
    }

    /// Apply a single-cell edit to the current month's view.
    ///
    /// Editing inbound shifts stock by the same signed delta; editing stock
    /// or order touches only that field. Exactly one audit entry is appended
    /// when the value actually changed.
    pub async fn edit_cell(
        &self,
        order_id: i64,
        field: CellField,
        raw_value: &str,
        actor_name: &str,
    ) -> AppResult<ViewRow> {
        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        let year_month = current_month();
        let monthly = self
            .store
            .find_monthly_override(&year_month, order_id)
            .await?;
        let current = reconcile(&order, monthly.as_ref());

        let old_value = match field {
            CellField::InQty => current.in_qty,
            CellField::StockQty => current.stock_qty,
            CellField::OrderQty => current.order_qty,
        };
        let new_value = apply_cell_input(raw_value, old_value);

        let mut in_qty = current.in_qty;
        let mut stock_qty = current.stock_qty;
        let mut order_qty = current.order_qty;
        match field {
            CellField::InQty => {
                // Stock moves with inbound unless explicitly overridden.
                in_qty = new_value;
                stock_qty = current.stock_qty + (new_value - old_value);
            }
            CellField::StockQty => stock_qty = new_value,
            CellField::OrderQty => order_qty = new_value,
        }

        let record = MonthlyOverride {
            year_month,
            order_id,
            in_qty: Some(in_qty),
            out_qty: Some(current.out_qty),
            stock_qty: Some(stock_qty),
            order_qty: Some(order_qty),
        };
        self.store.upsert_monthly_override(&record).await?;

        if old_value != new_value {
            let change = FieldChange::quantity(field.as_str(), old_value, new_value);
            self.store
                .append_audit_entry(order_id, actor_name, &[change])
                .await?;
        }

        Ok(reconcile(&order, Some(&record)))
    }

    /// Replace a record's quantities and note from the edit form.
    ///
    /// Writes land in both layers: the cumulative record takes the new
    /// inbound/outbound/order totals and note, and the current month's
    /// override is fully replaced with all four quantities. One audit entry
    /// lists every field whose value differs from the current reconciled
    /// row; an unchanged submission writes none.
    pub async fn edit_order(&self, order_id: i64, input: EditOrderRequest) -> AppResult<ViewRow> {
        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        let year_month = current_month();
        let monthly = self
            .store
            .find_monthly_override(&year_month, order_id)
            .await?;
        let current = reconcile(&order, monthly.as_ref());

        let mut changes = Vec::new();
        for (field, old, new) in [
            ("in_qty", current.in_qty, input.in_qty),
            ("stock_qty", current.stock_qty, input.stock_qty),
            ("order_qty", current.order_qty, input.order_qty),
            ("out_qty", current.out_qty, input.out_qty),
        ] {
            if old != new {
                changes.push(FieldChange::quantity(field, old, new));
            }
        }
        if order.note != input.note {
            changes.push(FieldChange::text("note", &order.note, &input.note));
        }

        self.store
            .update_order(
                order_id,
                &OrderUpdate {
                    part_name: None,
                    note: Some(input.note.clone()),
                    in_qty_total: Some(input.in_qty),
                    out_qty_total: Some(input.out_qty),
                    order_qty_total: Some(input.order_qty),
                },
            )
            .await?;

        let record = MonthlyOverride {
            year_month,
            order_id,
            in_qty: Some(input.in_qty),
            out_qty: Some(input.out_qty),
            stock_qty: Some(input.stock_qty),
            order_qty: Some(input.order_qty),
        };
        self.store.upsert_monthly_override(&record).await?;

        if !changes.is_empty() {
            self.store
                .append_audit_entry(order_id, &input.actor_name, &changes)
                .await?;
        }

        let updated = OrderRecord {
            in_qty_total: input.in_qty,
            out_qty_total: input.out_qty,
            order_qty_total: input.order_qty,
            note: input.note,
            ..order
        };
        Ok(reconcile(&updated, Some(&record)))
    }

    /// Delete a cumulative order record (admin action). Monthly overrides
    /// and audit entries for the id are left behind; the store declares no
    /// foreign keys for them.
    pub async fn delete_order(&self, order_id: i64) -> AppResult<()> {
        self.store.delete_order(order_id).await
    }

    /// Audit entries, newest first, optionally narrowed to one order.
    pub async fn history(&self, order_id: Option<i64>) -> AppResult<Vec<AuditEntry>> {
        self.store.list_audit_entries(order_id).await
    }

    /// Render one month's view as CSV, column order matching the inventory
    /// screen.
    pub async fn export_csv(&self, year_month: &str) -> AppResult<String> {
        let rows = self.month_view(year_month).await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "company",
                "model",
                "part_number",
                "part_name",
                "in_qty",
                "stock_qty",
                "shortage",
                "order_qty",
                "out_qty",
                "note",
            ])
            .map_err(anyhow::Error::from)?;

        for row in &rows {
            writer
                .write_record([
                    row.company.as_str(),
                    row.model.as_str(),
                    row.part_number.as_str(),
                    row.part_name.as_str(),
                    &row.in_qty.to_string(),
                    &row.stock_qty.to_string(),
                    row.shortage.as_str(),
                    &row.order_qty.to_string(),
                    &row.out_qty.to_string(),
                    row.note.as_str(),
                ])
                .map_err(anyhow::Error::from)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
        String::from_utf8(bytes).map_err(|e| AppError::Internal(e.into()))
    }

    async fn find_or_create_order(&self, input: &RegisterInboundInput) -> AppResult<OrderRecord> {
        // A failed lookup (other than "not found") stops the mutation here;
        // we never fall through to an insert on infrastructure errors.
        if let Some(order) = self
            .store
            .find_order(&input.company, &input.model, &input.part_number)
            .await?
        {
            return Ok(order);
        }

        self.store
            .create_order(&NewOrder {
                company: input.company.clone(),
                model: input.model.clone(),
                part_number: input.part_number.clone(),
                part_name: input.part_name.clone(),
                note: input.note.clone(),
            })
            .await
    }
}
