//! PostgreSQL implementation of the row-store contract

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};

use shared::{
    AuditEntry, FieldChange, InboundEvent, MonthlyOverride, NewOrder, OrderRecord, OrderUpdate,
};

use crate::error::{AppError, AppResult};
use crate::store::RecordStore;

/// sqlx-backed store against the four inventory tables.
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Row for order queries
#[derive(Debug, FromRow)]
struct OrderRow {
    id: i64,
    company: String,
    model: String,
    part_number: String,
    part_name: String,
    in_qty_total: i32,
    out_qty_total: i32,
    order_qty_total: i32,
    note: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for OrderRecord {
    fn from(r: OrderRow) -> Self {
        OrderRecord {
            id: r.id,
            company: r.company,
            model: r.model,
            part_number: r.part_number,
            part_name: r.part_name,
            in_qty_total: r.in_qty_total,
            out_qty_total: r.out_qty_total,
            order_qty_total: r.order_qty_total,
            note: r.note,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Row for monthly override queries
#[derive(Debug, FromRow)]
struct MonthlyRow {
    year_month: String,
    order_id: i64,
    in_qty: Option<i32>,
    out_qty: Option<i32>,
    stock_qty: Option<i32>,
    order_qty: Option<i32>,
}

impl From<MonthlyRow> for MonthlyOverride {
    fn from(r: MonthlyRow) -> Self {
        MonthlyOverride {
            year_month: r.year_month,
            order_id: r.order_id,
            in_qty: r.in_qty,
            out_qty: r.out_qty,
            stock_qty: r.stock_qty,
            order_qty: r.order_qty,
        }
    }
}

/// Row for inbound event queries
#[derive(Debug, FromRow)]
struct InboundRow {
    id: i64,
    order_id: i64,
    in_date: NaiveDate,
    quantity: i32,
    created_at: DateTime<Utc>,
}

/// Row for audit entry queries
#[derive(Debug, FromRow)]
struct AuditRow {
    id: i64,
    order_id: i64,
    actor_name: String,
    changes: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl AuditRow {
    fn into_entry(self) -> AppResult<AuditEntry> {
        let changes: Vec<FieldChange> = serde_json::from_value(self.changes)
            .map_err(|e| AppError::Store(format!("Malformed audit changes: {e}")))?;
        Ok(AuditEntry {
            id: self.id,
            order_id: self.order_id,
            actor_name: self.actor_name,
            changes,
            created_at: self.created_at,
        })
    }
}

const ORDER_COLUMNS: &str = "id, company, model, part_number, part_name, \
                             in_qty_total, out_qty_total, order_qty_total, \
                             note, created_at, updated_at";

#[async_trait]
impl RecordStore for PgStore {
    async fn find_order(
        &self,
        company: &str,
        model: &str,
        part_number: &str,
    ) -> AppResult<Option<OrderRecord>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM order_register \
             WHERE company = $1 AND model = $2 AND part_number = $3"
        ))
        .bind(company)
        .bind(model)
        .bind(part_number)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(OrderRecord::from))
    }

    async fn get_order(&self, id: i64) -> AppResult<Option<OrderRecord>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM order_register WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(OrderRecord::from))
    }

    async fn create_order(&self, fields: &NewOrder) -> AppResult<OrderRecord> {
        // The unique natural-key index turns concurrent find-or-create calls
        // into a single-row upsert instead of a duplicate-key failure.
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            INSERT INTO order_register
                (company, model, part_number, part_name, in_qty_total, out_qty_total, order_qty_total, note)
            VALUES ($1, $2, $3, $4, 0, 0, 0, $5)
            ON CONFLICT (company, model, part_number)
            DO UPDATE SET part_name = EXCLUDED.part_name,
                          note = EXCLUDED.note,
                          updated_at = now()
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(&fields.company)
        .bind(&fields.model)
        .bind(&fields.part_number)
        .bind(&fields.part_name)
        .bind(&fields.note)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn update_order(&self, id: i64, fields: &OrderUpdate) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE order_register
            SET part_name = COALESCE($2, part_name),
                note = COALESCE($3, note),
                in_qty_total = COALESCE($4, in_qty_total),
                out_qty_total = COALESCE($5, out_qty_total),
                order_qty_total = COALESCE($6, order_qty_total),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&fields.part_name)
        .bind(&fields.note)
        .bind(fields.in_qty_total)
        .bind(fields.out_qty_total)
        .bind(fields.order_qty_total)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Order".to_string()));
        }

        Ok(())
    }

    async fn delete_order(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM order_register WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Order".to_string()));
        }

        Ok(())
    }

    async fn list_orders(&self) -> AppResult<Vec<OrderRecord>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM order_register ORDER BY company, part_number"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(OrderRecord::from).collect())
    }

    async fn find_monthly_override(
        &self,
        year_month: &str,
        order_id: i64,
    ) -> AppResult<Option<MonthlyOverride>> {
        let row = sqlx::query_as::<_, MonthlyRow>(
            "SELECT year_month, order_id, in_qty, out_qty, stock_qty, order_qty \
             FROM monthly_data WHERE year_month = $1 AND order_id = $2",
        )
        .bind(year_month)
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(MonthlyOverride::from))
    }

    async fn upsert_monthly_override(&self, record: &MonthlyOverride) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO monthly_data (year_month, order_id, in_qty, out_qty, stock_qty, order_qty)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (year_month, order_id)
            DO UPDATE SET in_qty = EXCLUDED.in_qty,
                          out_qty = EXCLUDED.out_qty,
                          stock_qty = EXCLUDED.stock_qty,
                          order_qty = EXCLUDED.order_qty,
                          updated_at = now()
            "#,
        )
        .bind(&record.year_month)
        .bind(record.order_id)
        .bind(record.in_qty)
        .bind(record.out_qty)
        .bind(record.stock_qty)
        .bind(record.order_qty)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn delete_monthly_overrides(
        &self,
        year_month: &str,
        order_id: Option<i64>,
    ) -> AppResult<()> {
        match order_id {
            Some(id) => {
                sqlx::query("DELETE FROM monthly_data WHERE year_month = $1 AND order_id = $2")
                    .bind(year_month)
                    .bind(id)
                    .execute(&self.db)
                    .await?;
            }
            None => {
                sqlx::query("DELETE FROM monthly_data WHERE year_month = $1")
                    .bind(year_month)
                    .execute(&self.db)
                    .await?;
            }
        }

        Ok(())
    }

    async fn list_monthly_overrides(&self, year_month: &str) -> AppResult<Vec<MonthlyOverride>> {
        let rows = sqlx::query_as::<_, MonthlyRow>(
            "SELECT year_month, order_id, in_qty, out_qty, stock_qty, order_qty \
             FROM monthly_data WHERE year_month = $1",
        )
        .bind(year_month)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(MonthlyOverride::from).collect())
    }

    async fn list_months(&self) -> AppResult<Vec<String>> {
        let months = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT year_month FROM monthly_data ORDER BY year_month DESC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(months)
    }

    async fn append_inbound_event(
        &self,
        order_id: i64,
        date: NaiveDate,
        quantity: i32,
    ) -> AppResult<()> {
        sqlx::query("INSERT INTO in_register (order_id, in_date, quantity) VALUES ($1, $2, $3)")
            .bind(order_id)
            .bind(date)
            .bind(quantity)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    async fn list_inbound_events_since(&self, date: NaiveDate) -> AppResult<Vec<InboundEvent>> {
        let rows = sqlx::query_as::<_, InboundRow>(
            "SELECT id, order_id, in_date, quantity, created_at \
             FROM in_register WHERE in_date >= $1 ORDER BY in_date",
        )
        .bind(date)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| InboundEvent {
                id: r.id,
                order_id: r.order_id,
                date: r.in_date,
                quantity: r.quantity,
                created_at: r.created_at,
            })
            .collect())
    }

    async fn append_audit_entry(
        &self,
        order_id: i64,
        actor_name: &str,
        changes: &[FieldChange],
    ) -> AppResult<()> {
        let changes = serde_json::to_value(changes)
            .map_err(|e| AppError::Store(format!("Unserializable audit changes: {e}")))?;

        sqlx::query("INSERT INTO edit_history (order_id, actor_name, changes) VALUES ($1, $2, $3)")
            .bind(order_id)
            .bind(actor_name)
            .bind(changes)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    async fn list_audit_entries(&self, order_id: Option<i64>) -> AppResult<Vec<AuditEntry>> {
        let rows = match order_id {
            Some(id) => {
                sqlx::query_as::<_, AuditRow>(
                    "SELECT id, order_id, actor_name, changes, created_at \
                     FROM edit_history WHERE order_id = $1 ORDER BY created_at DESC",
                )
                .bind(id)
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, AuditRow>(
                    "SELECT id, order_id, actor_name, changes, created_at \
                     FROM edit_history ORDER BY created_at DESC",
                )
                .fetch_all(&self.db)
                .await?
            }
        };

        rows.into_iter().map(AuditRow::into_entry).collect()
    }
}
