//! Bulk import service
//!
//! Loads a spreadsheet's worth of rows into one calendar month. The month's
//! overrides are cleared once up front, then rows are processed strictly in
//! input order, best effort: a bad or failing row becomes an error string and
//! later rows still run. Import is a data-load operation and deliberately
//! writes no audit entries.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use shared::{validate_required, validate_year_month, MonthlyOverride, NewOrder, OrderUpdate};

use crate::error::{AppError, AppResult};
use crate::store::RecordStore;

/// One spreadsheet row as handed over by the upload boundary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImportRow {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub part_number: String,
    #[serde(default)]
    pub part_name: String,
    #[serde(default)]
    pub in_qty: Option<i32>,
    #[serde(default)]
    pub out_qty: Option<i32>,
    #[serde(default)]
    pub order_qty: Option<i32>,
    #[serde(default)]
    pub note: String,
}

/// Per-batch import outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub success_count: usize,
    pub failed_count: usize,
    pub errors: Vec<String>,
}

/// Import service over the row-store boundary
#[derive(Clone)]
pub struct ImportService {
    store: Arc<dyn RecordStore>,
}

impl ImportService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Import `rows` into `year_month`. Row numbering in error strings is
    /// 1-based and counts the spreadsheet header, so data row N reports as
    /// row N+1.
    pub async fn bulk_import(
        &self,
        rows: &[RawImportRow],
        year_month: &str,
    ) -> AppResult<ImportSummary> {
        validate_year_month(year_month).map_err(|m| AppError::validation("year_month", m))?;

        // Clear the target month once, before any row runs. A failed clear
        // does not abort the batch; stale rows are re-cleared per order below.
        if let Err(e) = self.store.delete_monthly_overrides(year_month, None).await {
            tracing::warn!("Clearing overrides for {year_month} failed: {e}");
        }

        let mut summary = ImportSummary {
            success_count: 0,
            failed_count: 0,
            errors: Vec::new(),
        };

        for (index, row) in rows.iter().enumerate() {
            let row_number = index + 2;

            if validate_required(&row.company).is_err()
                || validate_required(&row.model).is_err()
                || validate_required(&row.part_number).is_err()
            {
                summary.failed_count += 1;
                summary.errors.push(format!(
                    "Row {row_number}: missing required fields (company, model, part number)"
                ));
                continue;
            }

            match self.import_row(row, year_month).await {
                Ok(()) => summary.success_count += 1,
                Err(e) => {
                    summary.failed_count += 1;
                    summary.errors.push(format!("Row {row_number}: {e}"));
                }
            }
        }

        tracing::info!(
            success = summary.success_count,
            failed = summary.failed_count,
            "Bulk import into {year_month} finished"
        );

        Ok(summary)
    }

    async fn import_row(&self, row: &RawImportRow, year_month: &str) -> AppResult<()> {
        let order_id = match self
            .store
            .find_order(&row.company, &row.model, &row.part_number)
            .await?
        {
            Some(order) => {
                // Existing record: refresh descriptive fields only.
                self.store
                    .update_order(
                        order.id,
                        &OrderUpdate {
                            part_name: Some(row.part_name.clone()),
                            note: Some(row.note.clone()),
                            ..OrderUpdate::default()
                        },
                    )
                    .await?;
                order.id
            }
            None => {
                let order = self
                    .store
                    .create_order(&NewOrder {
                        company: row.company.clone(),
                        model: row.model.clone(),
                        part_number: row.part_number.clone(),
                        part_name: row.part_name.clone(),
                        note: row.note.clone(),
                    })
                    .await?;
                order.id
            }
        };

        // Two import rows can target the same natural key; re-clear this
        // order's month row before inserting the fresh one.
        self.store
            .delete_monthly_overrides(year_month, Some(order_id))
            .await?;

        let in_qty = row.in_qty.unwrap_or(0);
        let out_qty = row.out_qty.unwrap_or(0);
        self.store
            .upsert_monthly_override(&MonthlyOverride {
                year_month: year_month.to_string(),
                order_id,
                in_qty: Some(in_qty),
                out_qty: Some(out_qty),
                stock_qty: Some(in_qty - out_qty),
                order_qty: Some(row.order_qty.unwrap_or(0)),
            })
            .await?;

        Ok(())
    }
}
