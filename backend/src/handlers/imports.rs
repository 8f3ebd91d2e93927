//! HTTP handlers for bulk import

use axum::{extract::State, Json};
use serde::Deserialize;

use shared::current_month;

use crate::error::AppResult;
use crate::services::import::{ImportService, ImportSummary, RawImportRow};
use crate::AppState;

/// Bulk import request: the upload boundary has already turned the
/// spreadsheet into rows.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    /// Target month; defaults to the current month
    pub year_month: Option<String>,
    pub rows: Vec<RawImportRow>,
}

/// Import a batch of rows into one month, best effort
pub async fn run_import(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> AppResult<Json<ImportSummary>> {
    let service = ImportService::new(state.store);
    let year_month = request.year_month.unwrap_or_else(current_month);
    let summary = service.bulk_import(&request.rows, &year_month).await?;
    Ok(Json(summary))
}
