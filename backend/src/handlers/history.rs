//! HTTP handlers for the edit history screen

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use shared::AuditEntry;

use crate::error::AppResult;
use crate::services::inventory::InventoryService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub order_id: Option<i64>,
}

/// List audit entries, newest first, optionally for one order
pub async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<AuditEntry>>> {
    let service = InventoryService::new(state.store);
    let entries = service.history(query.order_id).await?;
    Ok(Json(entries))
}
