//! HTTP handlers for stock alert endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use shared::{classify_all, Alert};

use crate::error::AppResult;
use crate::handlers::inventory::MonthQuery;
use crate::services::inventory::InventoryService;
use crate::AppState;

/// Classify the month view and return alerts, most severe first
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<Vec<Alert>>> {
    let service = InventoryService::new(state.store);
    let rows = service.month_view(&query.month_or_current()).await?;
    Ok(Json(classify_all(&rows)))
}
