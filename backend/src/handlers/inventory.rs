//! HTTP handlers for inventory endpoints

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use shared::{current_month, ViewRow};

use crate::error::AppResult;
use crate::services::inventory::{
    EditCellRequest, EditOrderRequest, InventoryService, RegisterInboundInput,
};
use crate::AppState;

/// Month selector shared by the view, export, and alert endpoints.
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

impl MonthQuery {
    pub fn month_or_current(&self) -> String {
        self.month.clone().unwrap_or_else(current_month)
    }
}

/// List reconciled rows for the requested month (default: current month)
pub async fn list_inventory(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<Vec<ViewRow>>> {
    let service = InventoryService::new(state.store);
    let rows = service.month_view(&query.month_or_current()).await?;
    Ok(Json(rows))
}

/// List months that carry override data
pub async fn list_months(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let service = InventoryService::new(state.store);
    let months = service.months().await?;
    Ok(Json(months))
}

/// Register inbound stock
pub async fn register_inbound(
    State(state): State<AppState>,
    Json(input): Json<RegisterInboundInput>,
) -> AppResult<Json<ViewRow>> {
    let service = InventoryService::new(state.store);
    let row = service.register_inbound(input).await?;
    Ok(Json(row))
}

/// Replace a record's quantities and note from the edit form
pub async fn edit_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
    Json(request): Json<EditOrderRequest>,
) -> AppResult<Json<ViewRow>> {
    let service = InventoryService::new(state.store);
    let row = service.edit_order(order_id, request).await?;
    Ok(Json(row))
}

/// Apply a single-cell edit to the current month's view
pub async fn edit_cell(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
    Json(request): Json<EditCellRequest>,
) -> AppResult<Json<ViewRow>> {
    let service = InventoryService::new(state.store);
    let row = service
        .edit_cell(order_id, request.field, &request.value, &request.actor_name)
        .await?;
    Ok(Json(row))
}

/// Delete a cumulative order record
pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> AppResult<Json<()>> {
    let service = InventoryService::new(state.store);
    service.delete_order(order_id).await?;
    Ok(Json(()))
}

/// Export the month view as CSV
pub async fn export_inventory(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> AppResult<impl IntoResponse> {
    let service = InventoryService::new(state.store);
    let csv = service.export_csv(&query.month_or_current()).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"inventory_data.csv\"",
            ),
        ],
        csv,
    ))
}
