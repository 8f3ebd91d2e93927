//! HTTP handlers for dashboard reporting

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::reporting::{MonthlyInboundTotal, ReportingService};
use crate::AppState;

/// Per-month inbound totals for the trend chart
pub async fn inbound_trend(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<MonthlyInboundTotal>>> {
    let service = ReportingService::new(state.store);
    let trend = service.inbound_trend().await?;
    Ok(Json(trend))
}
