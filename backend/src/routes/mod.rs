//! Route definitions for the Parts Inventory Management API

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Inventory browsing and mutations
        .nest("/inventory", inventory_routes())
        // Bulk import
        .nest("/import", import_routes())
        // Stock alerts
        .nest("/alerts", alert_routes())
        // Edit history
        .nest("/history", history_routes())
        // Dashboard reporting
        .nest("/dashboard", dashboard_routes())
}

/// Inventory routes
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_inventory).post(handlers::register_inbound),
        )
        .route("/months", get(handlers::list_months))
        .route("/export", get(handlers::export_inventory))
        .route(
            "/:order_id",
            put(handlers::edit_order).delete(handlers::delete_order),
        )
        .route("/:order_id/cells", put(handlers::edit_cell))
}

/// Bulk import routes
fn import_routes() -> Router<AppState> {
    Router::new().route("/", post(handlers::run_import))
}

/// Alert routes
fn alert_routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::list_alerts))
}

/// Edit history routes
fn history_routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::list_history))
}

/// Dashboard routes
fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/inbound-trend", get(handlers::inbound_trend))
}
