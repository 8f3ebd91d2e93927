//! Parts Inventory Management - backend library
//!
//! Suppliers register inbound stock, monthly figures are reconciled against
//! cumulative order records, and staff browse, edit, alert on, and export the
//! derived view rows.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod store;

pub use config::Config;

use store::RecordStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub config: Arc<Config>,
}
