//! HTTP handlers for the Parts Inventory Management API

mod alerts;
mod health;
mod history;
mod imports;
mod inventory;
mod reporting;

pub use alerts::*;
pub use health::*;
pub use history::*;
pub use imports::*;
pub use inventory::*;
pub use reporting::*;
