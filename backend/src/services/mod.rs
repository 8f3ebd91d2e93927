//! Business services for the Parts Inventory Management backend

pub mod import;
pub mod inventory;
pub mod reporting;
