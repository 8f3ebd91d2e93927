//! Shared types and domain logic for the Parts Inventory Management system
//!
//! This crate contains the persistence-free core: the record models, the
//! monthly stock reconciler, the alert classifier, and the cell-edit parser.
//! The backend crate supplies storage and transport around it.

pub mod alerts;
pub mod edits;
pub mod models;
pub mod reconcile;
pub mod validation;

pub use alerts::*;
pub use edits::*;
pub use models::*;
pub use reconcile::*;
pub use validation::*;
