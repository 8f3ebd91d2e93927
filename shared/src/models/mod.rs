//! Domain models for the Parts Inventory Management system

mod audit;
mod monthly;
mod order;
mod view;

pub use audit::*;
pub use monthly::*;
pub use order::*;
pub use view::*;
