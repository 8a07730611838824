//! Domain models for the pricing & profitability engine

mod cash_flow;
mod customer;
mod inventory;
mod profitability;

pub use cash_flow::*;
pub use customer::*;
pub use inventory::*;
pub use profitability::*;
