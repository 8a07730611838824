//! HTTP request handlers

pub mod cash_flow;
pub mod health;
pub mod pricing;
pub mod profitability;
pub mod settings;

pub use cash_flow::*;
pub use health::*;
pub use pricing::*;
pub use profitability::*;
pub use settings::*;
