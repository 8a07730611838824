//! Pricing & profitability calculation engine
//!
//! Pure, synchronous calculations shared between the backend service and the
//! WASM bindings:
//! - age-tiered dynamic pricing with a financing-cost adjustment
//! - cost decomposition turning paper profit into real profit
//! - monthly and daily cash-flow projection
//! - advisory messages derived from the numbers above
//!
//! Every calculation takes its parameters explicitly, so two scenarios can be
//! evaluated side by side without interfering with each other.

pub mod cash_flow;
pub mod config;
pub mod cost_model;
pub mod dataset;
pub mod error;
pub mod models;
pub mod pricing;
pub mod profitability;
pub mod recommendations;
pub mod types;
pub mod validation;
pub mod what_if;

pub use config::*;
pub use error::{EngineError, EngineResult};
pub use models::*;
pub use types::*;
