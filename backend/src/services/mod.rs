//! Business logic services for the dynamic pricing server

pub mod cash_flow;
pub mod pricing;
pub mod profitability;
pub mod reporting;

pub use cash_flow::CashFlowService;
pub use pricing::PricingService;
pub use profitability::ProfitabilityService;
pub use reporting::ReportingService;
