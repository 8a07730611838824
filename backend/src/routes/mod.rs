//! Route definitions for the dynamic pricing API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/settings", get(handlers::get_settings))
        .nest("/pricing", pricing_routes())
        .nest("/profitability", profitability_routes())
        .nest("/cash-flow", cash_flow_routes())
}

/// Price quotes and inventory pricing
fn pricing_routes() -> Router<AppState> {
    Router::new()
        .route("/quote", post(handlers::quote_price))
        .route("/inventory", get(handlers::get_inventory_pricing))
}

/// Customer and aggregate profitability, scenario comparison
fn profitability_routes() -> Router<AppState> {
    Router::new()
        .route("/customer", post(handlers::analyze_customer))
        .route("/aggregate", post(handlers::analyze_aggregate))
        .route("/what-if", post(handlers::what_if))
}

/// Monthly and daily cash-flow projections
fn cash_flow_routes() -> Router<AppState> {
    Router::new()
        .route("/projection", post(handlers::project_cash_flow))
        .route("/daily", post(handlers::project_daily_cash_flow))
}
