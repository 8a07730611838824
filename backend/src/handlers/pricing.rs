//! HTTP handlers for pricing endpoints

use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};
use validator::Validate;

use crate::error::AppResult;
use crate::models::{InventoryQuery, QuoteRequest, QuoteResponse};
use crate::services::{PricingService, ReportingService};
use crate::AppState;

fn service(state: &AppState) -> PricingService {
    PricingService::new(state.config.engine.clone(), state.config.inventory.clone())
}

/// Quote a price for a single item
pub async fn quote_price(
    State(state): State<AppState>,
    Json(input): Json<QuoteRequest>,
) -> AppResult<Json<QuoteResponse>> {
    input.validate()?;
    let quote = service(&state).quote(&input)?;
    Ok(Json(quote))
}

/// Price the whole inventory, as JSON or as a CSV of item rows
pub async fn get_inventory_pricing(
    State(state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> AppResult<Response> {
    query.validate()?;
    let format = query.output_format()?;
    let report = service(&state).inventory_report(query.dso).await?;
    ReportingService::respond(format, &report, &report.items, "inventory_pricing.csv")
}
