//! HTTP handlers for cash-flow projection endpoints

use axum::{extract::Query, response::Response, Json};
use engine::DailyCashFlowAssumptions;
use validator::Validate;

use crate::error::AppResult;
use crate::models::{CashFlowRequest, FormatQuery};
use crate::services::{CashFlowService, ReportingService};

/// Monthly projection; CSV output contains one row per month
pub async fn project_cash_flow(
    Query(query): Query<FormatQuery>,
    Json(input): Json<CashFlowRequest>,
) -> AppResult<Response> {
    input.validate()?;
    let format = query.output_format()?;
    let response = CashFlowService::new().project(&input)?;
    ReportingService::respond(format, &response, &response.projection.months, "cash_flow.csv")
}

/// Daily projection of scheduled receipts and payments
pub async fn project_daily_cash_flow(
    Query(query): Query<FormatQuery>,
    Json(input): Json<DailyCashFlowAssumptions>,
) -> AppResult<Response> {
    let format = query.output_format()?;
    let projection = CashFlowService::new().project_daily(&input)?;
    ReportingService::respond(format, &projection, &projection.days, "daily_cash_flow.csv")
}
