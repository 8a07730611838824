//! HTTP handlers for profitability analysis endpoints

use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};
use engine::ProfitabilityExportRow;
use validator::Validate;

use crate::error::AppResult;
use crate::models::{
    AggregateAnalysisRequest, CustomerAnalysisRequest, FormatQuery, WhatIfRequest, WhatIfResponse,
};
use crate::services::{ProfitabilityService, ReportingService};
use crate::AppState;

fn service(state: &AppState) -> ProfitabilityService {
    ProfitabilityService::new(state.config.engine.clone())
}

/// Analyse a customer's transactions
pub async fn analyze_customer(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
    Json(input): Json<CustomerAnalysisRequest>,
) -> AppResult<Response> {
    input.validate()?;
    let format = query.output_format()?;
    let response = service(&state).analyze_customer(&input)?;
    let rows = ProfitabilityService::export_rows(&response);
    ReportingService::respond(format, &response, &rows, "customer_profitability.csv")
}

/// Analyse pre-aggregated sales and cost figures
pub async fn analyze_aggregate(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
    Json(input): Json<AggregateAnalysisRequest>,
) -> AppResult<Response> {
    input.validate()?;
    let format = query.output_format()?;
    let response = service(&state).analyze_aggregate(&input)?;
    let rows = [ProfitabilityExportRow::new(
        &response.name,
        input.input.dso,
        input.customer_type,
        &response.report,
    )];
    ReportingService::respond(format, &response, &rows, "aggregate_profitability.csv")
}

/// Compare a customer's baseline against alternative terms
pub async fn what_if(
    State(state): State<AppState>,
    Json(input): Json<WhatIfRequest>,
) -> AppResult<Json<WhatIfResponse>> {
    input.validate()?;
    let response = service(&state).what_if(&input)?;
    Ok(Json(response))
}
