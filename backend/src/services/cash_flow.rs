//! Cash-flow service: monthly and daily projections

use engine::cash_flow::{project_daily, project_horizon};
use engine::recommendations::cash_flow_advice;
use engine::{DailyCashFlowAssumptions, DailyCashFlowProjection, MONTHS_PER_YEAR};

use crate::error::AppResult;
use crate::models::{CashFlowRequest, CashFlowResponse};

#[derive(Clone, Default)]
pub struct CashFlowService;

impl CashFlowService {
    pub fn new() -> Self {
        Self
    }

    /// Monthly projection over the requested horizon, twelve months by default
    pub fn project(&self, req: &CashFlowRequest) -> AppResult<CashFlowResponse> {
        let months = req.months.unwrap_or(MONTHS_PER_YEAR as u32);
        let projection = project_horizon(&req.assumptions, months)?;
        let advice = cash_flow_advice(&projection, req.assumptions.dso, req.assumptions.dpo)
            .iter()
            .map(ToString::to_string)
            .collect();

        tracing::info!(
            months,
            minimum_cash = %projection.summary.minimum_cash,
            financing_required = %projection.summary.financing_required,
            "Cash flow projected"
        );

        Ok(CashFlowResponse { projection, advice })
    }

    pub fn project_daily(
        &self,
        assumptions: &DailyCashFlowAssumptions,
    ) -> AppResult<DailyCashFlowProjection> {
        let projection = project_daily(assumptions)?;
        tracing::info!(
            start = %assumptions.start_date,
            days = assumptions.horizon_days,
            minimum_cash = %projection.minimum_cash,
            "Daily cash flow projected"
        );
        Ok(projection)
    }
}
