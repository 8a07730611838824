//! Profitability service: customer analysis, aggregate analysis and what-if runs

use engine::profitability::{analyze, analyze_aggregate};
use engine::recommendations::customer_advice;
use engine::what_if::{
    compare, dso_change, early_payment_discount, payment_history_improvement,
    DEFAULT_RISK_IMPROVEMENT_SHARE,
};
use engine::{EngineParameters, ProfitabilityAnalysis, ProfitabilityExportRow};

use crate::error::{AppError, AppResult};
use crate::models::{
    AggregateAnalysisRequest, AggregateAnalysisResponse, CostShare, CustomerAnalysisRequest,
    CustomerAnalysisResponse, WhatIfRequest, WhatIfResponse,
};

#[derive(Clone)]
pub struct ProfitabilityService {
    params: EngineParameters,
}

impl ProfitabilityService {
    pub fn new(params: EngineParameters) -> Self {
        Self { params }
    }

    pub fn analyze_customer(
        &self,
        req: &CustomerAnalysisRequest,
    ) -> AppResult<CustomerAnalysisResponse> {
        let params = req.parameters.apply(&self.params)?;
        req.customer.validate()?;
        req.costs.validate()?;

        let analysis = analyze(&req.customer, &params, &req.costs)?;
        let (cost_shares, advice) = match analysis.report() {
            Some(report) => (
                CostShare::from_report(report),
                customer_advice(&req.customer, report, &params)
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        tracing::info!(
            customer = %req.customer.name,
            no_data = analysis.is_no_data(),
            "Customer profitability analysed"
        );

        Ok(CustomerAnalysisResponse {
            customer: req.customer.name.clone(),
            dso: req.customer.dso,
            customer_type: req.customer.customer_type,
            analysis,
            cost_shares,
            advice,
        })
    }

    pub fn analyze_aggregate(
        &self,
        req: &AggregateAnalysisRequest,
    ) -> AppResult<AggregateAnalysisResponse> {
        let params = req.parameters.apply(&self.params)?;
        req.input.validate()?;
        req.costs.validate()?;

        let report = analyze_aggregate(&req.input, &params, &req.costs)?;
        tracing::info!(name = %req.name, status = %report.status, "Aggregate profitability analysed");

        Ok(AggregateAnalysisResponse {
            name: req.name.clone(),
            cost_shares: CostShare::from_report(&report),
            report,
        })
    }

    /// Baseline analysis plus the requested scenarios
    pub fn what_if(&self, req: &WhatIfRequest) -> AppResult<WhatIfResponse> {
        let params = req.parameters.apply(&self.params)?;
        req.customer.validate()?;
        req.costs.validate()?;

        let baseline = match analyze(&req.customer, &params, &req.costs)? {
            ProfitabilityAnalysis::Report(report) => report,
            ProfitabilityAnalysis::NoData => {
                return Err(AppError::Validation {
                    field: "transactions".to_string(),
                    message: "Customer has no transactions to compare".to_string(),
                })
            }
        };

        let dso = req
            .new_dso
            .map(|new_dso| dso_change(&req.customer, new_dso, &params, &req.costs))
            .transpose()?;
        let dso_comparison = dso
            .as_ref()
            .and_then(|scenario| scenario.modified.report())
            .map(|modified| compare(&baseline, modified))
            .transpose()?;
        let early_payment = req
            .discount_percent
            .map(|percent| early_payment_discount(&baseline, percent))
            .transpose()?;
        let payment_history = payment_history_improvement(
            &baseline,
            req.risk_improvement_share.unwrap_or(DEFAULT_RISK_IMPROVEMENT_SHARE),
        )?;

        Ok(WhatIfResponse {
            baseline,
            dso,
            dso_comparison,
            early_payment,
            payment_history,
        })
    }

    /// One CSV row per analysed customer; customers without data are skipped
    pub fn export_rows(response: &CustomerAnalysisResponse) -> Vec<ProfitabilityExportRow> {
        response
            .analysis
            .report()
            .map(|report| {
                ProfitabilityExportRow::new(
                    &response.customer,
                    response.dso,
                    response.customer_type,
                    report,
                )
            })
            .into_iter()
            .collect()
    }
}
