//! Request and response models for the HTTP API
//!
//! Domain types come from the engine crate; this module adds the request
//! envelopes, per-request parameter overrides and response shapes.

use engine::pricing::{InventorySummary, PriceAdvice, PricingRecommendation};
use engine::what_if::{DiscountScenario, DsoScenario, PaymentHistoryScenario, ScenarioComparison};
use engine::{
    AggregateInput, CashFlowAssumptions, CashFlowProjection, CostOptions, Customer, CustomerType,
    EngineParameters, EngineResult, InventoryStatus, PriceAction, ProfitabilityAnalysis,
    ProfitabilityReport, Urgency,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::AppError;

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    engine::validation::validate_non_negative(*value).map_err(|message| {
        let mut error = ValidationError::new("non_negative");
        error.message = Some(message.into());
        error
    })
}

fn fraction(value: &Decimal) -> Result<(), ValidationError> {
    engine::validation::validate_fraction(*value).map_err(|message| {
        let mut error = ValidationError::new("fraction");
        error.message = Some(message.into());
        error
    })
}

// ============================================================================
// Output format
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct FormatQuery {
    pub format: Option<String>, // "json" or "csv"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl FormatQuery {
    pub fn output_format(&self) -> Result<OutputFormat, AppError> {
        match self.format.as_deref() {
            None | Some("json") => Ok(OutputFormat::Json),
            Some("csv") => Ok(OutputFormat::Csv),
            Some(other) => Err(AppError::UnsupportedFormat(other.to_string())),
        }
    }
}

// ============================================================================
// Parameter overrides
// ============================================================================

/// Per-request changes to the configured engine parameters
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ParameterOverrides {
    #[validate(range(max = 3650))]
    pub supplier_terms_days: Option<u32>,
    #[validate(custom = "non_negative")]
    pub annual_interest_rate: Option<Decimal>,
    #[validate(custom = "non_negative")]
    pub monthly_storage_rate: Option<Decimal>,
    #[validate(custom = "fraction")]
    pub commission_rate: Option<Decimal>,
    #[validate(custom = "fraction")]
    pub logistics_rate: Option<Decimal>,
    #[validate(custom = "fraction")]
    pub risk_coefficient: Option<Decimal>,
    #[validate(custom = "non_negative")]
    pub floor_ratio: Option<Decimal>,
}

impl ParameterOverrides {
    /// Copy of `base` with every override applied; `base` is left untouched
    pub fn apply(&self, base: &EngineParameters) -> EngineResult<EngineParameters> {
        let mut params = base.clone();
        if let Some(days) = self.supplier_terms_days {
            params.supplier_terms_days = days;
        }
        if let Some(rate) = self.annual_interest_rate {
            params.annual_interest_rate = rate;
        }
        if let Some(rate) = self.monthly_storage_rate {
            params.monthly_storage_rate = rate;
        }
        if let Some(rate) = self.commission_rate {
            params.commission_rate = rate;
        }
        if let Some(rate) = self.logistics_rate {
            params.logistics_rate = rate;
        }
        if let Some(rate) = self.risk_coefficient {
            params.risk_coefficient = rate;
        }
        if let Some(ratio) = self.floor_ratio {
            params.pricing.floor_ratio = ratio;
        }
        params.validate()?;
        Ok(params)
    }
}

// ============================================================================
// Settings
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub parameters: EngineParameters,
    pub inventory_dso: u32,
    pub inventory_source: Option<String>,
}

// ============================================================================
// Pricing
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct QuoteRequest {
    #[validate(custom = "non_negative")]
    pub cost_price: Decimal,
    #[validate(custom = "non_negative")]
    pub current_price: Decimal,
    #[validate(range(min = 1, max = 1000000))]
    pub quantity: u32,
    #[validate(range(max = 3650))]
    pub days_in_stock: u32,
    #[validate(range(max = 3650))]
    pub dso: u32,
    #[serde(default)]
    #[validate]
    pub parameters: ParameterOverrides,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub recommended_price: Decimal,
    pub price_floor: Decimal,
    pub status: InventoryStatus,
    pub action: PriceAction,
    pub urgency: Urgency,
    pub cash_gap_days: u32,
    pub financing_cost: Decimal,
    pub unit_profit: Decimal,
    pub total_value: Decimal,
    pub discount_percent: Decimal,
    pub advice: PriceAdvice,
    pub message: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct InventoryQuery {
    #[validate(range(max = 3650))]
    pub dso: Option<u32>,
    pub format: Option<String>,
}

impl InventoryQuery {
    pub fn output_format(&self) -> Result<OutputFormat, AppError> {
        FormatQuery {
            format: self.format.clone(),
        }
        .output_format()
    }
}

#[derive(Debug, Serialize)]
pub struct InventoryReport {
    pub dso: u32,
    pub source: engine::dataset::InventorySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub items: Vec<PricingRecommendation>,
    pub summary: InventorySummary,
    pub advice: Vec<String>,
}

// ============================================================================
// Profitability
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CustomerAnalysisRequest {
    pub customer: Customer,
    #[serde(default)]
    #[validate]
    pub parameters: ParameterOverrides,
    #[serde(default)]
    pub costs: CostOptions,
}

#[derive(Debug, Serialize)]
pub struct CustomerAnalysisResponse {
    pub customer: String,
    pub dso: u32,
    pub customer_type: CustomerType,
    pub analysis: ProfitabilityAnalysis,
    /// Share of sales per cost category, in percent
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cost_shares: Vec<CostShare>,
    pub advice: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CostShare {
    pub category: engine::CostCategory,
    pub amount: Decimal,
    pub percent_of_sales: Decimal,
}

impl CostShare {
    pub fn from_report(report: &ProfitabilityReport) -> Vec<Self> {
        report
            .costs
            .iter()
            .map(|(category, amount)| CostShare {
                category,
                amount,
                percent_of_sales: report.cost_share_percent(category).round_dp(1),
            })
            .collect()
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AggregateAnalysisRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub customer_type: CustomerType,
    pub input: AggregateInput,
    #[serde(default)]
    #[validate]
    pub parameters: ParameterOverrides,
    #[serde(default)]
    pub costs: CostOptions,
}

#[derive(Debug, Serialize)]
pub struct AggregateAnalysisResponse {
    pub name: String,
    pub report: ProfitabilityReport,
    pub cost_shares: Vec<CostShare>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct WhatIfRequest {
    pub customer: Customer,
    #[serde(default)]
    #[validate]
    pub parameters: ParameterOverrides,
    #[serde(default)]
    pub costs: CostOptions,
    #[validate(range(max = 3650))]
    pub new_dso: Option<u32>,
    pub discount_percent: Option<Decimal>,
    #[validate(custom = "fraction")]
    pub risk_improvement_share: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct WhatIfResponse {
    pub baseline: ProfitabilityReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dso: Option<DsoScenario>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dso_comparison: Option<ScenarioComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub early_payment: Option<DiscountScenario>,
    pub payment_history: PaymentHistoryScenario,
}

// ============================================================================
// Cash flow
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CashFlowRequest {
    pub assumptions: CashFlowAssumptions,
    #[validate(range(min = 1, max = 120))]
    pub months: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CashFlowResponse {
    pub projection: CashFlowProjection,
    pub advice: Vec<String>,
}
