//! What-if scenarios for a customer analysis
//!
//! Each scenario re-runs or adjusts an analysis with one input changed and
//! reports the difference against the baseline. Inputs are never mutated.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::{CostOptions, EngineParameters};
use crate::error::{check, checked, EngineResult};
use crate::models::{CostCategory, Customer, ProfitabilityAnalysis, ProfitabilityReport};
use crate::profitability::analyze;
use crate::types::{Days, Money, Rate};
use crate::validation::{validate_fraction, validate_percentage};

/// Share of the risk cost saved by a better payment history
pub const DEFAULT_RISK_IMPROVEMENT_SHARE: Rate = dec!(0.30);

/// Same customer re-analysed with a different DSO
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DsoScenario {
    pub baseline_dso: Days,
    pub new_dso: Days,
    pub baseline: ProfitabilityAnalysis,
    pub modified: ProfitabilityAnalysis,
    /// Baseline financing minus modified financing; negative when terms get longer
    pub financing_savings: Money,
}

pub fn dso_change(
    customer: &Customer,
    new_dso: Days,
    params: &EngineParameters,
    options: &CostOptions,
) -> EngineResult<DsoScenario> {
    let baseline = analyze(customer, params, options)?;
    let modified = analyze(&customer.with_dso(new_dso), params, options)?;
    let financing_savings = checked(
        financing_of(&baseline).checked_sub(financing_of(&modified)),
        "financing savings",
    )?;

    tracing::debug!(
        customer = %customer.name,
        from = customer.dso,
        to = new_dso,
        savings = %financing_savings,
        "DSO scenario evaluated"
    );

    Ok(DsoScenario {
        baseline_dso: customer.dso,
        new_dso,
        baseline,
        modified,
        financing_savings,
    })
}

fn financing_of(analysis: &ProfitabilityAnalysis) -> Money {
    analysis
        .report()
        .map(|report| report.costs.amount(CostCategory::Financing))
        .unwrap_or(Decimal::ZERO)
}

/// Effect of granting an early-payment discount on all sales
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscountScenario {
    pub discount_percent: Decimal,
    pub discounted_sales: Money,
    pub discount_amount: Money,
    pub real_profit_after_discount: Money,
}

pub fn early_payment_discount(
    report: &ProfitabilityReport,
    discount_percent: Decimal,
) -> EngineResult<DiscountScenario> {
    check("discount_percent", validate_percentage(discount_percent))?;

    let discount_amount = checked(
        report
            .total_sales
            .checked_mul(discount_percent / Decimal::ONE_HUNDRED),
        "discount amount",
    )?;
    Ok(DiscountScenario {
        discount_percent,
        discounted_sales: checked(
            report.total_sales.checked_sub(discount_amount),
            "discounted sales",
        )?,
        discount_amount,
        real_profit_after_discount: checked(
            report.real_profit.checked_sub(discount_amount),
            "real profit after discount",
        )?,
    })
}

/// Risk cost saved if the customer starts paying more reliably
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentHistoryScenario {
    pub improvement_share: Rate,
    pub current_risk: Money,
    pub risk_savings: Money,
    pub real_profit_after: Money,
}

pub fn payment_history_improvement(
    report: &ProfitabilityReport,
    improvement_share: Rate,
) -> EngineResult<PaymentHistoryScenario> {
    check("improvement_share", validate_fraction(improvement_share))?;

    let current_risk = report.costs.amount(CostCategory::Risk);
    let risk_savings = checked(current_risk.checked_mul(improvement_share), "risk savings")?;
    Ok(PaymentHistoryScenario {
        improvement_share,
        current_risk,
        risk_savings,
        real_profit_after: checked(
            report.real_profit.checked_add(risk_savings),
            "real profit after",
        )?,
    })
}

/// Differences between two reports, `modified - baseline`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioComparison {
    pub real_profit_delta: Money,
    pub profit_margin_delta: Rate,
    pub additional_costs_delta: Money,
    pub status_changed: bool,
}

pub fn compare(
    baseline: &ProfitabilityReport,
    modified: &ProfitabilityReport,
) -> EngineResult<ScenarioComparison> {
    let delta = |after: Money, before: Money, what| checked(after.checked_sub(before), what);
    Ok(ScenarioComparison {
        real_profit_delta: delta(modified.real_profit, baseline.real_profit, "real profit delta")?,
        profit_margin_delta: delta(
            modified.profit_margin,
            baseline.profit_margin,
            "profit margin delta",
        )?,
        additional_costs_delta: delta(
            modified.total_additional_costs,
            baseline.total_additional_costs,
            "additional costs delta",
        )?,
        status_changed: modified.status != baseline.status,
    })
}
