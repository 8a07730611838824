//! Profitability report models

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{check, checked, checked_sum, EngineResult};
use crate::types::{percent_of, round_money, Days, Money, Rate};
use crate::validation::{validate_fraction, validate_non_negative};

use super::CustomerType;

/// Additional cost categories beyond the direct cost of goods
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    Financing,
    Storage,
    Commission,
    Logistics,
    Risk,
    Administration,
    Other,
}

impl CostCategory {
    pub const ALL: [CostCategory; 7] = [
        CostCategory::Financing,
        CostCategory::Storage,
        CostCategory::Commission,
        CostCategory::Logistics,
        CostCategory::Risk,
        CostCategory::Administration,
        CostCategory::Other,
    ];

    /// Categories used by the customer analysis unless configured otherwise
    pub const CUSTOMER_DEFAULT: [CostCategory; 5] = [
        CostCategory::Financing,
        CostCategory::Storage,
        CostCategory::Commission,
        CostCategory::Logistics,
        CostCategory::Risk,
    ];
}

impl std::fmt::Display for CostCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CostCategory::Financing => write!(f, "Financing"),
            CostCategory::Storage => write!(f, "Storage"),
            CostCategory::Commission => write!(f, "Commission"),
            CostCategory::Logistics => write!(f, "Logistics"),
            CostCategory::Risk => write!(f, "Risk"),
            CostCategory::Administration => write!(f, "Administration"),
            CostCategory::Other => write!(f, "Other"),
        }
    }
}

/// Amount per active cost category; absent categories were not part of the analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CostBreakdown(BTreeMap<CostCategory, Money>);

impl CostBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: CostCategory, amount: Money) {
        self.0.insert(category, amount);
    }

    pub fn get(&self, category: CostCategory) -> Option<Money> {
        self.0.get(&category).copied()
    }

    /// Amount for a category, zero when the category is absent
    pub fn amount(&self, category: CostCategory) -> Money {
        self.get(category).unwrap_or(Decimal::ZERO)
    }

    pub fn contains(&self, category: CostCategory) -> bool {
        self.0.contains_key(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CostCategory, Money)> + '_ {
        self.0.iter().map(|(category, amount)| (*category, *amount))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of every present entry, in category order
    pub fn total(&self) -> EngineResult<Money> {
        checked_sum(self.0.values().copied().map(Ok), "additional costs")
    }
}

impl FromIterator<(CostCategory, Money)> for CostBreakdown {
    fn from_iter<I: IntoIterator<Item = (CostCategory, Money)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Qualitative profitability classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ProfitabilityStatus {
    /// Margin at or below zero
    Loss,
    /// 0-8%
    Weak,
    /// 8-15%
    Good,
    /// Above 15%
    Excellent,
}

impl std::fmt::Display for ProfitabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfitabilityStatus::Loss => write!(f, "Loss"),
            ProfitabilityStatus::Weak => write!(f, "Weak"),
            ProfitabilityStatus::Good => write!(f, "Good"),
            ProfitabilityStatus::Excellent => write!(f, "Excellent"),
        }
    }
}

pub const EXCELLENT_MARGIN: Rate = dec!(0.15);
pub const GOOD_MARGIN: Rate = dec!(0.08);

/// Classify a real-profit margin
pub fn classify_margin(margin: Rate) -> ProfitabilityStatus {
    if margin > EXCELLENT_MARGIN {
        ProfitabilityStatus::Excellent
    } else if margin > GOOD_MARGIN {
        ProfitabilityStatus::Good
    } else if margin > Decimal::ZERO {
        ProfitabilityStatus::Weak
    } else {
        ProfitabilityStatus::Loss
    }
}

/// Paper profit versus real profit for a customer or period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfitabilityReport {
    pub total_sales: Money,
    pub total_cost: Money,
    pub paper_profit: Money,
    pub costs: CostBreakdown,
    pub total_additional_costs: Money,
    pub real_profit: Money,
    /// `real_profit / total_sales`; zero when there are no sales
    pub profit_margin: Rate,
    pub status: ProfitabilityStatus,
}

impl ProfitabilityReport {
    /// Derive every dependent figure from sales, cost and the cost breakdown
    pub fn from_parts(
        total_sales: Money,
        total_cost: Money,
        costs: CostBreakdown,
    ) -> EngineResult<Self> {
        let paper_profit = checked(total_sales.checked_sub(total_cost), "paper profit")?;
        let total_additional_costs = costs.total()?;
        let real_profit = checked(
            paper_profit.checked_sub(total_additional_costs),
            "real profit",
        )?;
        let profit_margin = if total_sales.is_zero() {
            Decimal::ZERO
        } else {
            checked(real_profit.checked_div(total_sales), "profit margin")?
        };

        Ok(Self {
            total_sales,
            total_cost,
            paper_profit,
            costs,
            total_additional_costs,
            real_profit,
            profit_margin,
            status: classify_margin(profit_margin),
        })
    }

    /// Share of sales consumed by one cost category, in percent
    pub fn cost_share_percent(&self, category: CostCategory) -> Decimal {
        percent_of(self.costs.amount(category), self.total_sales)
    }

    /// How much of the paper profit the additional costs ate
    pub fn profit_erosion(&self) -> Money {
        self.paper_profit - self.real_profit
    }
}

/// Result of a profitability analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ProfitabilityAnalysis {
    /// No transactions to analyse; there are no numbers to read
    NoData,
    Report(ProfitabilityReport),
}

impl ProfitabilityAnalysis {
    pub fn report(&self) -> Option<&ProfitabilityReport> {
        match self {
            ProfitabilityAnalysis::Report(report) => Some(report),
            ProfitabilityAnalysis::NoData => None,
        }
    }

    pub fn into_report(self) -> Option<ProfitabilityReport> {
        match self {
            ProfitabilityAnalysis::Report(report) => Some(report),
            ProfitabilityAnalysis::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, ProfitabilityAnalysis::NoData)
    }
}

/// Pre-aggregated figures for a customer or period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateInput {
    pub total_sales: Money,
    pub total_cost: Money,
    pub dso: Days,
    #[serde(default = "default_aggregate_payment_history")]
    pub payment_history: Rate,
    /// Average age of the goods sold, used for storage cost
    #[serde(default)]
    pub average_days_in_stock: Days,
}

fn default_aggregate_payment_history() -> Rate {
    Decimal::ONE
}

impl AggregateInput {
    pub fn validate(&self) -> EngineResult<()> {
        check("total_sales", validate_non_negative(self.total_sales))?;
        check("total_cost", validate_non_negative(self.total_cost))?;
        check("payment_history", validate_fraction(self.payment_history))
    }
}

/// One flat row per analysed customer for tabular export
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfitabilityExportRow {
    pub customer: String,
    pub dso: Days,
    pub customer_type: String,
    pub total_sales: Money,
    pub total_cost: Money,
    pub paper_profit: Money,
    pub real_profit: Money,
    pub profit_margin: Rate,
    pub status: String,
    pub financing: Option<Money>,
    pub storage: Option<Money>,
    pub commission: Option<Money>,
    pub logistics: Option<Money>,
    pub risk: Option<Money>,
    pub administration: Option<Money>,
    pub other: Option<Money>,
    pub total_additional_costs: Money,
}

impl ProfitabilityExportRow {
    pub fn new(
        customer: &str,
        dso: Days,
        customer_type: CustomerType,
        report: &ProfitabilityReport,
    ) -> Self {
        let cost = |category| report.costs.get(category).map(round_money);
        Self {
            customer: customer.to_string(),
            dso,
            customer_type: customer_type.to_string(),
            total_sales: round_money(report.total_sales),
            total_cost: round_money(report.total_cost),
            paper_profit: round_money(report.paper_profit),
            real_profit: round_money(report.real_profit),
            profit_margin: report.profit_margin.round_dp(4),
            status: report.status.to_string(),
            financing: cost(CostCategory::Financing),
            storage: cost(CostCategory::Storage),
            commission: cost(CostCategory::Commission),
            logistics: cost(CostCategory::Logistics),
            risk: cost(CostCategory::Risk),
            administration: cost(CostCategory::Administration),
            other: cost(CostCategory::Other),
            total_additional_costs: round_money(report.total_additional_costs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineError;

    #[test]
    fn test_classify_margin_thresholds() {
        assert_eq!(classify_margin(dec!(0.20)), ProfitabilityStatus::Excellent);
        assert_eq!(classify_margin(dec!(0.15)), ProfitabilityStatus::Good);
        assert_eq!(classify_margin(dec!(0.08)), ProfitabilityStatus::Weak);
        assert_eq!(classify_margin(dec!(0.0001)), ProfitabilityStatus::Weak);
        assert_eq!(classify_margin(Decimal::ZERO), ProfitabilityStatus::Loss);
        assert_eq!(classify_margin(dec!(-0.3)), ProfitabilityStatus::Loss);
    }

    #[test]
    fn test_breakdown_total_sums_present_entries() {
        let costs: CostBreakdown = [
            (CostCategory::Financing, dec!(328.77)),
            (CostCategory::Commission, dec!(1500)),
        ]
        .into_iter()
        .collect();
        assert_eq!(costs.total().unwrap(), dec!(1828.77));
        assert_eq!(costs.amount(CostCategory::Risk), Decimal::ZERO);
        assert!(!costs.contains(CostCategory::Risk));
    }

    #[test]
    fn test_report_zero_sales() {
        let report =
            ProfitabilityReport::from_parts(Decimal::ZERO, dec!(100), CostBreakdown::new()).unwrap();
        assert_eq!(report.profit_margin, Decimal::ZERO);
        assert_eq!(report.status, ProfitabilityStatus::Loss);
        assert_eq!(report.real_profit, dec!(-100));
    }

    #[test]
    fn test_report_overflow_is_an_error() {
        let costs: CostBreakdown = [
            (CostCategory::Financing, Decimal::MAX),
            (CostCategory::Storage, Decimal::MAX),
        ]
        .into_iter()
        .collect();
        assert!(matches!(
            ProfitabilityReport::from_parts(dec!(100), dec!(50), costs),
            Err(EngineError::Overflow("additional costs"))
        ));

        let mut huge = CostBreakdown::new();
        huge.insert(CostCategory::Other, Decimal::MAX);
        assert!(matches!(
            ProfitabilityReport::from_parts(dec!(0.01), Decimal::ZERO, huge),
            Err(EngineError::Overflow("profit margin"))
        ));
    }

    #[test]
    fn test_no_data_serializes_with_tag() {
        let json = serde_json::to_value(ProfitabilityAnalysis::NoData).unwrap();
        assert_eq!(json["result"], "no_data");
    }

    #[test]
    fn test_breakdown_serializes_as_map() {
        let mut costs = CostBreakdown::new();
        costs.insert(CostCategory::Storage, dec!(12.5));
        let json = serde_json::to_value(&costs).unwrap();
        assert_eq!(json["storage"], "12.5");
    }
}
