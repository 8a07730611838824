//! Cash-flow projection models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{check, EngineError, EngineResult};
use crate::types::{Days, Money, Rate, MONTHS_PER_YEAR};
use crate::validation::{
    validate_fraction, validate_growth_rate, validate_non_negative, validate_seasonal_factors,
};

/// Winter (Dec-Feb) 0.8, summer (Jun-Aug) 1.2, shoulder months 1.0
pub const DEFAULT_SEASONAL_FACTORS: [Decimal; MONTHS_PER_YEAR] = [
    dec!(0.8),
    dec!(0.8),
    dec!(1.0),
    dec!(1.0),
    dec!(1.0),
    dec!(1.2),
    dec!(1.2),
    dec!(1.2),
    dec!(1.0),
    dec!(1.0),
    dec!(1.0),
    dec!(0.8),
];

pub const DEFAULT_DAILY_HORIZON: u32 = 30;
/// Longest daily projection, one leap year
pub const MAX_DAILY_HORIZON: u32 = 366;
pub const DEFAULT_RECURRING_INTERVAL: u32 = 7;

/// Inputs for the monthly projection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CashFlowAssumptions {
    /// Baseline sales for a neutral month
    pub monthly_sales: Money,
    /// Annual growth, compounded monthly
    pub growth_rate: Rate,
    pub dso: Days,
    pub dpo: Days,
    pub dio: Days,
    /// Cost of goods as a fraction of sales
    pub cogs_percentage: Rate,
    pub fixed_costs_per_month: Money,
    pub starting_cash: Money,
    /// Indexed by calendar month, January first
    #[serde(default = "default_seasonal_factors")]
    pub seasonal_factors: [Decimal; MONTHS_PER_YEAR],
}

fn default_seasonal_factors() -> [Decimal; MONTHS_PER_YEAR] {
    DEFAULT_SEASONAL_FACTORS
}

impl Default for CashFlowAssumptions {
    fn default() -> Self {
        Self {
            monthly_sales: dec!(100000),
            growth_rate: dec!(0.10),
            dso: 90,
            dpo: 60,
            dio: 45,
            cogs_percentage: dec!(0.70),
            fixed_costs_per_month: dec!(20000),
            starting_cash: dec!(50000),
            seasonal_factors: DEFAULT_SEASONAL_FACTORS,
        }
    }
}

impl CashFlowAssumptions {
    /// Same assumptions with every month weighted equally
    pub fn without_seasonality(mut self) -> Self {
        self.seasonal_factors = [Decimal::ONE; MONTHS_PER_YEAR];
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        check("monthly_sales", validate_non_negative(self.monthly_sales))?;
        check("growth_rate", validate_growth_rate(self.growth_rate))?;
        check("cogs_percentage", validate_fraction(self.cogs_percentage))?;
        check(
            "fixed_costs_per_month",
            validate_non_negative(self.fixed_costs_per_month),
        )?;
        check("seasonal_factors", validate_seasonal_factors(&self.seasonal_factors))
    }

    /// Signed cash conversion cycle in days: DIO + DSO - DPO
    pub fn cash_conversion_cycle(&self) -> i64 {
        i64::from(self.dio) + i64::from(self.dso) - i64::from(self.dpo)
    }
}

/// One row of the monthly projection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CashFlowMonth {
    /// 1-based month of the horizon
    pub month_index: u32,
    pub adjusted_sales: Money,
    pub cash_in: Money,
    pub cash_out: Money,
    pub net_cash_flow: Money,
    pub cumulative_cash: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CashFlowSummary {
    pub minimum_cash: Money,
    /// Month in which the minimum is first reached
    pub minimum_cash_month: u32,
    pub average_net_cash_flow: Money,
    pub ending_cash: Money,
    pub cash_conversion_cycle: i64,
    /// Amount needed to keep cash from going negative; zero when it never does
    pub financing_required: Money,
}

impl CashFlowSummary {
    pub fn needs_financing(&self) -> bool {
        self.financing_required > Decimal::ZERO
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CashFlowProjection {
    pub months: Vec<CashFlowMonth>,
    pub summary: CashFlowSummary,
    /// Sales made inside the horizon whose collection falls after it
    pub receivables_beyond_horizon: Money,
    /// Purchases made inside the horizon whose payment falls after it
    pub payables_beyond_horizon: Money,
}

/// A dated receipt or payment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledCashEvent {
    pub due_date: NaiveDate,
    pub amount: Money,
    #[serde(default)]
    pub description: Option<String>,
}

impl ScheduledCashEvent {
    pub fn new(due_date: NaiveDate, amount: Money) -> Self {
        Self {
            due_date,
            amount,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Fixed outflow repeating every `interval_days`, first on day `interval_days`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringOutflow {
    pub amount: Money,
    #[serde(default = "default_recurring_interval")]
    pub interval_days: u32,
}

fn default_recurring_interval() -> u32 {
    DEFAULT_RECURRING_INTERVAL
}

impl RecurringOutflow {
    pub fn weekly(amount: Money) -> Self {
        Self {
            amount,
            interval_days: DEFAULT_RECURRING_INTERVAL,
        }
    }

    /// Whether the outflow is due on a 1-based horizon day
    pub fn falls_on(&self, day_index: u32) -> bool {
        self.interval_days > 0 && day_index % self.interval_days == 0
    }
}

/// Inputs for the short-horizon daily projection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyCashFlowAssumptions {
    pub start_date: NaiveDate,
    #[serde(default = "default_daily_horizon")]
    pub horizon_days: u32,
    pub starting_cash: Money,
    #[serde(default)]
    pub receipts: Vec<ScheduledCashEvent>,
    #[serde(default)]
    pub payments: Vec<ScheduledCashEvent>,
    #[serde(default)]
    pub recurring_outflow: Option<RecurringOutflow>,
}

fn default_daily_horizon() -> u32 {
    DEFAULT_DAILY_HORIZON
}

impl DailyCashFlowAssumptions {
    pub fn new(start_date: NaiveDate, starting_cash: Money) -> Self {
        Self {
            start_date,
            horizon_days: DEFAULT_DAILY_HORIZON,
            starting_cash,
            receipts: Vec::new(),
            payments: Vec::new(),
            recurring_outflow: None,
        }
    }

    pub fn with_horizon(mut self, horizon_days: u32) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    pub fn with_receipt(mut self, receipt: ScheduledCashEvent) -> Self {
        self.receipts.push(receipt);
        self
    }

    pub fn with_payment(mut self, payment: ScheduledCashEvent) -> Self {
        self.payments.push(payment);
        self
    }

    pub fn with_recurring_outflow(mut self, outflow: RecurringOutflow) -> Self {
        self.recurring_outflow = Some(outflow);
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.horizon_days == 0 {
            return Err(EngineError::invalid(
                "horizon_days",
                "Horizon must be at least one day",
            ));
        }
        if self.horizon_days > MAX_DAILY_HORIZON {
            return Err(EngineError::invalid(
                "horizon_days",
                "Horizon must not exceed 366 days",
            ));
        }
        for (index, event) in self.receipts.iter().enumerate() {
            check(&format!("receipts[{index}].amount"), validate_non_negative(event.amount))?;
        }
        for (index, event) in self.payments.iter().enumerate() {
            check(&format!("payments[{index}].amount"), validate_non_negative(event.amount))?;
        }
        if let Some(outflow) = &self.recurring_outflow {
            check("recurring_outflow.amount", validate_non_negative(outflow.amount))?;
            if outflow.interval_days == 0 {
                return Err(EngineError::invalid(
                    "recurring_outflow.interval_days",
                    "Interval must be at least one day",
                ));
            }
        }
        Ok(())
    }
}

/// One row of the daily projection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CashFlowDay {
    /// 1-based day of the horizon
    pub day_index: u32,
    pub date: NaiveDate,
    pub cash_in: Money,
    pub cash_out: Money,
    pub net_cash_flow: Money,
    pub cumulative_cash: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyCashFlowProjection {
    pub days: Vec<CashFlowDay>,
    pub minimum_cash: Money,
    pub minimum_cash_date: NaiveDate,
    pub ending_cash: Money,
    pub financing_required: Money,
    pub receipts_beyond_horizon: Money,
    pub payments_beyond_horizon: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_season_is_neutral() {
        assert!(crate::validation::is_neutral_season(&DEFAULT_SEASONAL_FACTORS));
        assert_eq!(DEFAULT_SEASONAL_FACTORS[0], dec!(0.8));
        assert_eq!(DEFAULT_SEASONAL_FACTORS[6], dec!(1.2));
        assert_eq!(DEFAULT_SEASONAL_FACTORS[11], dec!(0.8));
    }

    #[test]
    fn test_assumption_validation() {
        assert!(CashFlowAssumptions::default().validate().is_ok());

        let bad_cogs = CashFlowAssumptions {
            cogs_percentage: dec!(1.4),
            ..CashFlowAssumptions::default()
        };
        assert!(bad_cogs.validate().is_err());

        let mut bad_season = CashFlowAssumptions::default();
        bad_season.seasonal_factors[3] = dec!(-0.1);
        assert!(bad_season.validate().is_err());
    }

    #[test]
    fn test_cash_conversion_cycle_is_signed() {
        let assumptions = CashFlowAssumptions {
            dio: 10,
            dso: 20,
            dpo: 60,
            ..CashFlowAssumptions::default()
        };
        assert_eq!(assumptions.cash_conversion_cycle(), -30);
    }

    #[test]
    fn test_recurring_outflow_schedule() {
        let outflow = RecurringOutflow::weekly(dec!(500));
        assert!(!outflow.falls_on(1));
        assert!(outflow.falls_on(7));
        assert!(outflow.falls_on(14));
        assert!(!outflow.falls_on(15));
    }

    #[test]
    fn test_daily_assumptions_reject_zero_horizon() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let assumptions = DailyCashFlowAssumptions::new(start, dec!(1000)).with_horizon(0);
        assert!(assumptions.validate().is_err());
    }

    #[test]
    fn test_daily_assumptions_cap_horizon() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let longest = DailyCashFlowAssumptions::new(start, dec!(1000)).with_horizon(MAX_DAILY_HORIZON);
        assert!(longest.validate().is_ok());

        let too_long = longest.with_horizon(u32::MAX);
        assert!(matches!(
            too_long.validate(),
            Err(EngineError::InvalidInput { ref field, .. }) if field == "horizon_days"
        ));
    }

    #[test]
    fn test_seasonal_factors_default_on_deserialize() {
        let json = r#"{
            "monthly_sales": "1000", "growth_rate": "0", "dso": 30, "dpo": 30, "dio": 30,
            "cogs_percentage": "0.5", "fixed_costs_per_month": "100", "starting_cash": "0"
        }"#;
        let assumptions: CashFlowAssumptions = serde_json::from_str(json).unwrap();
        assert_eq!(assumptions.seasonal_factors, DEFAULT_SEASONAL_FACTORS);
    }
}
