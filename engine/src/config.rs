//! Calculation parameters
//!
//! Rates and thresholds travel with each call as plain values. Callers that
//! want a what-if variant clone the parameters and change a field; nothing in
//! the engine holds process-wide settings.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{check, EngineError, EngineResult};
use crate::models::{CostCategory, InventoryStatus};
use crate::types::{CostBasis, Days, Money, Rate};
use crate::validation::{validate_fraction, validate_non_negative};

/// Age tiers, tier multipliers and the price floor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PricingPolicy {
    /// Highest age (inclusive) still considered fresh
    pub fresh_max_days: Days,
    /// Highest age (inclusive) still considered normal
    pub normal_max_days: Days,
    /// Highest age (inclusive) before stock counts as dead
    pub slow_moving_max_days: Days,
    pub fresh_multiplier: Decimal,
    pub normal_multiplier: Decimal,
    pub slow_moving_multiplier: Decimal,
    /// Below 1.0: dead stock is cleared at a deliberate loss
    pub dead_stock_multiplier: Decimal,
    /// Recommended prices never fall below `cost * floor_ratio`
    pub floor_ratio: Rate,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            fresh_max_days: 30,
            normal_max_days: 90,
            slow_moving_max_days: 180,
            fresh_multiplier: dec!(1.50),
            normal_multiplier: dec!(1.25),
            slow_moving_multiplier: dec!(1.10),
            dead_stock_multiplier: dec!(0.95),
            floor_ratio: dec!(0.90),
        }
    }
}

impl PricingPolicy {
    /// Base price multiplier for an inventory age class
    pub fn multiplier_for(&self, status: InventoryStatus) -> Decimal {
        match status {
            InventoryStatus::Fresh => self.fresh_multiplier,
            InventoryStatus::Normal => self.normal_multiplier,
            InventoryStatus::SlowMoving => self.slow_moving_multiplier,
            InventoryStatus::DeadStock => self.dead_stock_multiplier,
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !(self.fresh_max_days < self.normal_max_days
            && self.normal_max_days < self.slow_moving_max_days)
        {
            return Err(EngineError::invalid(
                "pricing.tiers",
                "Age tier thresholds must be strictly increasing",
            ));
        }
        check("pricing.fresh_multiplier", validate_non_negative(self.fresh_multiplier))?;
        check("pricing.normal_multiplier", validate_non_negative(self.normal_multiplier))?;
        check(
            "pricing.slow_moving_multiplier",
            validate_non_negative(self.slow_moving_multiplier),
        )?;
        check(
            "pricing.dead_stock_multiplier",
            validate_non_negative(self.dead_stock_multiplier),
        )?;
        check("pricing.floor_ratio", validate_non_negative(self.floor_ratio))
    }
}

/// Rate constants shared by pricing and cost decomposition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineParameters {
    /// Days we have to pay our suppliers
    pub supplier_terms_days: Days,
    pub annual_interest_rate: Rate,
    /// Storage cost per month as a fraction of stock cost
    pub monthly_storage_rate: Rate,
    /// Sales commission as a fraction of sales
    pub commission_rate: Rate,
    /// Delivery cost as a fraction of sales
    pub logistics_rate: Rate,
    /// Share of at-risk sales (1 - payment history) written off as risk cost
    pub risk_coefficient: Rate,
    pub pricing: PricingPolicy,
}

impl Default for EngineParameters {
    fn default() -> Self {
        Self {
            supplier_terms_days: 60,
            annual_interest_rate: dec!(0.08),
            monthly_storage_rate: dec!(0.005),
            commission_rate: dec!(0.03),
            logistics_rate: dec!(0.015),
            risk_coefficient: dec!(0.05),
            pricing: PricingPolicy::default(),
        }
    }
}

impl EngineParameters {
    pub fn validate(&self) -> EngineResult<()> {
        check("annual_interest_rate", validate_non_negative(self.annual_interest_rate))?;
        check("monthly_storage_rate", validate_non_negative(self.monthly_storage_rate))?;
        check("commission_rate", validate_fraction(self.commission_rate))?;
        check("logistics_rate", validate_fraction(self.logistics_rate))?;
        check("risk_coefficient", validate_fraction(self.risk_coefficient))?;
        self.pricing.validate()
    }
}

/// Which cost categories an analysis includes and how they are applied
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CostOptions {
    pub categories: BTreeSet<CostCategory>,
    pub financing_basis: CostBasis,
    /// Basis for commission and logistics
    pub transactional_basis: CostBasis,
    /// Flat administration cost, used when the category is active
    pub administration: Money,
    /// Flat miscellaneous cost, used when the category is active
    pub other: Money,
}

impl Default for CostOptions {
    fn default() -> Self {
        Self {
            categories: CostCategory::CUSTOMER_DEFAULT.into_iter().collect(),
            financing_basis: CostBasis::PerTransaction,
            transactional_basis: CostBasis::PerTransaction,
            administration: Decimal::ZERO,
            other: Decimal::ZERO,
        }
    }
}

impl CostOptions {
    /// Options with every category of the fixed set active
    pub fn all_categories(administration: Money, other: Money) -> Self {
        Self {
            categories: CostCategory::ALL.into_iter().collect(),
            administration,
            other,
            ..Self::default()
        }
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = CostCategory>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    pub fn with_financing_basis(mut self, basis: CostBasis) -> Self {
        self.financing_basis = basis;
        self
    }

    pub fn with_transactional_basis(mut self, basis: CostBasis) -> Self {
        self.transactional_basis = basis;
        self
    }

    pub fn includes(&self, category: CostCategory) -> bool {
        self.categories.contains(&category)
    }

    pub fn validate(&self) -> EngineResult<()> {
        check("administration", validate_non_negative(self.administration))?;
        check("other", validate_non_negative(self.other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters_are_valid() {
        assert!(EngineParameters::default().validate().is_ok());
        assert!(CostOptions::default().validate().is_ok());
    }

    #[test]
    fn test_tier_thresholds_must_increase() {
        let policy = PricingPolicy {
            normal_max_days: 200,
            ..PricingPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_rates_must_be_in_range() {
        let params = EngineParameters {
            commission_rate: dec!(1.5),
            ..EngineParameters::default()
        };
        assert!(params.validate().is_err());

        let params = EngineParameters {
            annual_interest_rate: dec!(-0.01),
            ..EngineParameters::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_default_cost_set() {
        let options = CostOptions::default();
        assert!(options.includes(CostCategory::Financing));
        assert!(options.includes(CostCategory::Risk));
        assert!(!options.includes(CostCategory::Administration));
        assert!(!options.includes(CostCategory::Other));

        let all = CostOptions::all_categories(dec!(100), dec!(50));
        assert_eq!(all.categories.len(), 7);
    }

    #[test]
    fn test_parameters_deserialize_with_defaults() {
        let params: EngineParameters =
            serde_json::from_str(r#"{"supplier_terms_days": 45}"#).unwrap();
        assert_eq!(params.supplier_terms_days, 45);
        assert_eq!(params.annual_interest_rate, dec!(0.08));
        assert_eq!(params.pricing.floor_ratio, dec!(0.90));
    }
}
