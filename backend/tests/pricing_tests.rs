//! Dynamic pricing tests
//!
//! Tests for age-tiered pricing including:
//! - Tier boundaries and multipliers
//! - Financing adjustment over the cash gap
//! - Price floor

use engine::pricing::{
    age_multiplier, cash_gap, financing_cost, price_floor, recommend_all, recommended_price,
    summarize_inventory, PricingContext,
};
use engine::{EngineParameters, InventoryStatus, PricingPolicy};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        let policy = PricingPolicy::default();
        let cases = [
            (0, "1.50"),
            (30, "1.50"),
            (31, "1.25"),
            (90, "1.25"),
            (91, "1.10"),
            (180, "1.10"),
            (181, "0.95"),
        ];
        for (days, expected) in cases {
            assert_eq!(age_multiplier(days, &policy), dec(expected), "days = {}", days);
        }
    }

    /// base = 13.125, gap = 23 days, financing ≈ 0.0662
    #[test]
    fn test_normal_stock_on_long_terms() {
        let price = recommended_price(dec("10.50"), 45, 83, 60, dec("0.08"), &PricingPolicy::default());
        assert_eq!(price.round_dp(2), dec("13.06"));

        let financing = financing_cost(dec("13.125"), 83, 60, dec("0.08"));
        assert_eq!(financing.round_dp(4), dec("0.0662"));
    }

    #[test]
    fn test_dead_stock_is_bounded_by_floor() {
        let policy = PricingPolicy::default();
        let price = recommended_price(dec("15.00"), 210, 83, 60, dec("0.08"), &policy);

        assert!(price >= dec("13.50"));
        assert!(price <= dec("14.25"));
        assert_eq!(price_floor(dec("15.00"), &policy), dec("13.50"));
    }

    #[test]
    fn test_floor_binds_on_extreme_terms() {
        let policy = PricingPolicy::default();
        let price = recommended_price(dec("15.00"), 210, 3650, 0, dec("0.20"), &policy);
        assert_eq!(price, dec("13.50"));
    }

    #[test]
    fn test_cash_gap_is_zero_when_terms_cover_dso() {
        assert_eq!(cash_gap(45, 60), 0);
        assert_eq!(cash_gap(60, 60), 0);
        assert_eq!(cash_gap(90, 60), 30);
    }

    #[test]
    fn test_zero_cost_prices_to_zero() {
        let price = recommended_price(Decimal::ZERO, 10, 120, 60, dec("0.08"), &PricingPolicy::default());
        assert_eq!(price, Decimal::ZERO);
    }

    #[test]
    fn test_sample_inventory_summary() {
        let params = EngineParameters::default();
        let ctx = PricingContext::new(83, &params);
        let items = recommend_all(&engine::dataset::sample_inventory(), &ctx);
        let summary = summarize_inventory(&items);

        assert_eq!(items.len(), 5);
        assert_eq!(summary.product_count, 5);
        assert_eq!(
            summary.dead_stock_count,
            items
                .iter()
                .filter(|item| item.status == InventoryStatus::DeadStock)
                .count()
        );
    }

    #[test]
    fn test_pricing_is_repeatable() {
        let params = EngineParameters::default();
        let ctx = PricingContext::new(95, &params);
        let inventory = engine::dataset::sample_inventory();
        assert_eq!(recommend_all(&inventory, &ctx), recommend_all(&inventory, &ctx));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Unit costs from 0.00 to 10000.00
    fn cost_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Annual interest rates from 0% to 50%
    fn interest_rate_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=500i64).prop_map(|n| Decimal::new(n, 3))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// The recommendation never falls below cost × floor ratio
        #[test]
        fn prop_price_never_below_floor(
            cost in cost_strategy(),
            days in 0u32..=720,
            dso in 0u32..=730,
            terms in 0u32..=180,
            rate in interest_rate_strategy()
        ) {
            let policy = PricingPolicy::default();
            let price = recommended_price(cost, days, dso, terms, rate, &policy);
            prop_assert!(price >= price_floor(cost, &policy),
                "price {} below floor for cost {}", price, cost);
        }

        /// The recommendation never exceeds the undiscounted tier price
        #[test]
        fn prop_price_never_above_base(
            cost in cost_strategy(),
            days in 0u32..=720,
            dso in 0u32..=730,
            rate in interest_rate_strategy()
        ) {
            let policy = PricingPolicy::default();
            let price = recommended_price(cost, days, dso, 60, rate, &policy);
            let base = cost * age_multiplier(days, &policy);
            prop_assert!(price <= base.max(price_floor(cost, &policy)));
        }

        /// The gap is dso - terms when positive and zero otherwise
        #[test]
        fn prop_cash_gap_matches_definition(dso in 0u32..=10_000, terms in 0u32..=10_000) {
            let gap = cash_gap(dso, terms);
            let expected = (i64::from(dso) - i64::from(terms)).max(0);
            prop_assert_eq!(i64::from(gap), expected);
        }

        /// Longer customer terms never raise the price
        #[test]
        fn prop_longer_terms_never_raise_price(
            cost in cost_strategy(),
            days in 0u32..=720,
            dso in 0u32..=365,
            extra in 0u32..=365
        ) {
            let policy = PricingPolicy::default();
            let shorter = recommended_price(cost, days, dso, 60, dec("0.08"), &policy);
            let longer = recommended_price(cost, days, dso + extra, 60, dec("0.08"), &policy);
            prop_assert!(longer <= shorter);
        }
    }
}
