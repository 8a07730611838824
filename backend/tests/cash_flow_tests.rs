//! Cash-flow projection tests
//!
//! Tests for the monthly and daily projections including:
//! - Collection and payment lags
//! - Cumulative cash fold
//! - Events past the horizon

use chrono::NaiveDate;
use engine::cash_flow::{project, project_daily, project_horizon, MAX_HORIZON_MONTHS};
use engine::{
    CashFlowAssumptions, DailyCashFlowAssumptions, EngineError, RecurringOutflow,
    ScheduledCashEvent, MAX_DAILY_HORIZON,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn flat_assumptions() -> CashFlowAssumptions {
    CashFlowAssumptions::default().without_seasonality()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// 90-day collection lag: nothing comes in during month 1
    #[test]
    fn test_first_month_has_no_collections() {
        let projection = project(&flat_assumptions()).unwrap();
        let first = &projection.months[0];

        assert_eq!(first.cash_in, Decimal::ZERO);
        assert!(first.cash_out >= dec("20000"));
        assert_eq!(first.cumulative_cash, dec("50000") - first.cash_out);
    }

    #[test]
    fn test_collections_start_after_lag() {
        let projection = project(&flat_assumptions()).unwrap();
        let months = &projection.months;

        assert!(months[..3].iter().all(|m| m.cash_in == Decimal::ZERO));
        assert_eq!(months[3].cash_in, months[0].adjusted_sales);
    }

    #[test]
    fn test_events_past_horizon_are_reported() {
        let projection = project(&flat_assumptions()).unwrap();
        let last_three: Decimal = projection.months[9..].iter().map(|m| m.adjusted_sales).sum();
        assert_eq!(projection.receivables_beyond_horizon, last_three);
        assert!(projection.payables_beyond_horizon > Decimal::ZERO);
    }

    #[test]
    fn test_financing_need_matches_trough() {
        let projection = project(&flat_assumptions()).unwrap();
        let summary = &projection.summary;

        if summary.minimum_cash < Decimal::ZERO {
            assert_eq!(summary.financing_required, -summary.minimum_cash);
        } else {
            assert_eq!(summary.financing_required, Decimal::ZERO);
        }
        assert_eq!(summary.cash_conversion_cycle, 75);
    }

    #[test]
    fn test_zero_horizon_is_rejected() {
        assert!(project_horizon(&flat_assumptions(), 0).is_err());
    }

    #[test]
    fn test_oversized_horizons_are_rejected() {
        assert!(project_horizon(&flat_assumptions(), MAX_HORIZON_MONTHS + 1).is_err());

        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let daily = DailyCashFlowAssumptions::new(start, dec("5000"))
            .with_horizon(MAX_DAILY_HORIZON + 1);
        assert!(matches!(
            project_daily(&daily),
            Err(EngineError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_starting_cash_overflow_is_an_error() {
        let assumptions = CashFlowAssumptions {
            starting_cash: Decimal::MAX,
            dso: 0,
            ..flat_assumptions()
        };
        assert!(matches!(project(&assumptions), Err(EngineError::Overflow(_))));
    }

    #[test]
    fn test_daily_projection_with_recurring_outflow() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let assumptions = DailyCashFlowAssumptions::new(start, dec("5000"))
            .with_horizon(14)
            .with_receipt(ScheduledCashEvent::new(
                NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                dec("2000"),
            ))
            .with_payment(ScheduledCashEvent::new(
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                dec("900"),
            ))
            .with_recurring_outflow(RecurringOutflow::weekly(dec("1500")));
        let projection = project_daily(&assumptions).unwrap();

        assert_eq!(projection.days.len(), 14);
        // Outflows on day 7 and day 14
        assert_eq!(projection.days[6].cash_out, dec("1500"));
        assert_eq!(projection.days[13].cash_out, dec("1500"));
        assert_eq!(projection.minimum_cash, dec("3500"));
        assert_eq!(projection.ending_cash, dec("4000"));
        assert_eq!(projection.payments_beyond_horizon, dec("900"));
        assert_eq!(projection.financing_required, Decimal::ZERO);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn assumptions_strategy() -> impl Strategy<Value = CashFlowAssumptions> {
        (
            (0i64..=1_000_000i64).prop_map(|n| Decimal::new(n, 0)),
            (-50i64..=50i64).prop_map(|n| Decimal::new(n, 2)),
            0u32..=180,
            0u32..=180,
            (0i64..=100i64).prop_map(|n| Decimal::new(n, 2)),
            (0i64..=100_000i64).prop_map(|n| Decimal::new(n, 0)),
        )
            .prop_map(|(sales, growth, dso, dpo, cogs, fixed)| CashFlowAssumptions {
                monthly_sales: sales,
                growth_rate: growth,
                dso,
                dpo,
                cogs_percentage: cogs,
                fixed_costs_per_month: fixed,
                ..CashFlowAssumptions::default()
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// cumulative[i] = cumulative[i-1] + cash_in[i] - cash_out[i]
        #[test]
        fn prop_cumulative_cash_fold(assumptions in assumptions_strategy()) {
            let projection = project(&assumptions).unwrap();
            let mut running = assumptions.starting_cash;
            for month in &projection.months {
                running += month.cash_in - month.cash_out;
                prop_assert_eq!(month.net_cash_flow, month.cash_in - month.cash_out);
                prop_assert_eq!(month.cumulative_cash, running);
            }
            prop_assert_eq!(projection.summary.ending_cash, running);
        }

        /// The reported minimum is the smallest cumulative balance
        #[test]
        fn prop_minimum_is_smallest_balance(assumptions in assumptions_strategy()) {
            let projection = project(&assumptions).unwrap();
            let smallest = projection.months.iter().map(|m| m.cumulative_cash).min().unwrap();
            prop_assert_eq!(projection.summary.minimum_cash, smallest);
            prop_assert!(projection.summary.financing_required >= Decimal::ZERO);
        }
    }
}
