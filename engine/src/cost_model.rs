//! Cost components that separate paper profit from real profit
//!
//! Each function computes one category of the breakdown. Financing uses the
//! same cash-gap formula as pricing, whether it is applied to a single
//! transaction or to an aggregate sales figure. Results outside the Decimal
//! range are reported as [`EngineError::Overflow`](crate::EngineError::Overflow).

use rust_decimal::Decimal;

use crate::error::{checked, EngineResult};
use crate::pricing::{cash_gap, daily_interest_rate};
use crate::types::{Days, Money, Rate, DAYS_PER_MONTH};

/// Interest carried on `amount` while waiting for payment past supplier terms
pub fn financing(
    amount: Money,
    dso: Days,
    supplier_terms: Days,
    annual_interest_rate: Rate,
) -> EngineResult<Money> {
    let gap = Decimal::from(cash_gap(dso, supplier_terms));
    checked(
        amount
            .checked_mul(daily_interest_rate(annual_interest_rate))
            .and_then(|daily| daily.checked_mul(gap)),
        "financing cost",
    )
}

/// Holding cost of stock for `days`, pro rata on 30-day months
pub fn storage(cost_amount: Money, days_in_stock: Days, monthly_rate: Rate) -> EngineResult<Money> {
    checked(
        cost_amount
            .checked_mul(monthly_rate)
            .and_then(|monthly| monthly.checked_mul(Decimal::from(days_in_stock)))
            .and_then(|held| held.checked_div(Decimal::from(DAYS_PER_MONTH))),
        "storage cost",
    )
}

pub fn commission(sale_amount: Money, rate: Rate) -> EngineResult<Money> {
    checked(sale_amount.checked_mul(rate), "commission")
}

pub fn logistics(sale_amount: Money, rate: Rate) -> EngineResult<Money> {
    checked(sale_amount.checked_mul(rate), "logistics cost")
}

/// Expected loss on sales at risk of late or no payment
pub fn risk(total_sales: Money, payment_history: Rate, coefficient: Rate) -> EngineResult<Money> {
    checked(
        Decimal::ONE
            .checked_sub(payment_history)
            .and_then(|unpaid| total_sales.checked_mul(unpaid))
            .and_then(|at_risk| at_risk.checked_mul(coefficient)),
        "risk cost",
    )
}
