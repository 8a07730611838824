//! Common types used across the engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monetary amount (currency-agnostic)
pub type Money = Decimal;

/// A fraction, e.g. `0.08` for 8%
pub type Rate = Decimal;

/// Whole calendar days
pub type Days = u32;

pub const DAYS_PER_YEAR: u32 = 365;

/// Month length used by storage costs and cash-flow lags
pub const DAYS_PER_MONTH: u32 = 30;

pub const MONTHS_PER_YEAR: usize = 12;

/// How a cost component is applied to a transaction set
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CostBasis {
    /// Computed on each transaction's own amount, then summed
    #[default]
    PerTransaction,
    /// Computed once on the aggregate figure
    Aggregate,
}

/// Round a monetary amount to cents for display and export
pub fn round_money(amount: Money) -> Money {
    amount.round_dp(2)
}

/// `part / whole * 100`, or zero when `whole` is zero.
/// Saturates at the Decimal bounds for ratios too large to represent.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if part.is_sign_negative() == whole.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        })
}
