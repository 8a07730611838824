//! Validation utilities for engine inputs
//!
//! The calculations themselves assume pre-validated input; these checks run
//! when typed records are constructed or loaded.

use rust_decimal::Decimal;

use crate::types::MONTHS_PER_YEAR;

// ============================================================================
// Monetary Validations
// ============================================================================

/// Validate that an amount or rate is not negative
pub fn validate_non_negative(value: Decimal) -> Result<(), &'static str> {
    if value < Decimal::ZERO {
        return Err("Value cannot be negative");
    }
    Ok(())
}

/// Validate that a value is a fraction between 0 and 1 inclusive
pub fn validate_fraction(value: Decimal) -> Result<(), &'static str> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err("Value must be between 0 and 1");
    }
    Ok(())
}

/// Validate a discount percentage (0-100)
pub fn validate_percentage(value: Decimal) -> Result<(), &'static str> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err("Percentage must be between 0 and 100");
    }
    Ok(())
}

/// Validate a growth rate; anything at or below -100% makes compounding meaningless
pub fn validate_growth_rate(rate: Decimal) -> Result<(), &'static str> {
    if rate <= Decimal::NEGATIVE_ONE {
        return Err("Growth rate must be greater than -100%");
    }
    Ok(())
}

// ============================================================================
// Cash-Flow Validations
// ============================================================================

/// Validate seasonal factors: one positive multiplier per calendar month
pub fn validate_seasonal_factors(factors: &[Decimal]) -> Result<(), &'static str> {
    if factors.len() != MONTHS_PER_YEAR {
        return Err("Seasonal factors must contain exactly 12 entries");
    }
    if factors.iter().any(|f| *f <= Decimal::ZERO) {
        return Err("Seasonal factors must be positive");
    }
    Ok(())
}

/// Check whether seasonal factors average out to a neutral year
pub fn is_neutral_season(factors: &[Decimal]) -> bool {
    factors.iter().sum::<Decimal>() == Decimal::from(factors.len())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate a display name (product, customer)
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty");
    }
    if name.chars().count() > 200 {
        return Err("Name must be at most 200 characters");
    }
    Ok(())
}
