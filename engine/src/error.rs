//! Error types for the calculation engine

use rust_decimal::Decimal;
use thiserror::Error;

/// Engine error types
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid {field}: {message}")]
    InvalidInput {
        field: String,
        message: &'static str,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arithmetic overflow while computing {0}")]
    Overflow(&'static str),
}

impl EngineError {
    pub fn invalid(field: impl Into<String>, message: &'static str) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            message,
        }
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Lift a validation check into an [`EngineError::InvalidInput`] for `field`
pub(crate) fn check(field: &str, result: Result<(), &'static str>) -> EngineResult<()> {
    result.map_err(|message| EngineError::invalid(field, message))
}

/// Map a `checked_*` result to [`EngineError::Overflow`]
pub(crate) fn checked(value: Option<Decimal>, what: &'static str) -> EngineResult<Decimal> {
    value.ok_or(EngineError::Overflow(what))
}

/// Sum `values`, failing with [`EngineError::Overflow`] instead of panicking
pub(crate) fn checked_sum(
    values: impl IntoIterator<Item = EngineResult<Decimal>>,
    what: &'static str,
) -> EngineResult<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| checked(acc.checked_add(value?), what))
}
