//! Money amount error types.

use fxcommerce_shared::{AppError, IsoCode, MoneyAmountId};
use thiserror::Error;

use crate::currency::CurrencyError;

/// Errors that can occur while deriving, combining, or persisting money amounts.
#[derive(Debug, Error)]
pub enum MoneyError {
    /// Rate lookup or conversion failed.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// The other operand is not a money amount or a number.
    #[error("Unsupported operand: {0}")]
    InvalidOperand(String),

    /// Decimal arithmetic overflowed.
    #[error("Decimal overflow in money arithmetic")]
    Overflow,

    /// The currency is not in the supported list.
    #[error("Currency {0} is not supported")]
    UnsupportedCurrency(IsoCode),

    /// No stored amount has this id.
    #[error("Money amount {0} not found")]
    NotFound(MoneyAmountId),

    /// The amount has not been saved yet.
    #[error("Money amount has not been saved")]
    NotPersisted,

    /// The money amount store failed.
    #[error("Money amount storage error: {0}")]
    Storage(String),
}

impl From<MoneyError> for AppError {
    fn from(err: MoneyError) -> Self {
        match err {
            MoneyError::Currency(inner) => inner.into(),
            MoneyError::NotFound(_) => Self::NotFound(err.to_string()),
            MoneyError::InvalidOperand(_)
            | MoneyError::Overflow
            | MoneyError::UnsupportedCurrency(_)
            | MoneyError::NotPersisted => Self::Validation(err.to_string()),
            MoneyError::Storage(msg) => Self::Database(msg),
        }
    }
}
