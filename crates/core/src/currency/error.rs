//! Currency error types.

use fxcommerce_shared::{AppError, IsoCode};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during rate lookup, conversion, and formatting.
#[derive(Debug, Error)]
pub enum CurrencyError {
    /// No active exchange rate exists for the currency.
    #[error("No active exchange rate for currency {0}")]
    NotFound(IsoCode),

    /// A stored rate cannot be used for arithmetic.
    #[error("Exchange rate {rate} for {code} must be positive")]
    InvalidRate {
        /// Currency the rate belongs to.
        code: IsoCode,
        /// The offending rate.
        rate: Decimal,
    },

    /// A rate record or cache setting is malformed.
    #[error("Invalid currency configuration: {0}")]
    InvalidConfiguration(String),

    /// Decimal arithmetic overflowed.
    #[error("Decimal overflow during currency conversion")]
    Overflow,

    /// The rate store failed.
    #[error("Rate storage error: {0}")]
    Storage(String),
}

impl From<CurrencyError> for AppError {
    fn from(err: CurrencyError) -> Self {
        match err {
            CurrencyError::NotFound(_) => Self::NotFound(err.to_string()),
            CurrencyError::InvalidRate { .. } | CurrencyError::InvalidConfiguration(_) => {
                Self::Configuration(err.to_string())
            }
            CurrencyError::Overflow => Self::Validation(err.to_string()),
            CurrencyError::Storage(msg) => Self::Database(msg),
        }
    }
}
