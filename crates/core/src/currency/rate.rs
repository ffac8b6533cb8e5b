//! Currency rate records.

use chrono::{DateTime, Utc};
use fxcommerce_shared::IsoCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CurrencyError;

/// Largest number of fractional digits a currency may display.
pub const MAX_DECIMAL_PLACES: u32 = 10;

/// Exchange rate and display rules for one currency.
///
/// `exchange_rate` is expressed against the system base currency: one unit
/// of this currency equals `exchange_rate` units of the base currency. The
/// base currency's own record carries a rate of 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyRate {
    /// Currency code, unique among active records.
    pub iso_code: IsoCode,
    /// Human readable name.
    pub name: String,
    /// Display symbol.
    pub symbol: String,
    /// Rate relative to the base currency.
    pub exchange_rate: Decimal,
    /// Separator between integer and fractional digits.
    pub decimal_mark: String,
    /// Separator between groups of three integer digits. Empty disables grouping.
    pub thousand_mark: String,
    /// Number of fractional digits to display.
    pub decimal_places: u32,
    /// Whether trailing fractional zeros are dropped when formatting.
    pub remove_trailing_zeros: bool,
    /// Only active records take part in lookup and conversion.
    pub active: bool,
    /// Last modification time.
    pub updated: DateTime<Utc>,
}

impl CurrencyRate {
    /// Creates an active record with the default display rules
    /// (`,` decimals, space thousands, two places, trailing zeros removed).
    #[must_use]
    pub fn new(iso_code: IsoCode, exchange_rate: Decimal) -> Self {
        Self {
            name: iso_code.to_string(),
            symbol: iso_code.to_string(),
            iso_code,
            exchange_rate,
            decimal_mark: ",".to_string(),
            thousand_mark: " ".to_string(),
            decimal_places: 2,
            remove_trailing_zeros: true,
            active: true,
            updated: Utc::now(),
        }
    }

    /// Sets the display separators.
    #[must_use]
    pub fn with_marks(mut self, decimal_mark: &str, thousand_mark: &str) -> Self {
        self.decimal_mark = decimal_mark.to_string();
        self.thousand_mark = thousand_mark.to_string();
        self
    }

    /// Sets the number of fractional digits and trailing-zero handling.
    #[must_use]
    pub fn with_decimals(mut self, decimal_places: u32, remove_trailing_zeros: bool) -> Self {
        self.decimal_places = decimal_places;
        self.remove_trailing_zeros = remove_trailing_zeros;
        self
    }

    /// Checks that the record can be used for conversion and formatting.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRate` for a non-positive rate and
    /// `InvalidConfiguration` for out-of-range decimal places or an empty
    /// decimal mark on a currency that displays decimals.
    pub fn validate(&self) -> Result<(), CurrencyError> {
        if self.exchange_rate <= Decimal::ZERO {
            return Err(CurrencyError::InvalidRate {
                code: self.iso_code.clone(),
                rate: self.exchange_rate,
            });
        }
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(CurrencyError::InvalidConfiguration(format!(
                "{} shows {} decimal places, at most {MAX_DECIMAL_PLACES} allowed",
                self.iso_code, self.decimal_places
            )));
        }
        if self.decimal_places > 0 && self.decimal_mark.is_empty() {
            return Err(CurrencyError::InvalidConfiguration(format!(
                "{} shows decimals but has no decimal mark",
                self.iso_code
            )));
        }
        Ok(())
    }
}
