//! Currency conversion through the base currency.
//!
//! Every conversion is mediated by the base currency: the amount is first
//! multiplied by the source currency's rate, then divided by the target
//! currency's rate. No rounding is applied; results keep full `Decimal`
//! precision.

use fxcommerce_shared::IsoCode;
use rust_decimal::Decimal;

use super::error::CurrencyError;
use super::format::format_amount;
use super::store::RateStore;
use super::table::ExchangeRateTable;

/// Result of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    /// The converted amount.
    pub amount: Decimal,
    /// The rate of the last lookup performed, or 1 if none was needed.
    ///
    /// This is not a combined cross rate: converting between two foreign
    /// currencies reports the target currency's rate.
    pub rate: Decimal,
}

impl Conversion {
    const fn unchanged(amount: Decimal) -> Self {
        Self {
            amount,
            rate: Decimal::ONE,
        }
    }
}

/// Converts and formats amounts using an [`ExchangeRateTable`].
pub struct ConversionEngine<S> {
    rates: ExchangeRateTable<S>,
}

impl<S: RateStore> ConversionEngine<S> {
    /// Creates an engine over `rates`.
    #[must_use]
    pub const fn new(rates: ExchangeRateTable<S>) -> Self {
        Self { rates }
    }

    /// Returns the rate table.
    #[must_use]
    pub const fn rates(&self) -> &ExchangeRateTable<S> {
        &self.rates
    }

    /// Returns the system base currency.
    #[must_use]
    pub const fn base_currency(&self) -> &IsoCode {
        self.rates.base_currency()
    }

    /// Converts `amount` from one currency to another. Either side defaults
    /// to the base currency.
    ///
    /// A zero amount converts to zero without any rate lookup, and so does a
    /// conversion between identical currencies.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if a needed rate is missing, `InvalidRate` if a
    /// rate is not positive, and `Overflow` if the result does not fit.
    pub async fn convert(
        &self,
        amount: Decimal,
        from: Option<&IsoCode>,
        to: Option<&IsoCode>,
    ) -> Result<Conversion, CurrencyError> {
        if amount.is_zero() {
            return Ok(Conversion::unchanged(Decimal::ZERO));
        }

        let base = self.base_currency();
        let from = from.unwrap_or(base);
        let to = to.unwrap_or(base);
        if from == to {
            return Ok(Conversion::unchanged(amount));
        }

        let mut converted = amount;
        let mut rate = Decimal::ONE;

        if from != base {
            rate = self.positive_rate(from).await?;
            converted = converted
                .checked_mul(rate)
                .ok_or(CurrencyError::Overflow)?;
        }

        if to != base {
            rate = self.positive_rate(to).await?;
            converted = converted
                .checked_div(rate)
                .ok_or(CurrencyError::Overflow)?;
        }

        Ok(Conversion {
            amount: converted,
            rate,
        })
    }

    /// Converts `amount` in `currency` to the base currency.
    ///
    /// # Errors
    ///
    /// See [`ConversionEngine::convert`].
    pub async fn to_base_currency(
        &self,
        amount: Decimal,
        currency: &IsoCode,
    ) -> Result<Conversion, CurrencyError> {
        self.convert(amount, Some(currency), None).await
    }

    /// Converts `amount` in the base currency to `currency`.
    ///
    /// # Errors
    ///
    /// See [`ConversionEngine::convert`].
    pub async fn from_base_currency(
        &self,
        amount: Decimal,
        currency: &IsoCode,
    ) -> Result<Conversion, CurrencyError> {
        self.convert(amount, None, Some(currency)).await
    }

    /// Formats `amount` with the display rules of `currency`. No symbol is added.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `currency` has no active record.
    pub async fn format(
        &self,
        amount: Decimal,
        currency: &IsoCode,
    ) -> Result<String, CurrencyError> {
        let record = self.rates.rate_record(currency).await?;
        Ok(format_amount(amount, &record))
    }

    async fn positive_rate(&self, code: &IsoCode) -> Result<Decimal, CurrencyError> {
        let rate = self.rates.rate(code).await?;
        if rate <= Decimal::ZERO {
            return Err(CurrencyError::InvalidRate {
                code: code.clone(),
                rate,
            });
        }
        Ok(rate)
    }
}
