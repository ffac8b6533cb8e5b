//! Money amounts that carry their base currency equivalent.

use std::cmp::Ordering;
use std::fmt;

use fxcommerce_shared::{IsoCode, MoneyAmountId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::{ConversionEngine, RateStore};

use super::error::MoneyError;
use super::operand::Operand;
use super::store::MoneyAmountStore;

/// Raw stored representation of a [`MoneyAmount`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyAmountRecord {
    /// Storage identity, `None` until first saved.
    pub id: Option<MoneyAmountId>,
    /// The amount in `currency`.
    pub amount: Decimal,
    /// Currency of `amount`.
    pub currency: IsoCode,
    /// `amount` expressed in `base_currency`.
    pub base_amount: Decimal,
    /// System base currency at the time of derivation.
    pub base_currency: IsoCode,
    /// Rate used for the derivation.
    pub base_exchange_rate: Decimal,
}

/// An amount in a currency, together with its base currency equivalent.
///
/// The base fields are derived on construction, on every mutation and
/// again right before every save. They are a snapshot as of that moment,
/// not live values: a later rate change or base currency change is not
/// reflected until the amount is refreshed or saved again.
///
/// Serializes with the shape of [`MoneyAmountRecord`]. Read stored data
/// back as a record and go through [`MoneyAmount::from_stored`].
#[derive(Debug, Clone, Serialize)]
pub struct MoneyAmount {
    id: Option<MoneyAmountId>,
    amount: Decimal,
    currency: IsoCode,
    base_amount: Decimal,
    base_currency: IsoCode,
    base_exchange_rate: Decimal,
}

impl MoneyAmount {
    /// Creates an unsaved amount and derives its base fields. `currency`
    /// defaults to the base currency.
    ///
    /// # Errors
    ///
    /// Returns `Currency` if the rate of `currency` cannot be resolved.
    pub async fn new<S: RateStore>(
        amount: Decimal,
        currency: Option<IsoCode>,
        engine: &ConversionEngine<S>,
    ) -> Result<Self, MoneyError> {
        let currency = currency.unwrap_or_else(|| engine.base_currency().clone());
        let base = engine.to_base_currency(amount, &currency).await?;
        Ok(Self {
            id: None,
            amount,
            currency,
            base_amount: base.amount,
            base_currency: engine.base_currency().clone(),
            base_exchange_rate: base.rate,
        })
    }

    /// Creates an unsaved zero amount in the base currency.
    ///
    /// # Errors
    ///
    /// See [`MoneyAmount::new`].
    pub async fn zero<S: RateStore>(engine: &ConversionEngine<S>) -> Result<Self, MoneyError> {
        Self::new(Decimal::ZERO, None, engine).await
    }

    /// Rebuilds an amount from storage without re-deriving anything.
    #[must_use]
    pub fn from_stored(record: MoneyAmountRecord) -> Self {
        Self {
            id: record.id,
            amount: record.amount,
            currency: record.currency,
            base_amount: record.base_amount,
            base_currency: record.base_currency,
            base_exchange_rate: record.base_exchange_rate,
        }
    }

    /// Returns the raw stored representation.
    #[must_use]
    pub fn to_record(&self) -> MoneyAmountRecord {
        MoneyAmountRecord {
            id: self.id,
            amount: self.amount,
            currency: self.currency.clone(),
            base_amount: self.base_amount,
            base_currency: self.base_currency.clone(),
            base_exchange_rate: self.base_exchange_rate,
        }
    }

    /// Loads a stored amount and re-derives its base fields against the
    /// current rate table. Nothing is written back.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no amount has this id.
    pub async fn load<S: RateStore, M: MoneyAmountStore>(
        id: MoneyAmountId,
        engine: &ConversionEngine<S>,
        store: &M,
    ) -> Result<Self, MoneyError> {
        let mut amount = store
            .find_by_id(id)
            .await?
            .ok_or(MoneyError::NotFound(id))?;
        amount.refresh(engine).await?;
        Ok(amount)
    }

    /// Returns the storage identity, if saved.
    #[must_use]
    pub const fn id(&self) -> Option<MoneyAmountId> {
        self.id
    }

    /// Returns the amount in [`MoneyAmount::currency`].
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency of the amount.
    #[must_use]
    pub const fn currency(&self) -> &IsoCode {
        &self.currency
    }

    /// Returns the amount in the base currency as of the last derivation.
    #[must_use]
    pub const fn base_amount(&self) -> Decimal {
        self.base_amount
    }

    /// Returns the base currency as of the last derivation.
    #[must_use]
    pub const fn base_currency(&self) -> &IsoCode {
        &self.base_currency
    }

    /// Returns the rate used by the last derivation.
    #[must_use]
    pub const fn base_exchange_rate(&self) -> Decimal {
        self.base_exchange_rate
    }

    /// Recomputes the base fields against the current rate table.
    ///
    /// # Errors
    ///
    /// Returns `Currency` if the rate cannot be resolved. The amount is
    /// left unchanged on error.
    pub async fn refresh<S: RateStore>(
        &mut self,
        engine: &ConversionEngine<S>,
    ) -> Result<(), MoneyError> {
        let derived = Self::new(self.amount, Some(self.currency.clone()), engine).await?;
        self.apply_derived(derived);
        Ok(())
    }

    /// Sets the amount and re-derives the base fields.
    ///
    /// # Errors
    ///
    /// See [`MoneyAmount::refresh`].
    pub async fn set_amount<S: RateStore>(
        &mut self,
        amount: Decimal,
        engine: &ConversionEngine<S>,
    ) -> Result<(), MoneyError> {
        let derived = Self::new(amount, Some(self.currency.clone()), engine).await?;
        self.amount = amount;
        self.apply_derived(derived);
        Ok(())
    }

    /// Sets the currency and re-derives the base fields.
    ///
    /// # Errors
    ///
    /// See [`MoneyAmount::refresh`].
    pub async fn set_currency<S: RateStore>(
        &mut self,
        currency: IsoCode,
        engine: &ConversionEngine<S>,
    ) -> Result<(), MoneyError> {
        let derived = Self::new(self.amount, Some(currency.clone()), engine).await?;
        self.currency = currency;
        self.apply_derived(derived);
        Ok(())
    }

    fn apply_derived(&mut self, derived: Self) {
        self.base_amount = derived.base_amount;
        self.base_currency = derived.base_currency;
        self.base_exchange_rate = derived.base_exchange_rate;
    }

    /// Re-derives the base fields, then writes the amount. An unsaved
    /// amount receives its id here.
    ///
    /// # Errors
    ///
    /// Returns `Currency` if derivation fails or `Storage` if the write fails.
    pub async fn save<S: RateStore, M: MoneyAmountStore>(
        &mut self,
        engine: &ConversionEngine<S>,
        store: &M,
    ) -> Result<(), MoneyError> {
        self.refresh(engine).await?;
        let stored = store.save(self).await?;
        tracing::debug!(
            id = ?stored.id,
            amount = %stored.amount,
            currency = %stored.currency,
            base_amount = %stored.base_amount,
            "saved money amount"
        );
        *self = stored;
        Ok(())
    }

    /// Deletes the stored amount.
    ///
    /// # Errors
    ///
    /// Returns `NotPersisted` if the amount was never saved.
    pub async fn delete<M: MoneyAmountStore>(&self, store: &M) -> Result<bool, MoneyError> {
        let id = self.id.ok_or(MoneyError::NotPersisted)?;
        store.delete(id).await
    }

    /// Returns the amount expressed in `currency`.
    ///
    /// The base currency and the own currency are answered from the stored
    /// fields without a lookup. Any other currency is converted from the
    /// base amount.
    ///
    /// # Errors
    ///
    /// Returns `Currency` if `currency` cannot be resolved.
    pub async fn amount_as<S: RateStore>(
        &self,
        currency: &IsoCode,
        engine: &ConversionEngine<S>,
    ) -> Result<Decimal, MoneyError> {
        if currency == &self.base_currency {
            return Ok(self.base_amount);
        }
        if currency == &self.currency {
            return Ok(self.amount);
        }
        let converted = engine
            .convert(self.base_amount, Some(&self.base_currency), Some(currency))
            .await?;
        Ok(converted.amount)
    }

    /// Returns the amount in the current system base currency.
    ///
    /// # Errors
    ///
    /// See [`MoneyAmount::amount_as`].
    pub async fn amount_as_base<S: RateStore>(
        &self,
        engine: &ConversionEngine<S>,
    ) -> Result<Decimal, MoneyError> {
        self.amount_as(engine.base_currency(), engine).await
    }

    /// Returns a new unsaved amount holding this value in `currency`.
    ///
    /// # Errors
    ///
    /// See [`MoneyAmount::amount_as`].
    pub async fn convert_to<S: RateStore>(
        &self,
        currency: &IsoCode,
        engine: &ConversionEngine<S>,
    ) -> Result<Self, MoneyError> {
        let amount = self.amount_as(currency, engine).await?;
        Self::new(amount, Some(currency.clone()), engine).await
    }

    /// Compares with another amount or a number.
    ///
    /// Two money amounts are compared in the base currency. A number is
    /// compared against the raw amount with no conversion, whatever the
    /// currency.
    ///
    /// # Errors
    ///
    /// Returns `Currency` if a conversion fails.
    pub async fn compare<'o, S: RateStore>(
        &self,
        other: impl Into<Operand<'o>>,
        engine: &ConversionEngine<S>,
    ) -> Result<Ordering, MoneyError> {
        match other.into() {
            Operand::Money(other) => {
                let base = engine.base_currency();
                let ours = self.amount_as(base, engine).await?;
                let theirs = other.amount_as(base, engine).await?;
                Ok(ours.cmp(&theirs))
            }
            Operand::Number(number) => Ok(self.amount.cmp(&number)),
        }
    }

    /// Returns true if [`MoneyAmount::compare`] finds both sides equal.
    ///
    /// # Errors
    ///
    /// See [`MoneyAmount::compare`].
    pub async fn equals<'o, S: RateStore>(
        &self,
        other: impl Into<Operand<'o>>,
        engine: &ConversionEngine<S>,
    ) -> Result<bool, MoneyError> {
        Ok(self.compare(other, engine).await? == Ordering::Equal)
    }

    /// Returns true if [`MoneyAmount::compare`] finds the sides different.
    ///
    /// # Errors
    ///
    /// See [`MoneyAmount::compare`].
    pub async fn not_equals<'o, S: RateStore>(
        &self,
        other: impl Into<Operand<'o>>,
        engine: &ConversionEngine<S>,
    ) -> Result<bool, MoneyError> {
        Ok(!self.equals(other, engine).await?)
    }

    /// Returns `self + other` in this amount's currency.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the sum does not fit, or `Currency` if a
    /// conversion fails.
    pub async fn add<'o, S: RateStore>(
        &self,
        other: impl Into<Operand<'o>>,
        engine: &ConversionEngine<S>,
    ) -> Result<Self, MoneyError> {
        let other = self.operand_value(other.into(), engine).await?;
        let sum = self.amount.checked_add(other).ok_or(MoneyError::Overflow)?;
        self.with_amount(sum, engine).await
    }

    /// Returns `self - other` in this amount's currency.
    ///
    /// # Errors
    ///
    /// See [`MoneyAmount::add`].
    pub async fn subtract<'o, S: RateStore>(
        &self,
        other: impl Into<Operand<'o>>,
        engine: &ConversionEngine<S>,
    ) -> Result<Self, MoneyError> {
        let other = self.operand_value(other.into(), engine).await?;
        let difference = self.amount.checked_sub(other).ok_or(MoneyError::Overflow)?;
        self.with_amount(difference, engine).await
    }

    /// Returns `other - self` in this amount's currency.
    ///
    /// # Errors
    ///
    /// See [`MoneyAmount::add`].
    pub async fn subtract_from<'o, S: RateStore>(
        &self,
        other: impl Into<Operand<'o>>,
        engine: &ConversionEngine<S>,
    ) -> Result<Self, MoneyError> {
        let other = self.operand_value(other.into(), engine).await?;
        let difference = other.checked_sub(self.amount).ok_or(MoneyError::Overflow)?;
        self.with_amount(difference, engine).await
    }

    /// Returns `self * other` in this amount's currency.
    ///
    /// A money operand is converted into this currency and multiplied as a
    /// plain number. The result is money, not money squared.
    ///
    /// # Errors
    ///
    /// See [`MoneyAmount::add`].
    pub async fn multiply<'o, S: RateStore>(
        &self,
        other: impl Into<Operand<'o>>,
        engine: &ConversionEngine<S>,
    ) -> Result<Self, MoneyError> {
        let other = self.operand_value(other.into(), engine).await?;
        let product = self.amount.checked_mul(other).ok_or(MoneyError::Overflow)?;
        self.with_amount(product, engine).await
    }

    async fn operand_value<S: RateStore>(
        &self,
        other: Operand<'_>,
        engine: &ConversionEngine<S>,
    ) -> Result<Decimal, MoneyError> {
        match other {
            Operand::Money(money) => money.amount_as(&self.currency, engine).await,
            Operand::Number(number) => Ok(number),
        }
    }

    async fn with_amount<S: RateStore>(
        &self,
        amount: Decimal,
        engine: &ConversionEngine<S>,
    ) -> Result<Self, MoneyError> {
        Self::new(amount, Some(self.currency.clone()), engine).await
    }
}

impl fmt::Display for MoneyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
