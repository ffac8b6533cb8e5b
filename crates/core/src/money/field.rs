//! Money amounts owned by other entities.
//!
//! An owning entity keeps a [`MoneyAmountField`] per amount it references.
//! Reads never write: a missing amount is only created through
//! [`MoneyAmountField::get_or_create_default`].

use fxcommerce_shared::{CurrencyConfig, IsoCode, MoneyAmountId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::{ConversionEngine, RateStore};

use super::amount::MoneyAmount;
use super::error::MoneyError;
use super::store::MoneyAmountStore;

/// One-to-one link from an owning entity to a stored [`MoneyAmount`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoneyAmountField {
    id: Option<MoneyAmountId>,
}

impl MoneyAmountField {
    /// Creates an unlinked field.
    #[must_use]
    pub const fn new() -> Self {
        Self { id: None }
    }

    /// Creates a field linked to an existing amount.
    #[must_use]
    pub const fn linked(id: MoneyAmountId) -> Self {
        Self { id: Some(id) }
    }

    /// Returns the linked id.
    #[must_use]
    pub const fn id(&self) -> Option<MoneyAmountId> {
        self.id
    }

    /// Loads the linked amount, if any.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the link points at a deleted amount.
    pub async fn get<S: RateStore, M: MoneyAmountStore>(
        &self,
        engine: &ConversionEngine<S>,
        store: &M,
    ) -> Result<Option<MoneyAmount>, MoneyError> {
        match self.id {
            Some(id) => MoneyAmount::load(id, engine, store).await.map(Some),
            None => Ok(None),
        }
    }

    /// Loads the linked amount, or creates, saves and links a zero amount
    /// in the base currency. A dangling link is replaced the same way.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if loading or saving fails.
    pub async fn get_or_create_default<S: RateStore, M: MoneyAmountStore>(
        &mut self,
        engine: &ConversionEngine<S>,
        store: &M,
    ) -> Result<MoneyAmount, MoneyError> {
        if let Some(id) = self.id {
            match MoneyAmount::load(id, engine, store).await {
                Err(MoneyError::NotFound(_)) => {
                    tracing::warn!(%id, "linked money amount is missing, creating a new one");
                }
                result => return result,
            }
        }

        let mut amount = MoneyAmount::zero(engine).await?;
        amount.save(engine, store).await?;
        self.id = amount.id();
        Ok(amount)
    }

    /// Links a new base currency amount and deletes the previously linked one.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if saving or deleting fails.
    pub async fn assign_number<S: RateStore, M: MoneyAmountStore>(
        &mut self,
        amount: Decimal,
        engine: &ConversionEngine<S>,
        store: &M,
    ) -> Result<MoneyAmount, MoneyError> {
        let mut created = MoneyAmount::new(amount, None, engine).await?;
        created.save(engine, store).await?;

        let previous = std::mem::replace(&mut self.id, created.id());
        if let Some(previous) = previous {
            store.delete(previous).await?;
        }
        Ok(created)
    }

    /// Links an existing amount, saving it first if it has no id. The
    /// previously linked amount is left in place.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if saving fails.
    pub async fn assign<S: RateStore, M: MoneyAmountStore>(
        &mut self,
        amount: &mut MoneyAmount,
        engine: &ConversionEngine<S>,
        store: &M,
    ) -> Result<(), MoneyError> {
        if amount.id().is_none() {
            amount.save(engine, store).await?;
        }
        self.id = amount.id();
        Ok(())
    }

    /// Unlinks and deletes the linked amount. Returns false if nothing was linked.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if deleting fails. The field stays linked on error.
    pub async fn clear<M: MoneyAmountStore>(&mut self, store: &M) -> Result<bool, MoneyError> {
        let Some(id) = self.id else {
            return Ok(false);
        };
        store.delete(id).await?;
        self.id = None;
        Ok(true)
    }
}

impl From<MoneyAmountId> for MoneyAmountField {
    fn from(id: MoneyAmountId) -> Self {
        Self::linked(id)
    }
}

/// The `(id, amount, currency)` triple that edit forms exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyAmountInput {
    /// Existing amount to update, or `None` to create one.
    pub id: Option<MoneyAmountId>,
    /// Amount in `currency`.
    pub amount: Decimal,
    /// Currency of `amount`.
    pub currency: IsoCode,
}

impl MoneyAmountInput {
    /// The initial value for a new amount: zero in the base currency.
    #[must_use]
    pub fn blank(base_currency: &IsoCode) -> Self {
        Self {
            id: None,
            amount: Decimal::ZERO,
            currency: base_currency.clone(),
        }
    }

    /// Renders the stored amount `id` as a triple. An absent or missing
    /// amount renders as [`MoneyAmountInput::blank`].
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the lookup fails.
    pub async fn decompress<S: RateStore, M: MoneyAmountStore>(
        id: Option<MoneyAmountId>,
        engine: &ConversionEngine<S>,
        store: &M,
    ) -> Result<Self, MoneyError> {
        let stored = match id {
            Some(id) => store.find_by_id(id).await?,
            None => None,
        };
        Ok(stored.map_or_else(
            || Self::blank(engine.base_currency()),
            |amount| Self {
                id: amount.id(),
                amount: amount.amount(),
                currency: amount.currency().clone(),
            },
        ))
    }

    /// Validates the triple, writes it into the referenced amount (or a
    /// new one) and saves it.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCurrency` if the currency is not configured,
    /// `NotFound` if `id` references a missing amount, and `Currency` or
    /// `Storage` if deriving or saving fails.
    pub async fn apply<S: RateStore, M: MoneyAmountStore>(
        &self,
        config: &CurrencyConfig,
        engine: &ConversionEngine<S>,
        store: &M,
    ) -> Result<MoneyAmount, MoneyError> {
        if !config.is_supported(&self.currency) {
            return Err(MoneyError::UnsupportedCurrency(self.currency.clone()));
        }

        let mut amount = match self.id {
            Some(id) => {
                let mut existing = MoneyAmount::load(id, engine, store).await?;
                existing.set_currency(self.currency.clone(), engine).await?;
                existing.set_amount(self.amount, engine).await?;
                existing
            }
            None => MoneyAmount::new(self.amount, Some(self.currency.clone()), engine).await?,
        };
        amount.save(engine, store).await?;
        Ok(amount)
    }
}
