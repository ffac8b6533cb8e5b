//! Exchange rate lookup with read-through caching.

use std::sync::Arc;

use fxcommerce_shared::{CurrencyConfig, IsoCode};
use rust_decimal::Decimal;

use super::cache::{CachePolicy, Clock, RateCache, RateSnapshot, SystemClock};
use super::error::CurrencyError;
use super::rate::CurrencyRate;
use super::store::RateStore;

/// The set of active currency rates, read through a [`RateCache`].
///
/// With caching enabled, a lookup of a code that is missing from the
/// snapshot, or any lookup once the snapshot is stale, reloads every
/// active rate in one storage round-trip. A code still missing after the
/// reload is queried directly and not cached.
pub struct ExchangeRateTable<S> {
    store: S,
    cache: Arc<RateCache>,
    base_currency: IsoCode,
    policy: CachePolicy,
    clock: Arc<dyn Clock>,
}

impl<S: RateStore> ExchangeRateTable<S> {
    /// Creates a table backed by `store` and sharing `cache`.
    #[must_use]
    pub fn new(store: S, cache: Arc<RateCache>, base_currency: IsoCode, policy: CachePolicy) -> Self {
        Self {
            store,
            cache,
            base_currency,
            policy,
            clock: Arc::new(SystemClock),
        }
    }

    /// Creates a table from the currency configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the cache duration is out of range.
    pub fn from_config(
        store: S,
        cache: Arc<RateCache>,
        config: &CurrencyConfig,
    ) -> Result<Self, CurrencyError> {
        let policy = CachePolicy::from_config(config)?;
        Ok(Self::new(store, cache, config.base_currency.clone(), policy))
    }

    /// Replaces the clock used for cache expiry.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the configured system base currency.
    #[must_use]
    pub const fn base_currency(&self) -> &IsoCode {
        &self.base_currency
    }

    /// Returns the cache policy.
    #[must_use]
    pub const fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Returns the shared cache.
    #[must_use]
    pub const fn cache(&self) -> &Arc<RateCache> {
        &self.cache
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the active rate of `code` against the base currency.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no active record exists for `code`.
    pub async fn rate(&self, code: &IsoCode) -> Result<Decimal, CurrencyError> {
        Ok(self.rate_record(code).await?.exchange_rate)
    }

    /// Returns the active record for `code`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no active record exists for `code`, or
    /// `Storage` if the store fails.
    pub async fn rate_record(&self, code: &IsoCode) -> Result<CurrencyRate, CurrencyError> {
        if self.policy != CachePolicy::Disabled {
            if let Some(record) = self.cached_record(code).await? {
                return Ok(record);
            }
            tracing::debug!(currency = %code, "currency missing from rate cache, querying directly");
        }

        self.store
            .find_active_rate(code)
            .await?
            .ok_or_else(|| CurrencyError::NotFound(code.clone()))
    }

    async fn cached_record(&self, code: &IsoCode) -> Result<Option<CurrencyRate>, CurrencyError> {
        let now = self.clock.now();
        let seen = self.cache.snapshot().await;
        if let Some(snapshot) = &seen {
            if snapshot.is_fresh_for(code, self.policy, now) {
                return Ok(snapshot.get(code).cloned());
            }
        }

        let _reload = self.cache.lock_reload().await;

        // Another task may have swapped in a new snapshot while we waited.
        let latest = self.cache.snapshot().await;
        let snapshot = match latest {
            Some(latest) if !same_snapshot(seen.as_ref(), &latest) => latest,
            _ => {
                let rates = self.store.find_all_active_rates().await?;
                let snapshot = self.cache.replace(rates, self.policy, now).await;
                tracing::debug!(
                    currencies = snapshot.len(),
                    recache_at = ?snapshot.recache_at(),
                    "reloaded exchange rate cache"
                );
                snapshot
            }
        };

        Ok(snapshot.get(code).cloned())
    }
}

fn same_snapshot(seen: Option<&Arc<RateSnapshot>>, latest: &Arc<RateSnapshot>) -> bool {
    seen.is_some_and(|seen| Arc::ptr_eq(seen, latest))
}
