//! Process-wide exchange rate cache.
//!
//! The cache holds an immutable [`RateSnapshot`] of every active rate.
//! Readers clone the `Arc` to the current snapshot and never hold a lock
//! while they look a code up. A reload builds a complete new snapshot and
//! swaps it in; only one reload runs at a time.
//!
//! Lifecycle:
//! - init: [`RateCache::new`] starts empty; the first lookup populates it.
//! - invalidate: a lookup reloads once the snapshot is stale under the
//!   table's [`CachePolicy`], or [`RateCache::invalidate`] drops it.
//! - teardown: dropping the last `Arc<RateCache>` frees the snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use fxcommerce_shared::{CurrencyConfig, IsoCode};
use tokio::sync::{Mutex, MutexGuard, RwLock};

use super::error::CurrencyError;
use super::rate::CurrencyRate;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// How rate lookups use the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Every lookup queries storage for the single record.
    Disabled,
    /// Every lookup reloads the full table before answering.
    AlwaysRevalidate,
    /// A loaded table is reused until the duration has passed.
    Ttl(TimeDelta),
}

impl CachePolicy {
    /// Builds a policy from the raw settings. A duration of zero or less
    /// means [`CachePolicy::AlwaysRevalidate`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the duration does not fit a `TimeDelta`.
    pub fn from_settings(enabled: bool, duration_minutes: i64) -> Result<Self, CurrencyError> {
        if !enabled {
            return Ok(Self::Disabled);
        }
        if duration_minutes <= 0 {
            return Ok(Self::AlwaysRevalidate);
        }
        TimeDelta::try_minutes(duration_minutes)
            .map(Self::Ttl)
            .ok_or_else(|| {
                CurrencyError::InvalidConfiguration(format!(
                    "cache duration of {duration_minutes} minutes is out of range"
                ))
            })
    }

    /// Builds a policy from the currency configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the duration does not fit a `TimeDelta`.
    pub fn from_config(config: &CurrencyConfig) -> Result<Self, CurrencyError> {
        Self::from_settings(config.cache_exchange_rates, config.cache_duration_minutes)
    }
}

/// An immutable view of every active rate at one point in time.
#[derive(Debug)]
pub struct RateSnapshot {
    rates: HashMap<IsoCode, CurrencyRate>,
    loaded_at: DateTime<Utc>,
    recache_at: Option<DateTime<Utc>>,
}

impl RateSnapshot {
    fn build(rates: Vec<CurrencyRate>, policy: CachePolicy, now: DateTime<Utc>) -> Self {
        let recache_at = match policy {
            CachePolicy::Ttl(ttl) => now.checked_add_signed(ttl),
            CachePolicy::Disabled | CachePolicy::AlwaysRevalidate => None,
        };
        let rates = rates
            .into_iter()
            .map(|rate| (rate.iso_code.clone(), rate))
            .collect();
        Self {
            rates,
            loaded_at: now,
            recache_at,
        }
    }

    /// Returns the record for `code`, if it was active at load time.
    #[must_use]
    pub fn get(&self, code: &IsoCode) -> Option<&CurrencyRate> {
        self.rates.get(code)
    }

    /// Returns the number of cached records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns true if no records were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Returns when the snapshot was loaded.
    #[must_use]
    pub const fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Returns when the snapshot expires, if the policy has a TTL.
    #[must_use]
    pub const fn recache_at(&self) -> Option<DateTime<Utc>> {
        self.recache_at
    }

    /// Returns true if a lookup of `code` at `now` can be answered without
    /// reloading.
    #[must_use]
    pub fn is_fresh_for(&self, code: &IsoCode, policy: CachePolicy, now: DateTime<Utc>) -> bool {
        if !self.rates.contains_key(code) {
            return false;
        }
        match policy {
            CachePolicy::Disabled | CachePolicy::AlwaysRevalidate => false,
            CachePolicy::Ttl(_) => self.recache_at.is_some_and(|at| now < at),
        }
    }
}

/// Shared cache of the active rate table.
#[derive(Debug, Default)]
pub struct RateCache {
    current: RwLock<Option<Arc<RateSnapshot>>>,
    reload: Mutex<()>,
}

impl RateCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current snapshot, if one has been loaded.
    pub async fn snapshot(&self) -> Option<Arc<RateSnapshot>> {
        self.current.read().await.clone()
    }

    /// Serializes reloads. Held across the storage round-trip.
    pub(crate) async fn lock_reload(&self) -> MutexGuard<'_, ()> {
        self.reload.lock().await
    }

    /// Replaces the snapshot with `rates` loaded at `now`.
    pub async fn replace(
        &self,
        rates: Vec<CurrencyRate>,
        policy: CachePolicy,
        now: DateTime<Utc>,
    ) -> Arc<RateSnapshot> {
        let snapshot = Arc::new(RateSnapshot::build(rates, policy, now));
        *self.current.write().await = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Drops the current snapshot. The next lookup reloads.
    pub async fn invalidate(&self) {
        *self.current.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn code(s: &str) -> IsoCode {
        IsoCode::new(s).unwrap()
    }

    fn at(minutes: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + TimeDelta::minutes(minutes)
    }

    #[test]
    fn test_policy_from_settings() {
        assert_eq!(
            CachePolicy::from_settings(false, 5).unwrap(),
            CachePolicy::Disabled
        );
        assert_eq!(
            CachePolicy::from_settings(true, 0).unwrap(),
            CachePolicy::AlwaysRevalidate
        );
        assert_eq!(
            CachePolicy::from_settings(true, -3).unwrap(),
            CachePolicy::AlwaysRevalidate
        );
        assert_eq!(
            CachePolicy::from_settings(true, 2).unwrap(),
            CachePolicy::Ttl(TimeDelta::minutes(2))
        );
        assert!(CachePolicy::from_settings(true, i64::MAX).is_err());
    }

    #[test]
    fn test_policy_from_default_config() {
        let policy = CachePolicy::from_config(&CurrencyConfig::default()).unwrap();
        assert_eq!(policy, CachePolicy::Ttl(TimeDelta::minutes(2)));
    }

    #[test]
    fn test_snapshot_freshness_follows_ttl() {
        let policy = CachePolicy::Ttl(TimeDelta::minutes(2));
        let snapshot = RateSnapshot::build(
            vec![CurrencyRate::new(code("EUR"), dec!(11))],
            policy,
            at(0),
        );
        assert_eq!(snapshot.recache_at(), Some(at(2)));
        assert!(snapshot.is_fresh_for(&code("EUR"), policy, at(1)));
        assert!(!snapshot.is_fresh_for(&code("EUR"), policy, at(2)));
        assert!(!snapshot.is_fresh_for(&code("USD"), policy, at(1)));
    }

    #[test]
    fn test_snapshot_never_fresh_when_revalidating() {
        let snapshot = RateSnapshot::build(
            vec![CurrencyRate::new(code("EUR"), dec!(11))],
            CachePolicy::AlwaysRevalidate,
            at(0),
        );
        assert_eq!(snapshot.recache_at(), None);
        assert!(!snapshot.is_fresh_for(&code("EUR"), CachePolicy::AlwaysRevalidate, at(0)));
    }

    #[tokio::test]
    async fn test_replace_and_invalidate() {
        let cache = RateCache::new();
        assert!(cache.snapshot().await.is_none());

        let policy = CachePolicy::Ttl(TimeDelta::minutes(2));
        let loaded = cache
            .replace(
                vec![
                    CurrencyRate::new(code("EUR"), dec!(11)),
                    CurrencyRate::new(code("USD"), dec!(8)),
                ],
                policy,
                at(0),
            )
            .await;
        assert_eq!(loaded.len(), 2);

        let current = cache.snapshot().await.unwrap();
        assert!(Arc::ptr_eq(&loaded, &current));
        assert_eq!(current.get(&code("usd")).unwrap().exchange_rate, dec!(8));

        cache.invalidate().await;
        assert!(cache.snapshot().await.is_none());
    }
}
