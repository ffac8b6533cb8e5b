//! In-memory rate store and clock for tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, TimeDelta, Utc};
use fxcommerce_shared::IsoCode;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::cache::{CachePolicy, Clock, RateCache};
use super::conversion::ConversionEngine;
use super::error::CurrencyError;
use super::rate::CurrencyRate;
use super::store::RateStore;
use super::table::ExchangeRateTable;

pub(crate) fn iso(code: &str) -> IsoCode {
    IsoCode::new(code).unwrap()
}

/// SEK base with three foreign currencies at rates that divide exactly.
pub(crate) fn fixture_rates() -> Vec<CurrencyRate> {
    vec![
        CurrencyRate::new(iso("SEK"), Decimal::ONE)
            .with_marks(",", " ")
            .with_decimals(0, true),
        CurrencyRate::new(iso("USD"), dec!(8))
            .with_marks(".", ",")
            .with_decimals(2, true),
        CurrencyRate::new(iso("EUR"), dec!(11.25))
            .with_marks(",", " ")
            .with_decimals(2, false),
        CurrencyRate::new(iso("INR"), dec!(0.125))
            .with_marks(".", ",")
            .with_decimals(2, true),
    ]
}

/// Builds an engine over the fixture rates with a manual clock.
pub(crate) fn fixture_engine(policy: CachePolicy) -> ConversionEngine<MemoryRateStore> {
    let table = ExchangeRateTable::new(
        MemoryRateStore::with_rates(fixture_rates()),
        Arc::new(RateCache::new()),
        iso("SEK"),
        policy,
    )
    .with_clock(Arc::new(ManualClock::default()));
    ConversionEngine::new(table)
}

/// Rate store that counts its storage round-trips.
#[derive(Debug, Default)]
pub(crate) struct MemoryRateStore {
    rates: Mutex<Vec<CurrencyRate>>,
    single_loads: AtomicUsize,
    full_loads: AtomicUsize,
}

impl MemoryRateStore {
    pub(crate) fn with_rates(rates: Vec<CurrencyRate>) -> Self {
        Self {
            rates: Mutex::new(rates),
            ..Self::default()
        }
    }

    pub(crate) fn insert(&self, rate: CurrencyRate) {
        self.rates.lock().unwrap().push(rate);
    }

    pub(crate) fn set_rate(&self, code: &IsoCode, exchange_rate: Decimal) {
        for rate in self.rates.lock().unwrap().iter_mut() {
            if &rate.iso_code == code {
                rate.exchange_rate = exchange_rate;
            }
        }
    }

    pub(crate) fn set_active(&self, code: &IsoCode, active: bool) {
        for rate in self.rates.lock().unwrap().iter_mut() {
            if &rate.iso_code == code {
                rate.active = active;
            }
        }
    }

    pub(crate) fn single_loads(&self) -> usize {
        self.single_loads.load(Ordering::SeqCst)
    }

    pub(crate) fn full_loads(&self) -> usize {
        self.full_loads.load(Ordering::SeqCst)
    }
}

impl RateStore for MemoryRateStore {
    async fn find_active_rate(&self, code: &IsoCode) -> Result<Option<CurrencyRate>, CurrencyError> {
        self.single_loads.fetch_add(1, Ordering::SeqCst);
        let rates = self.rates.lock().unwrap();
        Ok(rates
            .iter()
            .find(|rate| rate.active && &rate.iso_code == code)
            .cloned())
    }

    async fn find_all_active_rates(&self) -> Result<Vec<CurrencyRate>, CurrencyError> {
        self.full_loads.fetch_add(1, Ordering::SeqCst);
        let rates = self.rates.lock().unwrap();
        Ok(rates.iter().filter(|rate| rate.active).cloned().collect())
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub(crate) struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            now: Mutex::new(DateTime::<Utc>::UNIX_EPOCH),
        }
    }
}

impl ManualClock {
    pub(crate) fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
