//! Exchange rates, conversion, and amount formatting.
//!
//! Rates are expressed against the system base currency: one unit of a
//! currency is worth `exchange_rate` units of the base currency.

pub mod cache;
pub mod conversion;
pub mod error;
pub mod format;
pub mod rate;
pub mod store;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod conversion_props;

pub use cache::{CachePolicy, Clock, RateCache, RateSnapshot, SystemClock};
pub use conversion::{Conversion, ConversionEngine};
pub use error::CurrencyError;
pub use format::format_amount;
pub use rate::{CurrencyRate, MAX_DECIMAL_PLACES};
pub use store::RateStore;
pub use table::ExchangeRateTable;
