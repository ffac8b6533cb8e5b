//! Rate storage port.

use std::future::Future;

use fxcommerce_shared::IsoCode;

use super::error::CurrencyError;
use super::rate::CurrencyRate;

/// Repository trait for reading active exchange rates.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait RateStore: Send + Sync {
    /// Find the active record for a currency.
    fn find_active_rate(
        &self,
        code: &IsoCode,
    ) -> impl Future<Output = Result<Option<CurrencyRate>, CurrencyError>> + Send;

    /// List every active record.
    fn find_all_active_rates(
        &self,
    ) -> impl Future<Output = Result<Vec<CurrencyRate>, CurrencyError>> + Send;
}
