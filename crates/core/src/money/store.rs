//! Money amount storage port.

use std::future::Future;

use fxcommerce_shared::MoneyAmountId;

use super::amount::MoneyAmount;
use super::error::MoneyError;

/// Repository trait for persisting money amounts.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait MoneyAmountStore: Send + Sync {
    /// Find a stored amount. Derived fields are returned as stored.
    fn find_by_id(
        &self,
        id: MoneyAmountId,
    ) -> impl Future<Output = Result<Option<MoneyAmount>, MoneyError>> + Send;

    /// Insert the amount if it has no id, update it otherwise.
    ///
    /// Returns the stored value, carrying its id.
    fn save(
        &self,
        amount: &MoneyAmount,
    ) -> impl Future<Output = Result<MoneyAmount, MoneyError>> + Send;

    /// Delete a stored amount. Returns false if nothing was deleted.
    fn delete(&self, id: MoneyAmountId) -> impl Future<Output = Result<bool, MoneyError>> + Send;
}
