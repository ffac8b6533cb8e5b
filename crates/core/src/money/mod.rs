//! Money amounts in any supported currency.
//!
//! A [`MoneyAmount`] stores its amount and currency together with the
//! equivalent in the system base currency, derived through a
//! [`ConversionEngine`](crate::currency::ConversionEngine).

pub mod amount;
pub mod error;
pub mod field;
pub mod operand;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod amount_props;

pub use amount::{MoneyAmount, MoneyAmountRecord};
pub use error::MoneyError;
pub use field::{MoneyAmountField, MoneyAmountInput};
pub use operand::Operand;
pub use store::MoneyAmountStore;
