//! Repository abstractions for data access.
//!
//! Repositories implement the storage ports of the core crate,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod currency_rate;
pub mod money_amount;

pub use currency_rate::CurrencyRateRepository;
pub use money_amount::MoneyAmountRepository;
