//! `SeaORM` entity definitions.

pub mod currency_exchange_rates;
pub mod money_amounts;

pub mod prelude {
    //! Entity re-exports.
    pub use super::currency_exchange_rates::Entity as CurrencyExchangeRates;
    pub use super::money_amounts::Entity as MoneyAmounts;
}
