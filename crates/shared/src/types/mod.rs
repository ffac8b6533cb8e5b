//! Common types used across the application.

pub mod currency;
pub mod id;

pub use currency::{CurrencyChoice, IsoCode, IsoCodeError};
pub use id::*;
