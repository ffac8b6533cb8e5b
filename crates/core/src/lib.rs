//! Core business logic for fxcommerce.
//!
//! This crate contains pure business logic with no web or database dependencies.
//! Storage is reached through the port traits [`currency::RateStore`] and
//! [`money::MoneyAmountStore`], implemented by the db crate.
//!
//! # Modules
//!
//! - `currency` - Exchange rate lookup, caching, conversion and formatting
//! - `money` - Money amounts that remember their base currency value

pub mod currency;
pub mod money;
