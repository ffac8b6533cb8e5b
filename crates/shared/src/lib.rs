//! Shared types, errors, and configuration for fxcommerce.
//!
//! This crate provides common types used across all other crates:
//! - ISO currency codes and supported-currency choices
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, CurrencyConfig, DatabaseConfig};
pub use error::{AppError, AppResult};
pub use types::{CurrencyChoice, CurrencyRateId, IsoCode, IsoCodeError, MoneyAmountId};
