//! Application configuration management.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::types::{CurrencyChoice, IsoCode};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Currency and exchange rate configuration.
    #[serde(default)]
    pub currency: CurrencyConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Currency configuration, read once at process start.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyConfig {
    /// The system base currency every rate is expressed against.
    #[serde(default = "default_base_currency")]
    pub base_currency: IsoCode,
    /// Whether exchange rate lookups go through the shared rate cache.
    #[serde(default = "default_cache_exchange_rates")]
    pub cache_exchange_rates: bool,
    /// Minutes a loaded rate table stays fresh. Zero or less revalidates
    /// on every lookup.
    #[serde(default = "default_cache_duration_minutes")]
    pub cache_duration_minutes: i64,
    /// Currencies offered for selection, in display order.
    #[serde(default = "default_supported_currencies")]
    pub supported_currencies: Vec<CurrencyChoice>,
}

fn default_base_currency() -> IsoCode {
    IsoCode::from_static("SEK")
}

fn default_cache_exchange_rates() -> bool {
    true
}

fn default_cache_duration_minutes() -> i64 {
    2
}

fn default_supported_currencies() -> Vec<CurrencyChoice> {
    ["SEK", "USD", "EUR", "INR"]
        .into_iter()
        .map(|code| CurrencyChoice::new(IsoCode::from_static(code)))
        .collect()
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            base_currency: default_base_currency(),
            cache_exchange_rates: default_cache_exchange_rates(),
            cache_duration_minutes: default_cache_duration_minutes(),
            supported_currencies: default_supported_currencies(),
        }
    }
}

impl CurrencyConfig {
    /// Returns true if `code` is one of the supported currencies.
    #[must_use]
    pub fn is_supported(&self, code: &IsoCode) -> bool {
        self.supported_currencies.iter().any(|c| &c.code == code)
    }

    /// Checks the currency settings for consistency.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if the supported list is empty,
    /// contains duplicates, or does not include the base currency.
    pub fn validate(&self) -> AppResult<()> {
        if self.supported_currencies.is_empty() {
            return Err(AppError::Configuration(
                "supported_currencies cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for choice in &self.supported_currencies {
            if !seen.insert(choice.code.as_str()) {
                return Err(AppError::Configuration(format!(
                    "currency {} is listed twice in supported_currencies",
                    choice.code
                )));
            }
        }

        if !self.is_supported(&self.base_currency) {
            return Err(AppError::Configuration(format!(
                "base currency {} is not in supported_currencies",
                self.base_currency
            )));
        }

        Ok(())
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FXCOMMERCE").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Loads configuration and validates the currency settings.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if loading or validation fails.
    pub fn load_validated() -> AppResult<Self> {
        let config = Self::load()?;
        config.currency.validate()?;
        Ok(config)
    }
}
