//! Seeds default exchange rates for fxcommerce development and testing.
//!
//! Rates are expressed against SEK. Every supported currency that has a
//! default rate is upserted and activated, then formatted once through the
//! conversion engine as a smoke check.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use fxcommerce_core::currency::{ConversionEngine, CurrencyRate, ExchangeRateTable, RateCache};
use fxcommerce_db::{CurrencyRateRepository, connect};
use fxcommerce_shared::{AppConfig, IsoCode};
use rust_decimal::Decimal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Currency the default rates are expressed against.
const SEED_BASE: &str = "SEK";

/// Code, name, symbol, rate (mantissa, scale), decimal mark, thousand mark, places.
type SeedRow = (&'static str, &'static str, &'static str, (i64, u32), &'static str, &'static str, u32);

const DEFAULT_RATES: &[SeedRow] = &[
    ("SEK", "Swedish krona", "kr", (1, 0), ",", " ", 2),
    ("USD", "US dollar", "$", (1050, 2), ".", ",", 2),
    ("EUR", "Euro", "€", (1150, 2), ",", " ", 2),
    ("INR", "Indian rupee", "₹", (125, 3), ".", ",", 2),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fxcommerce=debug,seeder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load_validated().context("failed to load configuration")?;
    if config.currency.base_currency != SEED_BASE {
        warn!(
            base_currency = %config.currency.base_currency,
            "default rates are expressed against {SEED_BASE}, conversions will be off"
        );
    }

    let db = connect(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    let repo = CurrencyRateRepository::new(db);
    for rate in default_rates()? {
        if !config.currency.is_supported(&rate.iso_code) {
            info!(currency = %rate.iso_code, "not in supported currencies, skipping");
            continue;
        }
        repo.upsert(&rate).await?;
    }

    let table = ExchangeRateTable::from_config(repo, Arc::new(RateCache::new()), &config.currency)?;
    let engine = ConversionEngine::new(table);
    let sample = Decimal::new(12_345_678, 3);
    for choice in &config.currency.supported_currencies {
        match engine.format(sample, &choice.code).await {
            Ok(formatted) => info!(currency = %choice.code, %formatted, "seeded"),
            Err(err) => warn!(currency = %choice.code, error = %err, "no usable rate"),
        }
    }

    info!("Seeding complete");
    Ok(())
}

fn default_rates() -> anyhow::Result<Vec<CurrencyRate>> {
    DEFAULT_RATES
        .iter()
        .map(
            |&(code, name, symbol, (mantissa, scale), decimal_mark, thousand_mark, places)| {
                let mut rate = CurrencyRate::new(IsoCode::new(code)?, Decimal::new(mantissa, scale))
                    .with_marks(decimal_mark, thousand_mark)
                    .with_decimals(places, true);
                rate.name = name.to_string();
                rate.symbol = symbol.to_string();
                Ok(rate)
            },
        )
        .collect()
}
