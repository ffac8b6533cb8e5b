//! Property-based tests for conversion and formatting.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::cache::CachePolicy;
use super::format::format_amount;
use super::rate::CurrencyRate;
use super::testing::{fixture_engine, iso};

/// Strategy to generate amounts (-1,000,000.0000 to 1,000,000.0000).
fn amount() -> impl Strategy<Value = Decimal> {
    (-10_000_000_000i64..10_000_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to pick one of the fixture currencies.
fn fixture_code() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["SEK", "USD", "EUR", "INR"])
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Converting to the same currency returns the amount unchanged.
    #[test]
    fn prop_same_currency_is_identity(amount in amount(), code in fixture_code()) {
        let engine = fixture_engine(CachePolicy::AlwaysRevalidate);
        let code = iso(code);
        let result = block_on(engine.convert(amount, Some(&code), Some(&code))).unwrap();
        prop_assert_eq!(result.amount, amount);
        prop_assert_eq!(result.rate, Decimal::ONE);
    }

    /// Zero converts to zero between any currencies, known or not.
    #[test]
    fn prop_zero_converts_to_zero(from in "[A-Z]{3}", to in "[A-Z]{3}") {
        let engine = fixture_engine(CachePolicy::AlwaysRevalidate);
        let result = block_on(engine.convert(Decimal::ZERO, Some(&iso(&from)), Some(&iso(&to)))).unwrap();
        prop_assert_eq!(result.amount, Decimal::ZERO);
        prop_assert_eq!(engine.rates().store().full_loads(), 0);
    }

    /// Converting to the base currency and back recovers the amount.
    #[test]
    fn prop_base_round_trip(amount in amount(), code in fixture_code()) {
        let engine = fixture_engine(CachePolicy::AlwaysRevalidate);
        let code = iso(code);
        let base = block_on(engine.to_base_currency(amount, &code)).unwrap();
        let back = block_on(engine.from_base_currency(base.amount, &code)).unwrap();
        let drift = (back.amount - amount).abs();
        prop_assert!(drift < Decimal::new(1, 12), "{} drifted to {}", amount, back.amount);
    }

    /// Formatting without marks yields the truncated digits of the amount.
    #[test]
    fn prop_format_without_marks_truncates(amount in amount(), places in 0u32..=4) {
        let rate = CurrencyRate::new(iso("TST"), Decimal::ONE)
            .with_marks(".", "")
            .with_decimals(places, false);
        let formatted = format_amount(amount, &rate);
        let parsed: Decimal = formatted.parse().unwrap();
        prop_assert_eq!(parsed, amount.trunc_with_scale(places));
    }

    /// Grouping never changes the digits, only inserts marks.
    #[test]
    fn prop_grouping_preserves_digits(amount in amount()) {
        let grouped = CurrencyRate::new(iso("TST"), Decimal::ONE)
            .with_marks(".", ",")
            .with_decimals(2, true);
        let plain = grouped.clone().with_marks(".", "");
        prop_assert_eq!(
            format_amount(amount, &grouped).replace(',', ""),
            format_amount(amount, &plain)
        );
    }
}
