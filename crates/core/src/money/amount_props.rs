//! Property-based tests for money amount arithmetic and comparison.

use std::cmp::Ordering;

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::amount::MoneyAmount;
use crate::currency::CachePolicy;
use crate::currency::testing::{fixture_engine, iso};

/// Strategy to generate amounts (-100,000.00 to 100,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

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

    /// The derived base amount equals a direct conversion.
    #[test]
    fn prop_base_amount_matches_conversion(value in amount(), code in fixture_code()) {
        block_on(async {
            let engine = fixture_engine(CachePolicy::AlwaysRevalidate);
            let money = MoneyAmount::new(value, Some(iso(code)), &engine).await.unwrap();
            let expected = engine.to_base_currency(value, &iso(code)).await.unwrap();
            prop_assert_eq!(money.base_amount(), expected.amount);
            prop_assert_eq!(money.base_exchange_rate(), expected.rate);
            Ok(())
        })?;
    }

    /// A sum is expressed in the left operand's currency.
    #[test]
    fn prop_add_uses_left_currency(
        left in amount(),
        right in amount(),
        left_code in fixture_code(),
        right_code in fixture_code(),
    ) {
        block_on(async {
            let engine = fixture_engine(CachePolicy::AlwaysRevalidate);
            let a = MoneyAmount::new(left, Some(iso(left_code)), &engine).await.unwrap();
            let b = MoneyAmount::new(right, Some(iso(right_code)), &engine).await.unwrap();

            let sum = a.add(&b, &engine).await.unwrap();
            let b_in_a = b.amount_as(a.currency(), &engine).await.unwrap();
            prop_assert_eq!(sum.currency(), a.currency());
            prop_assert_eq!(sum.amount(), a.amount() + b_in_a);
            Ok(())
        })?;
    }

    /// Comparing against a number looks at the raw amount only.
    #[test]
    fn prop_number_comparison_ignores_currency(
        value in amount(),
        number in amount(),
        code in fixture_code(),
    ) {
        block_on(async {
            let engine = fixture_engine(CachePolicy::AlwaysRevalidate);
            let money = MoneyAmount::new(value, Some(iso(code)), &engine).await.unwrap();
            prop_assert_eq!(money.compare(number, &engine).await.unwrap(), value.cmp(&number));
            Ok(())
        })?;
    }

    /// Money comparison is antisymmetric.
    #[test]
    fn prop_money_comparison_is_antisymmetric(
        left in amount(),
        right in amount(),
        left_code in fixture_code(),
        right_code in fixture_code(),
    ) {
        block_on(async {
            let engine = fixture_engine(CachePolicy::AlwaysRevalidate);
            let a = MoneyAmount::new(left, Some(iso(left_code)), &engine).await.unwrap();
            let b = MoneyAmount::new(right, Some(iso(right_code)), &engine).await.unwrap();
            let forward = a.compare(&b, &engine).await.unwrap();
            let backward = b.compare(&a, &engine).await.unwrap();
            prop_assert_eq!(forward, backward.reverse());
            prop_assert_eq!(forward == Ordering::Equal, a.equals(&b, &engine).await.unwrap());
            Ok(())
        })?;
    }
}
