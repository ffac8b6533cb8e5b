//! Amount formatting.
//!
//! Fractional digits are truncated to the currency's decimal places, never
//! rounded, and the integer part is never carried up.

use rust_decimal::Decimal;

use super::rate::{CurrencyRate, MAX_DECIMAL_PLACES};

/// Formats `amount` using the separators and decimal rules of `rate`.
///
/// The integer part is grouped in threes with `thousand_mark`. The
/// fractional part is truncated to `decimal_places` digits; trailing zeros
/// are either stripped or kept according to `remove_trailing_zeros`, and
/// the decimal mark is only written when digits remain.
#[must_use]
pub fn format_amount(amount: Decimal, rate: &CurrencyRate) -> String {
    let magnitude = amount.abs();
    let integer = magnitude.trunc();
    let fraction = magnitude - integer;

    let mut out = group_thousands(&integer.normalize().to_string(), &rate.thousand_mark);

    let places = rate.decimal_places.min(MAX_DECIMAL_PLACES);
    if places > 0 {
        let digits = fraction_digits(fraction, places);
        let digits = if rate.remove_trailing_zeros {
            digits.trim_end_matches('0')
        } else {
            digits.as_str()
        };
        if !digits.is_empty() {
            out.push_str(&rate.decimal_mark);
            out.push_str(digits);
        }
    }

    if amount.is_sign_negative() && out.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.insert(0, '-');
    }
    out
}

fn fraction_digits(fraction: Decimal, places: u32) -> String {
    let scale = Decimal::from(10_i64.pow(places));
    let digits = (fraction * scale).trunc().normalize().to_string();
    format!("{digits:0>width$}", width = places as usize)
}

fn group_thousands(digits: &str, mark: &str) -> String {
    if mark.is_empty() || digits.len() <= 3 {
        return digits.to_string();
    }

    let head = match digits.len() % 3 {
        0 => 3,
        n => n,
    };
    let mut out = String::with_capacity(digits.len() + mark.len() * (digits.len() / 3));
    out.push_str(&digits[..head]);
    let mut idx = head;
    while idx < digits.len() {
        out.push_str(mark);
        out.push_str(&digits[idx..idx + 3]);
        idx += 3;
    }
    out
}
