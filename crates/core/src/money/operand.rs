//! The right-hand side of money comparisons and arithmetic.

use rust_decimal::Decimal;

use super::amount::MoneyAmount;
use super::error::MoneyError;

/// Either another money amount or a plain number.
///
/// Money operands are converted into the receiver's currency first. Plain
/// numbers are applied to the raw amount as is.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    /// Another money amount.
    Money(&'a MoneyAmount),
    /// A plain number, taken to be in the receiver's currency.
    Number(Decimal),
}

impl<'a> From<&'a MoneyAmount> for Operand<'a> {
    fn from(value: &'a MoneyAmount) -> Self {
        Self::Money(value)
    }
}

impl From<Decimal> for Operand<'_> {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Operand<'_> {
    fn from(value: i64) -> Self {
        Self::Number(Decimal::from(value))
    }
}

impl From<u32> for Operand<'_> {
    fn from(value: u32) -> Self {
        Self::Number(Decimal::from(value))
    }
}

impl TryFrom<f64> for Operand<'_> {
    type Error = MoneyError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Decimal::try_from(value)
            .map(Self::Number)
            .map_err(|_| MoneyError::InvalidOperand(value.to_string()))
    }
}

impl TryFrom<&str> for Operand<'_> {
    type Error = MoneyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value
            .trim()
            .parse::<Decimal>()
            .map(Self::Number)
            .map_err(|_| MoneyError::InvalidOperand(format!("{value:?} is not a number")))
    }
}
