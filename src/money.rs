//! Exact monetary amounts.
//!
//! Wraps `rust_decimal` so that balances never touch binary floating point.
//! Amounts carry at most four decimal places; parsing rejects anything finer
//! rather than silently rounding it away.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing a [`Money`] value from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseMoneyError {
    /// Not a decimal number at all
    #[error("invalid amount {input:?}: {reason}")]
    Invalid { input: String, reason: String },

    /// More fractional digits than the ledger keeps
    #[error("amount {0:?} has more than {max} decimal places", max = Money::SCALE)]
    TooPrecise(String),

    /// Too many integer digits to keep four decimal places
    #[error("amount {0:?} is outside the representable range")]
    OutOfRange(String),
}

/// A monetary amount with exactly four decimal places.
///
/// The magnitude is bounded by [`Money::max_value`], the largest value a
/// 96-bit mantissa can hold at scale four. Arithmetic is checked and never
/// leaves that range.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use ledger_engine::Money;
///
/// let amount = Money::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.5000");
/// assert!(Money::from_str("0.00001").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places kept.
    pub const SCALE: u32 = 4;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Largest representable amount: `7922816251426433759354395.0335`.
    pub fn max_value() -> Self {
        Money(Decimal::from_parts(
            u32::MAX,
            u32::MAX,
            u32::MAX,
            false,
            Self::SCALE,
        ))
    }

    /// Creates a `Money` from a `Decimal`, rounding to four decimal places.
    ///
    /// Returns `None` when the magnitude exceeds [`Money::max_value`].
    pub fn new(value: Decimal) -> Option<Self> {
        let mut scaled = value.round_dp(Self::SCALE);
        if scaled.abs() > Self::max_value().0 {
            return None;
        }
        scaled.rescale(Self::SCALE);
        Some(Money(scaled))
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).and_then(Money::new)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).and_then(Money::new)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Strictly less than zero.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        // |i64| * 10^4 always fits the 96-bit mantissa
        Money(Decimal::from_i128_with_scale(
            i128::from(value) * 10_000,
            Self::SCALE,
        ))
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed).map_err(|e| ParseMoneyError::Invalid {
            input: trimmed.to_string(),
            reason: e.to_string(),
        })?;
        if decimal.normalize().scale() > Self::SCALE {
            return Err(ParseMoneyError::TooPrecise(trimmed.to_string()));
        }
        Money::new(decimal).ok_or_else(|| ParseMoneyError::OutOfRange(trimmed.to_string()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Money::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn test_from_str_pads_to_four_places() {
        assert_eq!(money("1").to_string(), "1.0000");
        assert_eq!(money("1.5").to_string(), "1.5000");
        assert_eq!(money("  2.1234 ").to_string(), "2.1234");
    }

    #[test]
    fn test_from_str_rejects_excess_precision() {
        assert_eq!(
            Money::from_str("0.00001"),
            Err(ParseMoneyError::TooPrecise("0.00001".to_string()))
        );
        // trailing zeros beyond the scale are harmless
        assert_eq!(money("3.140000").to_string(), "3.1400");
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!(matches!(
            Money::from_str("ten"),
            Err(ParseMoneyError::Invalid { .. })
        ));
    }

    #[test]
    fn test_arithmetic_is_exact() {
        let mut total = Money::ZERO;
        for _ in 0..10 {
            total = total.checked_add(money("0.1")).unwrap();
        }
        assert_eq!(total, Money::from(1));
        assert_eq!(
            money("0.3").checked_sub(money("0.1")).unwrap().to_string(),
            "0.2000"
        );
    }

    #[test]
    fn test_sign_predicates() {
        assert!(money("0.0001").is_positive());
        assert!(!Money::ZERO.is_positive());
        assert!(Money::ZERO.is_zero());
        assert!(money("-1").is_negative());
    }

    #[test]
    fn test_range_bounds() {
        let largest = money("7922816251426433759354395.0335");
        assert_eq!(largest, Money::max_value());
        assert_eq!(largest.to_string(), "7922816251426433759354395.0335");
        assert_eq!(
            money("-7922816251426433759354395.0335").to_string(),
            "-7922816251426433759354395.0335"
        );

        assert!(Money::from_str("7922816251426433759354395.0336").is_err());
        assert_eq!(
            Money::from_str("7922816251426433759354396"),
            Err(ParseMoneyError::OutOfRange(
                "7922816251426433759354396".to_string()
            ))
        );
        assert!(matches!(
            Money::from_str("79228162514264337593543950335"),
            Err(ParseMoneyError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_checked_arithmetic_stays_in_range() {
        let max = Money::max_value();
        assert_eq!(max.checked_add(money("0.0001")), None);
        assert_eq!(max.checked_add(Money::from(10)), None);
        assert_eq!(
            max.checked_sub(Money::from(1)).unwrap().to_string(),
            "7922816251426433759354394.0335"
        );
        assert_eq!(
            Money::ZERO
                .checked_sub(max)
                .and_then(|m| m.checked_sub(money("1"))),
            None
        );
    }

    #[test]
    fn test_from_i64() {
        assert_eq!(Money::from(-3).to_string(), "-3.0000");
        assert_eq!(Money::from(i64::MAX).to_string(), "9223372036854775807.0000");
    }
}
