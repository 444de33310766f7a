//! Money conversion utilities using rust_decimal for precision
//!
//! Monetary values are stored and computed as integer minor units (cents,
//! `i64`); `Decimal` appears only at the API boundary. Line totals are plain
//! integer multiplication, so no rounding can occur after the conversion.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

/// Maximum allowed amount per price or total (1,000,000.00 in cents)
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000;

/// Money conversion errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("amount must be non-negative, got {0}")]
    Negative(Decimal),

    #[error("amount has more than two decimal places: {0}")]
    TooPrecise(Decimal),

    #[error("amount exceeds maximum allowed: {0}")]
    TooLarge(Decimal),
}

/// Convert a client-supplied decimal amount into integer cents.
///
/// Rejects negative amounts, amounts with more than two fractional digits,
/// and amounts above [`MAX_AMOUNT_CENTS`].
pub fn to_cents(amount: Decimal) -> Result<i64, MoneyError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(MoneyError::Negative(amount));
    }
    if amount.normalize().scale() > 2 {
        return Err(MoneyError::TooPrecise(amount));
    }
    let cents = (amount * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or(MoneyError::TooLarge(amount))?;
    if cents > MAX_AMOUNT_CENTS {
        return Err(MoneyError::TooLarge(amount));
    }
    Ok(cents)
}

/// Render integer cents as a two-decimal-place amount.
pub fn to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("test literal")
    }

    #[test]
    fn converts_two_decimal_amounts() {
        assert_eq!(to_cents(dec("9.00")).unwrap(), 900);
        assert_eq!(to_cents(dec("0.05")).unwrap(), 5);
        assert_eq!(to_cents(dec("12")).unwrap(), 1200);
        assert_eq!(to_cents(dec("0")).unwrap(), 0);
    }

    #[test]
    fn rejects_negative_and_too_precise() {
        assert_eq!(
            to_cents(dec("-1.00")),
            Err(MoneyError::Negative(dec("-1.00")))
        );
        assert_eq!(
            to_cents(dec("1.005")),
            Err(MoneyError::TooPrecise(dec("1.005")))
        );
    }

    #[test]
    fn rejects_amounts_above_maximum() {
        assert!(matches!(
            to_cents(dec("1000000.01")),
            Err(MoneyError::TooLarge(_))
        ));
    }

    #[test]
    fn cents_round_trip() {
        let cents = to_cents(dec("45.00")).unwrap();
        assert_eq!(cents, 4500);
        assert_eq!(to_decimal(cents), dec("45.00"));
        assert_eq!(to_decimal(cents).to_string(), "45.00");
    }
}
