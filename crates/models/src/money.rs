//! Minor-unit money arithmetic
//!
//! Every amount in the marketplace is an `i64` count of minor units (cents).
//! Percentages are whole numbers (`10` means 10%).

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

/// Amount of money in minor units
pub type Cents = i64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Percentage outside of the accepted range
    #[error("percentage {0} is out of range")]
    InvalidPercentage(i32),

    /// Result does not fit in minor units
    #[error("amount overflowed while applying a percentage")]
    Overflow,
}

/// Computes `amount * percent / 100`, rounding half away from zero to the cent
pub fn percent_of(amount: Cents, percent: i32) -> Result<Cents, MoneyError> {
    if percent < 0 {
        return Err(MoneyError::InvalidPercentage(percent));
    }

    let value = Decimal::from(amount) * Decimal::from(percent) / Decimal::ONE_HUNDRED;

    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(MoneyError::Overflow)
}

/// Price, tax and total of one cart line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmounts {
    pub price: Cents,
    pub tax_fee: Cents,
    pub total: Cents,
}

impl LineAmounts {
    /// Prices a line for a country tax rate given in whole percent
    pub fn with_tax(price: Cents, tax_rate: i32) -> Result<Self, MoneyError> {
        let tax_fee = percent_of(price, tax_rate)?;
        let total = price.checked_add(tax_fee).ok_or(MoneyError::Overflow)?;

        Ok(Self {
            price,
            tax_fee,
            total,
        })
    }
}

/// Discount a coupon grants on an amount; coupons never exceed 100%
pub fn coupon_discount(total: Cents, discount_percent: i32) -> Result<Cents, MoneyError> {
    if !(0..=100).contains(&discount_percent) {
        return Err(MoneyError::InvalidPercentage(discount_percent));
    }

    percent_of(total, discount_percent)
}

/// Formats minor units as a decimal string with two places (`12345` -> `"123.45"`)
pub fn format_cents(amount: Cents) -> String {
    Decimal::new(amount, 2).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_on_round_price() {
        let line = LineAmounts::with_tax(100_00, 10).unwrap();
        assert_eq!(line.tax_fee, 10_00);
        assert_eq!(line.total, 110_00);
    }

    #[test]
    fn test_zero_tax_rate() {
        let line = LineAmounts::with_tax(49_99, 0).unwrap();
        assert_eq!(line.tax_fee, 0);
        assert_eq!(line.total, 49_99);
    }

    #[test]
    fn test_percent_rounds_half_away_from_zero() {
        // 0.5 cent rounds up
        assert_eq!(percent_of(5, 10).unwrap(), 1);
        // 0.4 cent rounds down
        assert_eq!(percent_of(4, 10).unwrap(), 0);
        assert_eq!(percent_of(19_99, 7).unwrap(), 1_40);
    }

    #[test]
    fn test_coupon_discount() {
        assert_eq!(coupon_discount(110_00, 20).unwrap(), 22_00);
        assert_eq!(coupon_discount(55_00, 100).unwrap(), 55_00);
        assert_eq!(
            coupon_discount(55_00, 101),
            Err(MoneyError::InvalidPercentage(101))
        );
        assert_eq!(
            coupon_discount(55_00, -5),
            Err(MoneyError::InvalidPercentage(-5))
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        assert_eq!(LineAmounts::with_tax(i64::MAX, 10), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(12345), "123.45");
        assert_eq!(format_cents(5), "0.05");
    }
}
