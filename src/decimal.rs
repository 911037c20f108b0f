use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// whole-unit currency amount; ledger arithmetic never leaves the integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// create from decimal, discarding any fraction toward zero
    pub fn from_decimal_truncated(d: Decimal) -> Self {
        Money(d.trunc().normalize())
    }

    /// create from integer amount
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// sum that reports overflow as a calculation error
    pub fn try_add(self, other: Money) -> crate::errors::Result<Money> {
        self.checked_add(other)
            .ok_or_else(|| overflow(format!("{} + {}", self, other)))
    }

    /// difference that reports overflow as a calculation error
    pub fn try_sub(self, other: Money) -> crate::errors::Result<Money> {
        self.checked_sub(other)
            .ok_or_else(|| overflow(format!("{} - {}", self, other)))
    }

    /// sign as -1, 0 or 1
    pub fn signum(&self) -> i32 {
        if self.is_positive() {
            1
        } else if self.is_negative() {
            -1
        } else {
            0
        }
    }

    /// format with `,` between groups of three digits
    pub fn grouped(&self) -> String {
        let digits = self.0.abs().trunc().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }
        if self.is_negative() {
            out.insert(0, '-');
        }
        out
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Money::from_decimal_truncated(Decimal::from_str(s)?))
    }
}

impl From<i64> for Money {
    fn from(i: i64) -> Self {
        Money::from_major(i)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

fn overflow(expression: String) -> crate::errors::LedgerError {
    crate::errors::LedgerError::CalculationError {
        message: format!("balance overflow: {}", expression),
    }
}

/// annual interest rate held in percent (e.g., 15 for 15%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from percentage decimal (e.g., 26.28)
    pub fn from_percent(p: Decimal) -> Self {
        Rate(p.normalize())
    }

    /// create from whole percentage
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p))
    }

    /// get as percentage
    pub fn as_percent(&self) -> Decimal {
        self.0
    }

    /// scale by a factor, keeping the result normalised; none on overflow
    pub fn scaled(&self, factor: Decimal) -> Option<Rate> {
        self.0.checked_mul(factor).map(|r| Rate(r.normalize()))
    }

    /// divide by a factor, keeping the result normalised; none on overflow
    pub fn unscaled(&self, factor: Decimal) -> Option<Rate> {
        self.0.checked_div(factor).map(|r| Rate(r.normalize()))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_percent(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_truncation_keeps_sign() {
        assert_eq!(Money::from_decimal_truncated(dec!(1234.99)), Money::from_major(1234));
        assert_eq!(Money::from_decimal_truncated(dec!(-1234.99)), Money::from_major(-1234));
        assert_eq!(Money::from_decimal_truncated(dec!(1234.99)).to_string(), "1234");
    }

    #[test]
    fn test_grouped_formatting() {
        assert_eq!(Money::from_major(0).grouped(), "0");
        assert_eq!(Money::from_major(999).grouped(), "999");
        assert_eq!(Money::from_major(1_000).grouped(), "1,000");
        assert_eq!(Money::from_major(1_110_000).grouped(), "1,110,000");
        assert_eq!(Money::from_major(-13_862).grouped(), "-13,862");
        assert_eq!(Money::from_major(-100).grouped(), "-100");
    }

    #[test]
    fn test_signum() {
        assert_eq!(Money::from_major(5).signum(), 1);
        assert_eq!(Money::ZERO.signum(), 0);
        assert_eq!(Money::from_major(-5).signum(), -1);
        assert!(!Money::ZERO.is_positive());
        assert!(!Money::ZERO.is_negative());
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let huge = Money::from_decimal_truncated(Decimal::MAX);
        assert_eq!(huge.checked_add(Money::from_major(1)), None);
        assert_eq!((-huge).checked_sub(Money::from_major(1)), None);
        assert_eq!(
            Money::from_major(5).checked_sub(Money::from_major(7)),
            Some(Money::from_major(-2))
        );
        assert!(matches!(
            huge.try_add(huge),
            Err(crate::errors::LedgerError::CalculationError { .. })
        ));
        assert_eq!(Money::from_major(5).try_add(Money::from_major(7)).unwrap(), Money::from_major(12));
    }

    #[test]
    fn test_rate_display_is_normalised() {
        assert_eq!(Rate::from_percentage(15).scaled(dec!(1.46)).unwrap().to_string(), "21.9");
        assert_eq!(Rate::from_percentage(18).scaled(dec!(1.46)).unwrap().to_string(), "26.28");
        assert_eq!(
            Rate::from_percent(dec!(21.90)).unscaled(dec!(1.46)),
            Some(Rate::from_percentage(15))
        );
        assert_eq!(Rate::from_percent(Decimal::MAX).scaled(dec!(1.46)), None);
        assert_eq!(Rate::from_percentage(15).unscaled(Decimal::ZERO), None);
        assert_eq!(Rate::from_percent(dec!(5.50)).to_string(), "5.5");
    }
}
