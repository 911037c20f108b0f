use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::interest::Period;
use crate::types::DayCountMode;

const NON_LEAP_YEAR_DAYS: i64 = 365;
const LEAP_YEAR_DAYS: i64 = 366;

/// engine for accruing simple interest over a decomposed period
pub struct AccrualEngine {
    pub mode: DayCountMode,
}

impl AccrualEngine {
    pub fn new(mode: DayCountMode) -> Self {
        Self { mode }
    }

    /// Length of the period in years as an exact fraction `(numerator, denominator)`.
    pub fn year_fraction(&self, period: &Period) -> (i64, i64) {
        match self.mode {
            DayCountMode::ByDayTotal => (period.total_days, NON_LEAP_YEAR_DAYS),
            DayCountMode::ByDayPartial => (
                period.whole_years * NON_LEAP_YEAR_DAYS + period.remainder_days(),
                NON_LEAP_YEAR_DAYS,
            ),
            DayCountMode::ByYear => (
                period.whole_years * NON_LEAP_YEAR_DAYS * LEAP_YEAR_DAYS
                    + period.non_leap_days * LEAP_YEAR_DAYS
                    + period.leap_days * NON_LEAP_YEAR_DAYS,
                NON_LEAP_YEAR_DAYS * LEAP_YEAR_DAYS,
            ),
        }
    }

    /// Simple interest on `principal` at `rate` percent for the period,
    /// truncated toward zero.
    ///
    /// The numerator and denominator are formed exactly and divided once, so
    /// the truncated result never depends on intermediate rounding.
    pub fn accrue(&self, principal: Money, rate: Rate, period: &Period) -> Result<Money> {
        let (years_num, years_den) = self.year_fraction(period);
        let overflow = || LedgerError::CalculationError {
            message: format!(
                "interest overflow: {} at {}% over {} days",
                principal, rate, period.total_days
            ),
        };

        let numerator = principal
            .as_decimal()
            .checked_mul(rate.as_percent())
            .and_then(|n| n.checked_mul(Decimal::from(years_num)))
            .ok_or_else(overflow)?;
        let denominator = Decimal::from(years_den * 100);
        let interest = numerator.checked_div(denominator).ok_or_else(overflow)?;

        Ok(Money::from_decimal_truncated(interest))
    }
}
