use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::types::RateStandard;

/// civil-code rate effective from a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryRate {
    pub rate: Rate,
    pub effective: NaiveDate,
}

/// interest-limitation cap applying from a principal threshold upward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTier {
    pub rate: Rate,
    pub threshold: Money,
}

/// rate tables consulted by the resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTables {
    /// ordered by effective date, earliest first
    pub statutory: Vec<StatutoryRate>,
    /// ordered by threshold, lowest first
    pub restricted: Vec<RateTier>,
    /// uplift for delinquency damages
    pub delinquency_multiplier: Decimal,
}

impl RateTables {
    /// civil code (5% then 3% from 2020-04-01) and interest rate restriction act tiers
    pub fn japanese() -> Self {
        Self {
            statutory: vec![
                StatutoryRate {
                    rate: Rate::from_percentage(5),
                    effective: NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN),
                },
                StatutoryRate {
                    rate: Rate::from_percentage(3),
                    effective: NaiveDate::from_ymd_opt(2020, 4, 1).unwrap_or(NaiveDate::MIN),
                },
            ],
            restricted: vec![
                RateTier {
                    rate: Rate::from_percentage(20),
                    threshold: Money::ZERO,
                },
                RateTier {
                    rate: Rate::from_percentage(18),
                    threshold: Money::from_major(100_000),
                },
                RateTier {
                    rate: Rate::from_percentage(15),
                    threshold: Money::from_major(1_000_000),
                },
            ],
            delinquency_multiplier: dec!(1.46),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.statutory.is_empty() {
            return Err(LedgerError::InvalidConfiguration {
                message: "statutory rate table is empty".to_string(),
            });
        }
        if self.statutory.windows(2).any(|w| w[1].effective <= w[0].effective) {
            return Err(LedgerError::InvalidConfiguration {
                message: "statutory rates must have strictly increasing effective dates".to_string(),
            });
        }
        if self.restricted.windows(2).any(|w| w[1].threshold <= w[0].threshold) {
            return Err(LedgerError::InvalidConfiguration {
                message: "restricted rate tiers must have strictly increasing thresholds".to_string(),
            });
        }
        if self.delinquency_multiplier <= Decimal::ZERO {
            return Err(LedgerError::InvalidConfiguration {
                message: format!(
                    "delinquency multiplier must be positive, got {}",
                    self.delinquency_multiplier
                ),
            });
        }
        Ok(())
    }
}

impl Default for RateTables {
    fn default() -> Self {
        Self::japanese()
    }
}

/// rate chosen for a line and whether it was freshly determined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateResolution {
    pub rate: Rate,
    /// false when the previous rate was inherited unchanged
    pub changed: bool,
}

/// resolves the rate a line carries forward to the next accrual period
pub struct RateResolver<'a> {
    tables: &'a RateTables,
}

impl<'a> RateResolver<'a> {
    pub fn new(tables: &'a RateTables) -> Self {
        Self { tables }
    }

    /// civil-code rate in effect on a date
    pub fn statutory_rate(&self, date: NaiveDate) -> Result<Rate> {
        self.tables
            .statutory
            .iter()
            .rev()
            .find(|s| s.effective <= date)
            .map(|s| s.rate)
            .ok_or_else(|| LedgerError::CalculationError {
                message: format!("no statutory rate in effect on {}", date),
            })
    }

    /// Determine the rate for a line from its new principal.
    ///
    /// An overpaid balance earns the civil-code rate unless it was already
    /// overpaid under a symbolic standard, in which case the old rate is
    /// kept. A positive balance takes the highest cap whose threshold it
    /// reaches, but only when the previous balance sat below that threshold
    /// (or was zero, or the previous rate was explicit); otherwise the old
    /// rate is kept. The delinquency multiplier is applied when a rate is
    /// freshly determined or delinquency starts, and removed when an
    /// inherited delinquent rate returns to the plain standard.
    pub fn resolve(
        &self,
        this_principal: Money,
        prev_principal: Money,
        prev_rate: Rate,
        date: NaiveDate,
        this_standard: RateStandard,
        prev_standard: RateStandard,
    ) -> Result<RateResolution> {
        if let RateStandard::Explicit(rate) = this_standard {
            return Ok(RateResolution { rate, changed: false });
        }

        let (rate, changed) = if this_principal.is_negative() {
            if prev_standard.is_explicit() || !prev_principal.is_negative() {
                (self.statutory_rate(date)?, true)
            } else {
                (prev_rate, false)
            }
        } else if this_principal.is_zero() {
            (Rate::ZERO, true)
        } else {
            let tier = self.tables.restricted.iter().rev().find(|tier| {
                this_principal >= tier.threshold
                    && (prev_standard.is_explicit()
                        || prev_principal.is_zero()
                        || prev_principal < tier.threshold)
            });
            match tier {
                Some(tier) => (tier.rate, true),
                None => (prev_rate, false),
            }
        };

        let multiplier = self.tables.delinquency_multiplier;
        let adjusted = if this_standard.is_delinquent() && (changed || !prev_standard.is_delinquent()) {
            rate.scaled(multiplier)
        } else if !this_standard.is_delinquent() && !changed && prev_standard.is_delinquent() {
            rate.unscaled(multiplier)
        } else {
            Some(rate)
        };
        let rate = adjusted.ok_or_else(|| LedgerError::CalculationError {
            message: format!("rate overflow: {}% adjusted by {}", rate, multiplier),
        })?;

        Ok(RateResolution { rate, changed })
    }
}
