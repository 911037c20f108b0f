use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};

/// output date representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateStyle {
    /// era letter + 2 digit year within era
    Era,
    /// western year folded to 2 digits inside [1970, 2070)
    TwoDigit,
    /// western 4 digit year
    FourDigit,
}

/// day count convention for accrual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DayCountMode {
    /// whole years at the annual rate, remainder split 365 / 366
    #[default]
    ByYear,
    /// whole years at the annual rate, remainder over 365 regardless of leap years
    ByDayPartial,
    /// every day over 365
    ByDayTotal,
}

/// renderer selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputStyle {
    #[default]
    Text,
    Tex,
    Csv,
    Html,
    Markdown,
    Math,
}

/// how a line's interest rate is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateStandard {
    /// interest-limitation cap or civil-code rate
    Statutory,
    /// statutory rate times the delinquency multiplier
    Delinquent,
    /// fixed percent given on the line
    Explicit(Rate),
}

impl RateStandard {
    pub fn is_explicit(&self) -> bool {
        matches!(self, RateStandard::Explicit(_))
    }

    pub fn is_delinquent(&self) -> bool {
        matches!(self, RateStandard::Delinquent)
    }

    /// rate column prefix for symbolic standards
    pub fn symbol(&self) -> &'static str {
        match self {
            RateStandard::Statutory => "=",
            RateStandard::Delinquent => "*",
            RateStandard::Explicit(_) => "",
        }
    }
}

/// cash amount with its principal routing flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Amount {
    pub value: Money,
    /// apply to principal before interest
    pub to_principal: bool,
}

impl Amount {
    pub fn new(value: Money, to_principal: bool) -> Self {
        Self { value, to_principal }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}
