use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::LineOptions;
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::interest::Period;
use crate::payments::BalanceCheck;
use crate::types::{Amount, DateStyle, RateStandard};

/// one parsed input line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// 1-based position in the input
    pub line_number: usize,
    /// leading comment symbol, stripped before parsing
    pub prefix: String,
    pub date: NaiveDate,
    pub input_style: DateStyle,
    pub borrowing: Amount,
    pub repayment: Amount,
    /// none inherits the previous line's standard
    pub standard: Option<RateStandard>,
    pub options: LineOptions,
    /// trailing `#` remark, kept verbatim
    pub remark: Option<String>,
}

impl Transaction {
    /// create a transaction with no options, remark or prefix
    pub fn new(
        line_number: usize,
        date: NaiveDate,
        borrowing: Amount,
        repayment: Amount,
        standard: Option<RateStandard>,
    ) -> Self {
        Self {
            line_number,
            prefix: String::new(),
            date,
            input_style: DateStyle::FourDigit,
            borrowing,
            repayment,
            standard,
            options: LineOptions::default(),
            remark: None,
        }
    }

    /// borrowing minus repayment
    pub fn net_flow(&self) -> Result<Money> {
        self.borrowing.value.try_sub(self.repayment.value)
    }
}

/// a transaction together with everything calculated for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// 0-based position among the calculated transactions
    pub index: usize,
    pub transaction: Transaction,
    /// standard after inheritance
    pub standard: RateStandard,
    /// rate resolved on this line, carried into the next period
    pub rate: Rate,
    pub period: Period,
    pub interest: Money,
    pub change_of_principal: Money,
    pub remaining_interest: Money,
    pub remaining_principal: Money,
    pub include_prev_day: bool,
    pub include_this_day: bool,
    /// previous line's date, the start of this accrual window
    pub prev_date: NaiveDate,
    /// previous line's balances and the rate the interest accrued at
    pub prev_principal: Money,
    pub prev_interest: Money,
    pub prev_rate: Rate,
    /// figures of a balance change not explained by flow plus interest
    pub imbalance: Option<BalanceCheck>,
}

impl LedgerRow {
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    /// principal plus interest outstanding after this line
    pub fn total(&self) -> Result<Money> {
        self.remaining_principal.try_add(self.remaining_interest)
    }

    pub fn is_inconsistent(&self) -> bool {
        self.imbalance.is_some()
    }

    pub fn has_negative_days(&self) -> bool {
        self.period.is_negative()
    }
}
