use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::transaction::LedgerRow;
use crate::types::{Amount, RateStandard};

/// state handed from one calculated line to the next
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerState {
    // previous line
    pub date: NaiveDate,
    pub borrowing: Amount,
    pub repayment: Amount,

    // rate carried forward
    pub standard: RateStandard,
    pub rate: Rate,

    // balances
    pub remaining_interest: Money,
    pub remaining_principal: Money,

    /// count the previous line's own day in the next window
    pub include_prev_day: bool,
}

impl LedgerState {
    /// implicit zero state ahead of the first line
    pub fn seed(date: NaiveDate) -> Self {
        Self {
            date,
            borrowing: Amount::zero(),
            repayment: Amount::zero(),
            standard: RateStandard::Statutory,
            rate: Rate::ZERO,
            remaining_interest: Money::ZERO,
            remaining_principal: Money::ZERO,
            include_prev_day: true,
        }
    }

    /// carry a calculated line's own fields forward
    pub fn after(row: &LedgerRow) -> Self {
        Self {
            date: row.transaction.date,
            borrowing: row.transaction.borrowing,
            repayment: row.transaction.repayment,
            standard: row.standard,
            rate: row.rate,
            remaining_interest: row.remaining_interest,
            remaining_principal: row.remaining_principal,
            include_prev_day: !row.include_this_day,
        }
    }

    /// previous line's borrowing minus repayment
    pub fn net_flow(&self) -> Result<Money> {
        self.borrowing.value.try_sub(self.repayment.value)
    }
}
