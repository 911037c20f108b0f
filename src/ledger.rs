use log::{debug, warn};

use crate::config::{RunConfig, Tables};
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{Diagnostic, DiagnosticLog};
use crate::input::{parse_document, RejectedLine};
use crate::interest::{decompose, AccrualEngine, RateResolver};
use crate::payments::{allocate, AllocationRequest};
use crate::state::LedgerState;
use crate::transaction::{LedgerRow, Transaction};

/// Whether a line's own day counts toward accrual.
///
/// Only a flow that pushes the balance further in the direction it already
/// had uses up the extra day.
pub fn judge_first_day_inclusion(prev_principal: Money, flow: Money) -> bool {
    prev_principal.signum() * flow.signum() > 0
}

/// calculated ledger ready for rendering
#[derive(Debug)]
pub struct LedgerReport {
    pub config: RunConfig,
    pub rows: Vec<LedgerRow>,
    /// principal plus interest outstanding after the last row
    pub total: Money,
    pub diagnostics: Vec<Diagnostic>,
    pub rejected: Vec<RejectedLine>,
}

impl LedgerReport {
    /// parse a document and calculate every transaction in it
    pub fn from_document(text: &str, tables: &Tables, base: RunConfig) -> Self {
        let parsed = parse_document(text, &tables.eras);
        let config = parsed.run_config(base);
        let mut ledger = Ledger::new(tables, config);

        for line in &parsed.rejected {
            ledger.diagnostics.emit(Diagnostic::LineRejected {
                line: line.line_number,
                text: line.text.clone(),
                reason: line.error.as_ref().map(|e| e.to_string()),
            });
        }

        let (rows, total) = ledger.calculate(parsed.transactions);
        let mut diagnostics = ledger.take_diagnostics();
        diagnostics.sort_by_key(Diagnostic::line);
        Self {
            rows,
            total,
            diagnostics,
            rejected: parsed.rejected,
            config: ledger.config().clone(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// sequencer threading ledger state through transactions in input order
pub struct Ledger<'a> {
    tables: &'a Tables,
    config: RunConfig,
    diagnostics: DiagnosticLog,
}

impl<'a> Ledger<'a> {
    pub fn new(tables: &'a Tables, config: RunConfig) -> Self {
        Self {
            tables,
            config,
            diagnostics: DiagnosticLog::new(),
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.diagnostics()
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.take_diagnostics()
    }

    /// Calculate all transactions, returning the rows and the final total.
    ///
    /// A line whose calculation fails is reported and skipped; the next
    /// line continues from the last good state. When every line after a row
    /// fails, that row closes the ledger and counts its own day.
    pub fn calculate(&mut self, transactions: Vec<Transaction>) -> (Vec<LedgerRow>, Money) {
        let mut rows: Vec<LedgerRow> = Vec::with_capacity(transactions.len());
        // latest row, the state it started from and its total
        let mut pending: Option<(LedgerRow, LedgerState, Money)> = None;
        let last = transactions.len().saturating_sub(1);

        for (position, transaction) in transactions.into_iter().enumerate() {
            let line = transaction.line_number;
            debug!("calculating line {}", line);
            let prev = match &pending {
                Some((row, _, _)) => LedgerState::after(row),
                None => LedgerState::seed(transaction.date),
            };
            let index = rows.len() + usize::from(pending.is_some());

            match self.settle(index, transaction, &prev, position == last) {
                Ok((row, total)) => {
                    if let Some((done, _, _)) = pending.replace((row, prev, total)) {
                        self.record(&done);
                        rows.push(done);
                    }
                }
                Err(error) => {
                    warn!("line {} skipped: {}", line, error);
                    self.diagnostics.emit(Diagnostic::CalculationFailed {
                        line,
                        message: error.to_string(),
                    });
                }
            }
        }

        let Some((row, prev, total)) = pending else {
            return (rows, Money::ZERO);
        };
        let (row, total) = if row.include_this_day {
            (row, total)
        } else {
            let line = row.transaction.line_number;
            self.settle(row.index, row.transaction.clone(), &prev, true)
                .unwrap_or_else(|error| {
                    warn!("line {} kept without its own day: {}", line, error);
                    (row, total)
                })
        };
        self.record(&row);
        rows.push(row);
        (rows, total)
    }

    /// calculate one transaction and the balance outstanding after it
    fn settle(
        &self,
        index: usize,
        transaction: Transaction,
        prev: &LedgerState,
        is_last: bool,
    ) -> Result<(LedgerRow, Money)> {
        let row = self.step(index, transaction, prev, is_last)?;
        let total = row.total()?;
        Ok((row, total))
    }

    /// calculate one transaction against the previous line's state
    pub fn step(
        &self,
        index: usize,
        transaction: Transaction,
        prev: &LedgerState,
        is_last: bool,
    ) -> Result<LedgerRow> {
        // inherit standard
        let standard = transaction.standard.unwrap_or(prev.standard);

        // first-day inclusion
        let (include_prev_day, include_this_day) = if self.config.include_first_day {
            (
                judge_first_day_inclusion(prev.remaining_principal, prev.net_flow()?),
                !judge_first_day_inclusion(prev.remaining_principal, transaction.net_flow()?),
            )
        } else {
            (false, true)
        };
        let include_this_day = include_this_day || is_last;

        // accrue on the previous balance and rate
        let period = decompose(prev.date, transaction.date, include_prev_day, include_this_day)?;
        let interest = AccrualEngine::new(self.config.day_count).accrue(
            prev.remaining_principal,
            prev.rate,
            &period,
        )?;

        // allocate
        let request = AllocationRequest {
            prev_principal: prev.remaining_principal,
            prev_interest: prev.remaining_interest,
            accrued_interest: interest,
            borrowing: transaction.borrowing,
            repayment: transaction.repayment,
        };
        let allocation = allocate(&request)?;
        let check = allocation.balance_check(&request)?;

        // resolve the rate carried into the next period
        let resolution = RateResolver::new(&self.tables.rates).resolve(
            allocation.remaining_principal,
            prev.remaining_principal,
            prev.rate,
            transaction.date,
            standard,
            prev.standard,
        )?;

        debug!(
            "line {}: {} days, interest {}, principal {}, interest balance {}, rate {} ({:?})",
            transaction.line_number,
            period.total_days,
            interest,
            allocation.remaining_principal,
            allocation.remaining_interest,
            resolution.rate,
            allocation.route
        );

        Ok(LedgerRow {
            index,
            standard,
            rate: resolution.rate,
            period,
            interest,
            change_of_principal: allocation.change_of_principal,
            remaining_interest: allocation.remaining_interest,
            remaining_principal: allocation.remaining_principal,
            include_prev_day,
            include_this_day,
            prev_date: prev.date,
            prev_principal: prev.remaining_principal,
            prev_interest: prev.remaining_interest,
            prev_rate: prev.rate,
            imbalance: (!check.is_balanced()).then_some(check),
            transaction,
        })
    }

    fn record(&mut self, row: &LedgerRow) {
        let line = row.transaction.line_number;
        let date = row.transaction.date;
        if row.has_negative_days() {
            warn!("line {}: the number of days is negative ({})", line, row.period.total_days);
            self.diagnostics.emit(Diagnostic::NegativeDays {
                line,
                date,
                days: row.period.total_days,
            });
        }
        if let Some(check) = row.imbalance {
            let error = LedgerError::InconsistentBalance {
                date,
                flow: check.flow,
                principal_change: check.principal_change,
                interest_change: check.interest_change,
            };
            warn!("line {}: {}", line, error);
            self.diagnostics.emit(Diagnostic::InconsistentBalance {
                line,
                date,
                flow: check.flow,
                principal_change: check.principal_change,
                interest_change: check.interest_change,
            });
        }
    }
}
