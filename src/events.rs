use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;

/// per-line findings collected while a ledger is calculated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    // input events
    LineRejected {
        line: usize,
        text: String,
        /// parse failure for lines shaped like data; none for plain text
        reason: Option<String>,
    },

    // calculation events
    NegativeDays {
        line: usize,
        date: NaiveDate,
        days: i64,
    },
    InconsistentBalance {
        line: usize,
        date: NaiveDate,
        flow: Money,
        principal_change: Money,
        interest_change: Money,
    },
    CalculationFailed {
        line: usize,
        message: String,
    },
}

impl Diagnostic {
    /// line number the finding refers to (1-based)
    pub fn line(&self) -> usize {
        match self {
            Diagnostic::LineRejected { line, .. }
            | Diagnostic::NegativeDays { line, .. }
            | Diagnostic::InconsistentBalance { line, .. }
            | Diagnostic::CalculationFailed { line, .. } => *line,
        }
    }

    /// errors mark results that cannot be trusted; the rest are warnings
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Diagnostic::InconsistentBalance { .. } | Diagnostic::CalculationFailed { .. }
        )
    }
}

/// diagnostic log for collecting findings during a run
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_collects_and_drains() {
        let mut log = DiagnosticLog::new();
        log.emit(Diagnostic::NegativeDays {
            line: 2,
            date: NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
            days: -39,
        });
        assert!(!log.has_errors());
        log.emit(Diagnostic::CalculationFailed {
            line: 3,
            message: "overflow".to_string(),
        });
        assert!(log.has_errors());
        assert_eq!(log.diagnostics().len(), 2);

        let drained = log.take_diagnostics();
        assert_eq!(drained[0].line(), 2);
        assert_eq!(drained[1].line(), 3);
        assert!(log.diagnostics().is_empty());
    }
}
