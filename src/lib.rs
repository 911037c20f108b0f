pub mod calendar;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod input;
pub mod interest;
pub mod ledger;
pub mod payments;
pub mod render;
pub mod state;
pub mod transaction;
pub mod types;

// re-export key types
pub use calendar::{Era, EraTable};
pub use config::{LineOptions, RunConfig, Tables};
pub use decimal::{Money, Rate};
pub use errors::{LedgerError, Result};
pub use events::{Diagnostic, DiagnosticLog};
pub use input::{parse_document, ParsedInput, RejectedLine};
pub use interest::{decompose, AccrualEngine, Period, RateResolver, RateTables};
pub use ledger::{judge_first_day_inclusion, Ledger, LedgerReport};
pub use payments::{allocate, Allocation, AllocationRequest, BalanceCheck};
pub use render::{render_report, render_to_string, Renderer};
pub use state::LedgerState;
pub use transaction::{LedgerRow, Transaction};
pub use types::{Amount, DateStyle, DayCountMode, OutputStyle, RateStandard};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
