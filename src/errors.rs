use chrono::NaiveDate;
use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid date: {text}")]
    InvalidDate {
        text: String,
    },

    #[error("unknown era in date: {text}")]
    UnknownEra {
        text: String,
    },

    #[error("invalid calendar date: {year}-{month}-{day}")]
    InvalidCalendarDate {
        year: i32,
        month: u32,
        day: u32,
    },

    #[error("date precedes every era: {date}")]
    DateBeforeFirstEra {
        date: NaiveDate,
    },

    #[error("malformed amount: {text}")]
    MalformedAmount {
        text: String,
    },

    #[error("malformed rate: {text}")]
    MalformedRate {
        text: String,
    },

    #[error("malformed options: {text}")]
    MalformedOptions {
        text: String,
    },

    #[error("inconsistent balance on {date}: flow {flow} does not explain principal change {principal_change} and interest change {interest_change}")]
    InconsistentBalance {
        date: NaiveDate,
        flow: Money,
        principal_change: Money,
        interest_change: Money,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
