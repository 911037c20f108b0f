use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calendar::EraTable;
use crate::errors::Result;
use crate::interest::RateTables;
use crate::types::{DateStyle, DayCountMode, OutputStyle};

/// process-wide lookup tables, read-only once loaded
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Tables {
    pub eras: EraTable,
    pub rates: RateTables,
}

impl Tables {
    /// parse and validate a json table set
    pub fn from_json(json: &str) -> Result<Self> {
        let tables: Tables = serde_json::from_str(json)?;
        tables.validate()?;
        Ok(tables)
    }

    /// load a json table set from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.eras.validate()?;
        self.rates.validate()
    }
}

/// run-wide settings, fixed before the first transaction is calculated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// count the day of a transaction when the balance keeps its direction
    pub include_first_day: bool,
    pub day_count: DayCountMode,
    /// none echoes each line's own input style
    pub date_style: Option<DateStyle>,
    pub output: OutputStyle,
    /// group money cells with `,`
    pub insert_comma: bool,
    /// leading symbol of the first data line, repeated on every output line
    pub comment_prefix: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            include_first_day: true,
            day_count: DayCountMode::ByYear,
            date_style: None,
            output: OutputStyle::Text,
            insert_comma: true,
            comment_prefix: String::new(),
        }
    }
}

impl RunConfig {
    /// overlay the options given on the first data line
    pub fn with_line_options(mut self, options: &LineOptions) -> Self {
        if let Some(include) = options.include_first_day {
            self.include_first_day = include;
        }
        if let Some(mode) = options.day_count {
            self.day_count = mode;
        }
        if let Some(style) = options.date_style {
            self.date_style = Some(style);
        }
        if let Some(output) = options.output {
            self.output = output;
        }
        if options.no_comma {
            self.insert_comma = false;
        }
        self
    }

    pub fn with_comment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.comment_prefix = prefix.into();
        self
    }

    /// Option toggles describing this run, as shown in the first row's day column.
    ///
    /// Reading a rendered table back in reproduces the same configuration.
    pub fn option_string(&self) -> String {
        let mut out = String::new();
        if !self.insert_comma {
            out.push('_');
        }
        match self.date_style {
            Some(DateStyle::Era) => out.push(';'),
            Some(DateStyle::TwoDigit) => out.push('.'),
            Some(DateStyle::FourDigit) => out.push(':'),
            None => {}
        }
        out.push(if self.include_first_day { '+' } else { '-' });
        match self.day_count {
            DayCountMode::ByDayPartial => out.push('?'),
            DayCountMode::ByDayTotal => out.push('!'),
            DayCountMode::ByYear => {}
        }
        out
    }
}

/// toggles given in a line's options field; `None` leaves the run default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineOptions {
    pub include_first_day: Option<bool>,
    pub day_count: Option<DayCountMode>,
    pub date_style: Option<DateStyle>,
    pub output: Option<OutputStyle>,
    pub no_comma: bool,
}

impl LineOptions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_option_string() {
        assert_eq!(RunConfig::default().option_string(), "+");
    }

    #[test]
    fn test_line_options_override_defaults() {
        let options = LineOptions {
            include_first_day: Some(false),
            day_count: Some(DayCountMode::ByDayTotal),
            date_style: Some(DateStyle::FourDigit),
            output: Some(OutputStyle::Csv),
            no_comma: true,
        };
        let config = RunConfig::default().with_line_options(&options);
        assert!(!config.include_first_day);
        assert_eq!(config.day_count, DayCountMode::ByDayTotal);
        assert_eq!(config.output, OutputStyle::Csv);
        assert!(!config.insert_comma);
        assert_eq!(config.option_string(), "_:-!");
    }

    #[test]
    fn test_empty_options_keep_cli_defaults() {
        let cli = RunConfig {
            include_first_day: false,
            day_count: DayCountMode::ByDayPartial,
            ..RunConfig::default()
        };
        let config = cli.clone().with_line_options(&LineOptions::default());
        assert_eq!(config, cli);
        assert_eq!(config.option_string(), "-?");
    }

    #[test]
    fn test_default_tables_are_valid() {
        let tables = Tables::default();
        assert!(tables.validate().is_ok());
        assert_eq!(tables.eras.eras().len(), 5);
    }

    #[test]
    fn test_tables_json_round_trip() {
        let json = serde_json::to_string(&Tables::default()).unwrap();
        let tables = Tables::from_json(&json).unwrap();
        assert_eq!(tables, Tables::default());
    }

    #[test]
    fn test_tables_json_rejects_unordered_eras() {
        let json = r#"{
            "eras": [
                {"letter": "H", "start": "1989-01-08"},
                {"letter": "S", "start": "1926-12-25"}
            ],
            "rates": {
                "statutory": [{"rate": "5", "effective": "0001-01-01"}],
                "restricted": [{"rate": "20", "threshold": "0"}],
                "delinquency_multiplier": "1.46"
            }
        }"#;
        assert!(Tables::from_json(json).is_err());
    }

    #[test]
    fn test_tables_json_rejects_bad_multiplier() {
        let mut tables = Tables::default();
        tables.rates.delinquency_multiplier = rust_decimal::Decimal::ZERO;
        let json = serde_json::to_string(&tables).unwrap();
        assert!(Tables::from_json(&json).is_err());
    }
}
