//! Presentation of a calculated ledger. Nothing here changes a figure.

pub mod csv;
pub mod html;
pub mod markdown;
pub mod math;
pub mod tex;
pub mod text;

use std::io::Write;

use log::warn;

use crate::calendar::EraTable;
use crate::config::RunConfig;
use crate::decimal::Money;
use crate::errors::Result;
use crate::ledger::LedgerReport;
use crate::transaction::LedgerRow;
use crate::types::{Amount, DateStyle, OutputStyle};

pub use self::csv::CsvRenderer;
pub use html::HtmlRenderer;
pub use markdown::MarkdownRenderer;
pub use math::MathRenderer;
pub use tex::TexRenderer;
pub use text::TextRenderer;

/// column labels, date first
pub const HEADER_LABELS: [&str; 9] = [
    "日付", "借入", "返済", "年利", "日数", "利息", "増減", "残利息", "残元金",
];

/// column widths of the plain text table, date first
pub const COLUMN_WIDTHS: [usize; 9] = [9, 9, 8, 4, 4, 8, 9, 9, 10];

pub const TOTAL_LABEL: &str = "【合計】";

pub const NEGATIVE_DAYS_WARNING: &str =
    "WARNING: The number of days is negative. -------------------------------------";

pub const REJECTED_HEADING: &str = "次の行は除外しました。";

/// one output format
pub trait Renderer {
    fn header(&self, out: &mut dyn Write) -> Result<()>;

    fn row(&self, out: &mut dyn Write, row: &LedgerRow, cells: &Cells) -> Result<()>;

    fn footer(&self, out: &mut dyn Write, total: &str) -> Result<()>;

    /// note attached to the row just written
    fn warning(&self, out: &mut dyn Write, message: &str) -> Result<()>;
}

/// formatted cells of one ledger row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cells {
    pub date: String,
    pub borrowing: String,
    pub repayment: String,
    pub rate: String,
    /// day count, or the run's option string on the first row
    pub days: String,
    pub interest: String,
    pub change_of_principal: String,
    pub remaining_interest: String,
    pub remaining_principal: String,
    pub remark: String,

    // accrual inputs for the math trace
    pub prev_date: String,
    pub prev_principal: String,
    pub prev_rate: String,
}

impl Cells {
    pub fn build(row: &LedgerRow, config: &RunConfig, eras: &EraTable) -> Self {
        let transaction = &row.transaction;
        let style = config.date_style.unwrap_or(transaction.input_style);
        let money = |m: Money| money_cell(m, config);
        let amount = |a: Amount| {
            let value = money(a.value);
            if a.to_principal {
                format!("_{}", value)
            } else {
                value
            }
        };

        let days = if row.is_first() {
            config.option_string()
        } else {
            row.period.total_days.to_string()
        };
        let interest = if row.is_first() && row.interest.is_zero() {
            "-".to_string()
        } else {
            money(row.interest)
        };

        Self {
            date: date_cell(eras, transaction.date, style),
            borrowing: amount(transaction.borrowing),
            repayment: amount(transaction.repayment),
            rate: format!("{}{}", row.standard.symbol(), row.rate),
            days,
            interest,
            change_of_principal: money(row.change_of_principal),
            remaining_interest: money(row.remaining_interest),
            remaining_principal: money(row.remaining_principal),
            remark: transaction.remark.clone().unwrap_or_default(),
            prev_date: date_cell(eras, row.prev_date, style),
            prev_principal: money(row.prev_principal),
            prev_rate: row.prev_rate.to_string(),
        }
    }

    /// the nine table columns, date first
    pub fn columns(&self) -> [&str; 9] {
        [
            self.date.as_str(),
            self.borrowing.as_str(),
            self.repayment.as_str(),
            self.rate.as_str(),
            self.days.as_str(),
            self.interest.as_str(),
            self.change_of_principal.as_str(),
            self.remaining_interest.as_str(),
            self.remaining_principal.as_str(),
        ]
    }
}

/// money with or without `,` grouping per the run
pub fn money_cell(value: Money, config: &RunConfig) -> String {
    if config.insert_comma {
        value.grouped()
    } else {
        value.to_string()
    }
}

fn date_cell(eras: &EraTable, date: chrono::NaiveDate, style: DateStyle) -> String {
    match eras.format(date, style) {
        Ok(text) => text,
        Err(error) => {
            warn!("{}; writing a western date instead", error);
            eras.format(date, DateStyle::FourDigit)
                .unwrap_or_else(|_| date.to_string())
        }
    }
}

/// width of the date column in the text and markdown tables
pub fn date_width(config: &RunConfig) -> usize {
    match config.date_style {
        Some(DateStyle::TwoDigit) => COLUMN_WIDTHS[0] - 1,
        Some(DateStyle::FourDigit) => COLUMN_WIDTHS[0] + 1,
        _ => COLUMN_WIDTHS[0],
    }
}

/// terminal width, counting non-ascii characters as two columns
pub fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| if (' '..='~').contains(&c) { 1 } else { 2 })
        .sum()
}

/// renderer for the configured output style
pub fn renderer_for(config: &RunConfig) -> Box<dyn Renderer + '_> {
    match config.output {
        OutputStyle::Text => Box::new(TextRenderer::new(config)),
        OutputStyle::Tex => Box::new(TexRenderer::new()),
        OutputStyle::Csv => Box::new(CsvRenderer::new()),
        OutputStyle::Html => Box::new(HtmlRenderer::new()),
        OutputStyle::Markdown => Box::new(MarkdownRenderer::new(config)),
        OutputStyle::Math => Box::new(MathRenderer::new(config)),
    }
}

/// Write a report: header, rows with their warnings, footer, then any
/// rejected input lines.
pub fn render_report(report: &LedgerReport, eras: &EraTable, out: &mut dyn Write) -> Result<()> {
    let config = &report.config;
    let renderer = renderer_for(config);

    renderer.header(out)?;
    for row in &report.rows {
        let cells = Cells::build(row, config, eras);
        renderer.row(out, row, &cells)?;
        if row.has_negative_days() {
            renderer.warning(out, NEGATIVE_DAYS_WARNING)?;
        }
    }
    renderer.footer(out, &money_cell(report.total, config))?;

    if !report.rejected.is_empty() {
        writeln!(out, "{}", REJECTED_HEADING)?;
        for line in &report.rejected {
            writeln!(out, "{}", line.text)?;
        }
    }
    Ok(())
}

/// render a report into a string
pub fn render_to_string(report: &LedgerReport, eras: &EraTable) -> Result<String> {
    let mut buffer = Vec::new();
    render_report(report, eras, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("日付"), 4);
        assert_eq!(display_width("【合計】"), 8);
        assert_eq!(display_width("H24-01-01"), 9);
    }

    #[test]
    fn test_date_width_follows_style() {
        let mut config = RunConfig::default();
        assert_eq!(date_width(&config), 9);
        config.date_style = Some(DateStyle::TwoDigit);
        assert_eq!(date_width(&config), 8);
        config.date_style = Some(DateStyle::FourDigit);
        assert_eq!(date_width(&config), 10);
    }

    #[test]
    fn test_money_cell_respects_comma_setting() {
        let mut config = RunConfig::default();
        assert_eq!(money_cell(Money::from_major(-13_862), &config), "-13,862");
        config.insert_comma = false;
        assert_eq!(money_cell(Money::from_major(-13_862), &config), "-13862");
    }
}
