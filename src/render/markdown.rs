use std::io::Write;

use super::{date_width, display_width, Cells, Renderer, COLUMN_WIDTHS};
use crate::config::RunConfig;
use crate::errors::Result;
use crate::transaction::LedgerRow;
use crate::types::DateStyle;

const MARKDOWN_TOTAL_LABEL: &str = "合計";

/// width of the table rows excluding the date column
const RULE_BASE: usize = 71;

/// pipe table with right-aligned columns
pub struct MarkdownRenderer<'a> {
    config: &'a RunConfig,
}

impl<'a> MarkdownRenderer<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    fn rule(&self) -> String {
        "=".repeat(RULE_BASE + date_width(self.config))
    }
}

impl Renderer for MarkdownRenderer<'_> {
    fn header(&self, out: &mut dyn Write) -> Result<()> {
        let (date_label, date_align) = match self.config.date_style {
            Some(DateStyle::TwoDigit) => ("日付", "-------:"),
            Some(DateStyle::FourDigit) => (" 日付 ", "---------:"),
            _ => ("日付 ", "--------:"),
        };
        writeln!(
            out,
            "|  {}  |  借入   |  返済  |年利|日数|  利息  |  増減   | 残利息  |  残元金  |",
            date_label
        )?;
        writeln!(
            out,
            "|{}|--------:|-------:|---:|---:|-------:|--------:|--------:|---------:|",
            date_align
        )?;
        writeln!(out, "{}", self.rule())?;
        Ok(())
    }

    fn row(&self, out: &mut dyn Write, _row: &LedgerRow, cells: &Cells) -> Result<()> {
        let remark = if cells.remark.is_empty() {
            String::new()
        } else {
            format!(" {}", cells.remark)
        };
        writeln!(
            out,
            "{}|{}|{:>9}|{:>8}|{:>4}|{:>4}|{:>8}|{:>9}|{:>9}|{:>10}|{}",
            self.config.comment_prefix,
            cells.date,
            cells.borrowing,
            cells.repayment,
            cells.rate,
            cells.days,
            cells.interest,
            cells.change_of_principal,
            cells.remaining_interest,
            cells.remaining_principal,
            remark
        )?;
        Ok(())
    }

    fn footer(&self, out: &mut dyn Write, total: &str) -> Result<()> {
        writeln!(out, "{}", self.rule())?;
        let mut line = String::from("|");
        line.push_str(&" ".repeat(date_width(self.config)));
        for width in &COLUMN_WIDTHS[1..7] {
            line.push('|');
            line.push_str(&" ".repeat(*width));
        }
        let padding = COLUMN_WIDTHS[7].saturating_sub(display_width(MARKDOWN_TOTAL_LABEL));
        writeln!(
            out,
            "{}|{}{}|{:>10}|",
            line,
            " ".repeat(padding),
            MARKDOWN_TOTAL_LABEL,
            total
        )?;
        Ok(())
    }

    fn warning(&self, out: &mut dyn Write, message: &str) -> Result<()> {
        writeln!(out, "{}{}", self.config.comment_prefix, message)?;
        Ok(())
    }
}
