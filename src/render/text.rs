use std::io::Write;

use super::{date_width, display_width, Cells, Renderer, COLUMN_WIDTHS, HEADER_LABELS, TOTAL_LABEL};
use crate::config::RunConfig;
use crate::errors::Result;
use crate::transaction::LedgerRow;

/// fixed-width plain text table
pub struct TextRenderer<'a> {
    config: &'a RunConfig,
}

impl<'a> TextRenderer<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    fn widths(&self) -> [usize; 9] {
        let mut widths = COLUMN_WIDTHS;
        widths[0] = date_width(self.config);
        widths
    }
}

/// label followed by `-` up to the column width
fn ruled(label: &str, width: usize) -> String {
    format!("{}{}", label, "-".repeat(width.saturating_sub(display_width(label))))
}

impl Renderer for TextRenderer<'_> {
    fn header(&self, out: &mut dyn Write) -> Result<()> {
        let labels: Vec<String> = HEADER_LABELS
            .iter()
            .zip(self.widths())
            .map(|(label, width)| ruled(label, width))
            .collect();
        writeln!(out, "{}{}", self.config.comment_prefix, labels.join(" "))?;
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
            "{}{} {:>9} {:>8} {:>4} {:>4} {:>8} {:>9} {:>9} {:>10}{}",
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
        let widths = self.widths();
        let mut line = self.config.comment_prefix.clone();
        for width in &widths[..7] {
            line.push_str(&ruled("", *width));
            line.push(' ');
        }
        let padding = widths[7].saturating_sub(display_width(TOTAL_LABEL));
        line.push_str(TOTAL_LABEL);
        line.push_str(&" ".repeat(padding));
        writeln!(out, "{} {:>10}", line, total)?;
        Ok(())
    }

    fn warning(&self, out: &mut dyn Write, message: &str) -> Result<()> {
        writeln!(out, "{}{}", self.config.comment_prefix, message)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_footer_rules() {
        let config = RunConfig::default();
        let renderer = TextRenderer::new(&config);
        let mut out = Vec::new();
        renderer.header(&mut out).unwrap();
        renderer.footer(&mut out, "-13,862").unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "日付----- 借入----- 返済---- 年利 日数 利息---- 増減----- 残利息--- 残元金----"
        );
        assert_eq!(
            lines[1],
            "--------- --------- -------- ---- ---- -------- --------- 【合計】     -13,862"
        );
    }

    #[test]
    fn test_prefix_and_remark() {
        let config = RunConfig {
            comment_prefix: "# ".to_string(),
            ..RunConfig::default()
        };
        let renderer = TextRenderer::new(&config);
        let cells = Cells {
            date: "R02-02-29".to_string(),
            borrowing: "0".to_string(),
            repayment: "200,000".to_string(),
            rate: "10".to_string(),
            days: "304".to_string(),
            interest: "83,287".to_string(),
            change_of_principal: "-116,713".to_string(),
            remaining_interest: "0".to_string(),
            remaining_principal: "883,287".to_string(),
            remark: "#partial".to_string(),
            ..Cells::default()
        };
        let mut out = Vec::new();
        let row = dummy_row();
        renderer.row(&mut out, &row, &cells).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "# R02-02-29         0  200,000   10  304   83,287  -116,713         0    883,287 #partial\n"
        );
    }

    fn dummy_row() -> LedgerRow {
        use crate::decimal::{Money, Rate};
        use crate::interest::Period;
        use crate::transaction::Transaction;
        use crate::types::{Amount, RateStandard};
        use chrono::NaiveDate;

        let date = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        LedgerRow {
            index: 1,
            transaction: Transaction::new(2, date, Amount::zero(), Amount::zero(), None),
            standard: RateStandard::Explicit(Rate::from_percentage(10)),
            rate: Rate::from_percentage(10),
            period: Period::default(),
            interest: Money::ZERO,
            change_of_principal: Money::ZERO,
            remaining_interest: Money::ZERO,
            remaining_principal: Money::ZERO,
            include_prev_day: false,
            include_this_day: true,
            prev_date: date,
            prev_principal: Money::ZERO,
            prev_interest: Money::ZERO,
            prev_rate: Rate::ZERO,
            imbalance: None,
        }
    }
}
