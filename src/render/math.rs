use std::io::Write;

use super::{Cells, Renderer};
use crate::config::RunConfig;
use crate::errors::Result;
use crate::interest::Period;
use crate::transaction::LedgerRow;
use crate::types::DayCountMode;

/// one accrual formula per period, no table
pub struct MathRenderer<'a> {
    config: &'a RunConfig,
}

impl<'a> MathRenderer<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    /// the year fraction as the day-count mode writes it
    fn years(&self, period: &Period) -> String {
        match self.config.day_count {
            DayCountMode::ByDayTotal => format!("{:>4}/365", period.total_days),
            DayCountMode::ByDayPartial => format!(
                "({:>2} + {:>3}/365)",
                period.whole_years,
                period.remainder_days()
            ),
            DayCountMode::ByYear => format!(
                "({:>2} + {:>3}/365 + {:>3}/366)",
                period.whole_years, period.non_leap_days, period.leap_days
            ),
        }
    }
}

impl Renderer for MathRenderer<'_> {
    fn header(&self, _out: &mut dyn Write) -> Result<()> {
        Ok(())
    }

    fn row(&self, out: &mut dyn Write, row: &LedgerRow, cells: &Cells) -> Result<()> {
        // the opening row accrues nothing
        if row.is_first() {
            return Ok(());
        }
        writeln!(
            out,
            "{}{}-{}: {:>10} * {:>2}/100 * {} = {:>8}",
            self.config.comment_prefix,
            cells.prev_date,
            cells.date,
            cells.prev_principal,
            cells.prev_rate,
            self.years(&row.period),
            cells.interest
        )?;
        Ok(())
    }

    fn footer(&self, _out: &mut dyn Write, _total: &str) -> Result<()> {
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

    fn period(total_days: i64, whole_years: i64, non_leap_days: i64, leap_days: i64) -> Period {
        Period { total_days, whole_years, non_leap_days, leap_days }
    }

    #[test]
    fn test_year_fraction_by_mode() {
        let mut config = RunConfig::default();
        let p = period(-39, -1, 326, 0);
        assert_eq!(MathRenderer::new(&config).years(&p), "(-1 + 326/365 +   0/366)");

        config.day_count = DayCountMode::ByDayPartial;
        assert_eq!(MathRenderer::new(&config).years(&p), "(-1 + 326/365)");

        config.day_count = DayCountMode::ByDayTotal;
        assert_eq!(MathRenderer::new(&config).years(&period(304, 0, 0, 304)), " 304/365");
    }

    #[test]
    fn test_header_and_footer_are_silent() {
        let config = RunConfig::default();
        let renderer = MathRenderer::new(&config);
        let mut out = Vec::new();
        renderer.header(&mut out).unwrap();
        renderer.footer(&mut out, "0").unwrap();
        assert!(out.is_empty());
    }
}
