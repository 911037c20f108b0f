use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::is_leap_year;
use crate::errors::{LedgerError, Result};

/// elapsed time between two ledger dates, split for leap-aware accrual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Period {
    /// signed day count; negative when the dates are out of order
    pub total_days: i64,
    pub whole_years: i64,
    pub non_leap_days: i64,
    pub leap_days: i64,
}

impl Period {
    /// days left over after whole years
    pub fn remainder_days(&self) -> i64 {
        self.non_leap_days + self.leap_days
    }

    pub fn is_negative(&self) -> bool {
        self.total_days < 0
    }
}

/// Split the span between two dates into whole years plus remainder days
/// counted separately for non-leap and leap years.
///
/// `include_first` counts the day of `first` itself, `include_last` counts
/// the day of `last`. The anniversary of `first` in the final year anchors
/// the whole-year count; a February 29 anchor falls back to February 28 in
/// non-leap years.
pub fn decompose(
    first: NaiveDate,
    last: NaiveDate,
    include_first: bool,
    include_last: bool,
) -> Result<Period> {
    let first = if include_first { previous_day(first)? } else { first };
    let last = if include_last { last } else { previous_day(last)? };

    let total_days = (last - first).num_days();
    let (fy, fm, fd) = (first.year(), first.month(), first.day());
    let ly = last.year();

    if (last.month(), last.day()) >= (fm, fd) {
        // same ending year
        let anchor = anniversary(ly, fm, fd)?;
        let days = (last - anchor).num_days();
        let (non_leap_days, leap_days) = if is_leap_year(ly) { (0, days) } else { (days, 0) };
        Ok(Period {
            total_days,
            whole_years: i64::from(ly - fy),
            non_leap_days,
            leap_days,
        })
    } else {
        // crosses the new year
        let anchor = anniversary(ly - 1, fm, fd)?;
        let year_end = ymd(ly - 1, 12, 31)?;
        let before = (year_end - anchor).num_days();
        let after = (last - year_end).num_days();
        let (non_leap_days, leap_days) = if is_leap_year(ly - 1) {
            (after, before)
        } else if is_leap_year(ly) {
            (before, after)
        } else {
            (before + after, 0)
        };
        Ok(Period {
            total_days,
            whole_years: i64::from(ly - fy - 1),
            non_leap_days,
            leap_days,
        })
    }
}

fn anniversary(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    if month == 2 && day == 29 && !is_leap_year(year) {
        ymd(year, 2, 28)
    } else {
        ymd(year, month, day)
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(LedgerError::InvalidCalendarDate { year, month, day })
}

fn previous_day(date: NaiveDate) -> Result<NaiveDate> {
    date.pred_opt().ok_or_else(|| LedgerError::CalculationError {
        message: format!("no day before {}", date),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn period(total_days: i64, whole_years: i64, non_leap_days: i64, leap_days: i64) -> Period {
        Period { total_days, whole_years, non_leap_days, leap_days }
    }

    #[test]
    fn test_exact_year_from_leap_year() {
        // counting the first day pushes the span one day past the anniversary
        let p = decompose(d(2012, 1, 1), d(2013, 1, 1), true, true).unwrap();
        assert_eq!(p, period(367, 1, 1, 0));
    }

    #[test]
    fn test_exact_year_exclusive_first() {
        let p = decompose(d(2012, 1, 1), d(2013, 1, 1), false, true).unwrap();
        assert_eq!(p, period(366, 1, 0, 0));
    }

    #[test]
    fn test_same_day_is_empty() {
        let p = decompose(d(2012, 1, 1), d(2012, 1, 1), false, true).unwrap();
        assert_eq!(p, period(0, 0, 0, 0));
    }

    #[test]
    fn test_same_year_split() {
        // remainder in a leap ending year counts as leap days
        let p = decompose(d(2024, 1, 10), d(2024, 3, 1), false, true).unwrap();
        assert_eq!(p, period(51, 0, 0, 51));
        let p = decompose(d(2023, 1, 10), d(2023, 3, 1), false, true).unwrap();
        assert_eq!(p, period(50, 0, 50, 0));
    }

    #[test]
    fn test_crossing_into_leap_year() {
        let p = decompose(d(2023, 12, 1), d(2024, 3, 1), false, true).unwrap();
        assert_eq!(p, period(91, 0, 30, 61));
    }

    #[test]
    fn test_crossing_out_of_leap_year() {
        let p = decompose(d(2020, 2, 15), d(2020, 6, 30), false, true).unwrap();
        assert_eq!(p, period(136, 0, 0, 136));
        let p = decompose(d(2020, 6, 30), d(2021, 3, 1), false, true).unwrap();
        assert_eq!(p, period(244, 0, 60, 184));
    }

    #[test]
    fn test_crossing_between_non_leap_years() {
        let p = decompose(d(2019, 3, 1), d(2021, 1, 15), false, true).unwrap();
        // 2019-03-01 -> 2020-03-01 is a whole year, then 2020-03-01 -> 2021-01-15
        // splits at 2020-12-31 (leap) and 2021-01-15 (non-leap)
        assert_eq!(p, period(686, 1, 15, 305));
        let p = decompose(d(2021, 6, 1), d(2022, 2, 1), false, true).unwrap();
        assert_eq!(p, period(245, 0, 245, 0));
    }

    #[test]
    fn test_leap_day_anchor_clamps() {
        let p = decompose(d(2020, 2, 29), d(2021, 3, 1), false, true).unwrap();
        assert_eq!(p, period(366, 1, 1, 0));
        let p = decompose(d(2020, 2, 29), d(2023, 2, 28), false, true).unwrap();
        assert_eq!(p, period(1095, 2, 365, 0));
    }

    #[test]
    fn test_exclusive_last_day() {
        let p = decompose(d(2021, 1, 1), d(2021, 1, 11), false, false).unwrap();
        assert_eq!(p, period(9, 0, 9, 0));
    }

    #[test]
    fn test_negative_span() {
        let p = decompose(d(2024, 1, 10), d(2023, 12, 1), false, true).unwrap();
        assert_eq!(p, period(-40, -1, 325, 0));
        assert!(p.is_negative());
    }

    #[test]
    fn test_remainder_near_anniversary() {
        let start = d(2015, 3, 17);
        let p = decompose(start, d(2016, 3, 16), false, true).unwrap();
        assert_eq!(p, period(365, 0, 289, 76));
        let p = decompose(start, d(2016, 3, 17), false, true).unwrap();
        assert_eq!(p, period(366, 1, 0, 0));
        let p = decompose(start, d(2023, 3, 17), false, true).unwrap();
        assert_eq!(p, period(2922, 8, 0, 0));
    }
}
