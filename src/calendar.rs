use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};
use crate::types::DateStyle;

/// first day of a named era
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Era {
    pub letter: char,
    pub start: NaiveDate,
}

/// ordered set of eras, earliest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EraTable {
    eras: Vec<Era>,
}

impl EraTable {
    /// build a table, rejecting empty sets, duplicate letters and non-increasing starts
    pub fn new(eras: Vec<Era>) -> Result<Self> {
        let table = Self { eras };
        table.validate()?;
        Ok(table)
    }

    /// check ordering and letters; tables loaded through serde skip `new`
    pub fn validate(&self) -> Result<()> {
        let eras = &self.eras;
        if eras.is_empty() {
            return Err(LedgerError::InvalidConfiguration {
                message: "era table is empty".to_string(),
            });
        }
        for pair in eras.windows(2) {
            if pair[1].start <= pair[0].start {
                return Err(LedgerError::InvalidConfiguration {
                    message: format!(
                        "era {} starts on {} which is not after era {} ({})",
                        pair[1].letter, pair[1].start, pair[0].letter, pair[0].start
                    ),
                });
            }
        }
        for (i, era) in eras.iter().enumerate() {
            if !era.letter.is_ascii_uppercase() {
                return Err(LedgerError::InvalidConfiguration {
                    message: format!("era letter {:?} is not an uppercase ascii letter", era.letter),
                });
            }
            if eras[..i].iter().any(|e| e.letter == era.letter) {
                return Err(LedgerError::InvalidConfiguration {
                    message: format!("era letter {} appears twice", era.letter),
                });
            }
        }
        Ok(())
    }

    /// Meiji, Taisho, Showa, Heisei, Reiwa
    pub fn japanese() -> Self {
        let era = |letter, y, m, d| Era {
            letter,
            start: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
        };
        Self {
            eras: vec![
                era('M', 1868, 1, 25),
                era('T', 1912, 7, 30),
                era('S', 1926, 12, 25),
                era('H', 1989, 1, 8),
                era('R', 2019, 5, 1),
            ],
        }
    }

    pub fn eras(&self) -> &[Era] {
        &self.eras
    }

    pub fn find(&self, letter: char) -> Option<&Era> {
        self.eras.iter().find(|e| e.letter == letter)
    }

    /// latest era whose start is on or before the date
    pub fn era_of(&self, date: NaiveDate) -> Option<&Era> {
        self.eras.iter().rev().find(|e| e.start <= date)
    }

    /// parse `G?Y{1,4}-M{1,2}-D{1,2}`; `.` is accepted as a separator
    pub fn parse(&self, text: &str) -> Result<NaiveDate> {
        let invalid = || LedgerError::InvalidDate {
            text: text.to_string(),
        };
        let normalised = text.replace('.', "-");
        let parts: Vec<&str> = normalised.split('-').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }
        let (year_token, month_token, day_token) = (parts[0], parts[1], parts[2]);

        let (era, digits) = match year_token.chars().next() {
            Some(c) if c.is_ascii_alphabetic() => (Some(c), &year_token[c.len_utf8()..]),
            _ => (None, year_token),
        };
        if !is_digits(digits, 1, 4) || !is_digits(month_token, 1, 2) || !is_digits(day_token, 1, 2) {
            return Err(invalid());
        }
        let offset: i32 = digits.parse().map_err(|_| invalid())?;
        let month: u32 = month_token.parse().map_err(|_| invalid())?;
        let day: u32 = day_token.parse().map_err(|_| invalid())?;

        let year = match era {
            Some(letter) => {
                let era = self.find(letter).ok_or_else(|| LedgerError::UnknownEra {
                    text: text.to_string(),
                })?;
                era.start.year() + offset - 1
            }
            None if digits.len() <= 2 && offset < 70 => offset + 2000,
            None if digits.len() <= 2 => offset + 1900,
            None => offset,
        };

        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(LedgerError::InvalidCalendarDate { year, month, day })
    }

    /// render a date in the requested style
    pub fn format(&self, date: NaiveDate, style: DateStyle) -> Result<String> {
        let (prefix, year) = match style {
            DateStyle::Era => {
                let era = self
                    .era_of(date)
                    .ok_or(LedgerError::DateBeforeFirstEra { date })?;
                (era.letter.to_string(), date.year() - era.start.year() + 1)
            }
            DateStyle::TwoDigit if (1970..2070).contains(&date.year()) => {
                (String::new(), date.year() % 100)
            }
            DateStyle::TwoDigit | DateStyle::FourDigit => (String::new(), date.year()),
        };
        Ok(format!(
            "{}{:02}-{:02}-{:02}",
            prefix,
            year,
            date.month(),
            date.day()
        ))
    }
}

impl Default for EraTable {
    fn default() -> Self {
        Self::japanese()
    }
}

/// input style implied by the year token of a date field
pub fn input_style(text: &str) -> DateStyle {
    let year_token = text.split(['-', '.']).next().unwrap_or_default();
    match year_token.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => DateStyle::Era,
        _ if year_token.len() <= 2 => DateStyle::TwoDigit,
        _ => DateStyle::FourDigit,
    }
}

/// check if year is a leap year (gregorian)
pub fn is_leap_year(year: i32) -> bool {
    if year % 400 == 0 {
        true
    } else if year % 100 == 0 {
        false
    } else {
        year % 4 == 0
    }
}

fn is_digits(s: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}
