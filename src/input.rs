use std::str::FromStr;
use std::sync::OnceLock;

use log::{debug, warn};
use regex::Regex;
use rust_decimal::Decimal;

use crate::calendar::{input_style, EraTable};
use crate::config::{LineOptions, RunConfig};
use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::transaction::Transaction;
use crate::types::{Amount, DateStyle, DayCountMode, OutputStyle, RateStandard};

/// line left out of the calculation
#[derive(Debug)]
pub struct RejectedLine {
    pub line_number: usize,
    pub text: String,
    /// parse failure for a line shaped like data; none for other text
    pub error: Option<LedgerError>,
}

/// transactions and rejected lines read from one document
#[derive(Debug, Default)]
pub struct ParsedInput {
    pub transactions: Vec<Transaction>,
    pub rejected: Vec<RejectedLine>,
}

impl ParsedInput {
    /// Overlay the first transaction's options and comment prefix on the
    /// command line configuration. Later lines never change run settings.
    pub fn run_config(&self, base: RunConfig) -> RunConfig {
        match self.transactions.first() {
            Some(first) => base
                .with_line_options(&first.options)
                .with_comment_prefix(first.prefix.clone()),
            None => base,
        }
    }
}

/// demonstration ledger printed by `--sample`
pub const SAMPLE_DATA: &str = "\
H24-01-01    10,000        - = +
H25-01-01   100,000        -
H26-01-01 1,000,000        -
H27-01-01         -  300,000
H28-01-01         -  300,000
H29-01-01         -  300,000
H30-01-01         -  300,000
H31-01-01         -  300,000
R02-01-01         -  300,000";

fn data_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[#%|]?\s*((?:[A-Z]?[0-9]{2}|[0-9]{4})[.\-][0-9]{2}[.\-][0-9]{2})")
            .expect("data line pattern is valid")
    })
}

fn comment_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^0-9a-zA-Z\\|]+\s*").expect("prefix pattern is valid"))
}

fn remark_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#.*$").expect("remark pattern is valid"))
}

fn amount_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:-|(_?)([0-9]{1,3}(?:,?[0-9]{3})*))$").expect("amount pattern is valid")
    })
}

fn rate_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:([=*])(?:[0-9]+(?:\.[0-9]+)?%?)?|([0-9]+(?:\.[0-9]+)?)%?)$")
            .expect("rate pattern is valid")
    })
}

fn options_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[_;.:+\-?!tcwmM]+$").expect("options pattern is valid"))
}

fn day_count_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?[0-9]+$").expect("day count pattern is valid"))
}

/// Split a document into transactions and rejected lines.
///
/// Headers, footers, separator rules and blank lines of a previously
/// rendered table are skipped silently so that output can be fed back in.
pub fn parse_document(text: &str, eras: &EraTable) -> ParsedInput {
    let mut parsed = ParsedInput::default();
    for (index, raw) in text.split('\n').enumerate() {
        let line_number = index + 1;
        let line = raw.trim_end();
        debug!("reading line {}", line_number);

        if !is_data_line(line, eras) {
            if !is_ignorable(line) {
                warn!("line {} is not a transaction: {}", line_number, line);
                parsed.rejected.push(RejectedLine {
                    line_number,
                    text: line.to_string(),
                    error: None,
                });
            }
            continue;
        }

        match parse_line(line_number, line, eras) {
            Ok(transaction) => parsed.transactions.push(transaction),
            Err(error) => {
                warn!("line {} rejected: {}", line_number, error);
                parsed.rejected.push(RejectedLine {
                    line_number,
                    text: line.to_string(),
                    error: Some(error),
                });
            }
        }
    }
    parsed
}

/// leading date shaped like a real calendar date
pub fn is_data_line(line: &str, eras: &EraTable) -> bool {
    data_line_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|date| eras.parse(date.as_str()).is_ok())
        .unwrap_or(false)
}

fn is_ignorable(line: &str) -> bool {
    line.is_empty()
        || line.contains("日付")
        || line.contains("合計")
        || line.contains("---:")
        || line.chars().all(|c| c == '=')
}

/// parse one data line into a transaction
pub fn parse_line(line_number: usize, line: &str, eras: &EraTable) -> Result<Transaction> {
    let prefix = comment_prefix_regex()
        .find(line)
        .map(|m| m.as_str())
        .unwrap_or("");
    let rest = &line[prefix.len()..];

    let (rest, remark) = match remark_regex().find(rest) {
        Some(m) => (&rest[..m.start()], Some(m.as_str().to_string())),
        None => (rest, None),
    };

    let fields = split_fields(rest);
    let date_text = fields.first().map(String::as_str).unwrap_or("");
    let date = eras.parse(date_text)?;
    let field = |i: usize| fields.get(i).map(String::as_str).filter(|f| !f.is_empty());

    Ok(Transaction {
        line_number,
        prefix: prefix.to_string(),
        date,
        input_style: input_style(date_text),
        borrowing: field(1).map(parse_amount).transpose()?.unwrap_or_default(),
        repayment: field(2).map(parse_amount).transpose()?.unwrap_or_default(),
        standard: field(3).map(parse_rate).transpose()?.flatten(),
        options: field(4).map(parse_options).transpose()?.unwrap_or_default(),
        remark,
    })
}

fn split_fields(line: &str) -> Vec<String> {
    if line.starts_with('|') {
        line.replace(' ', "")
            .split('|')
            .skip(1)
            .map(str::to_string)
            .collect()
    } else {
        line.split_whitespace().map(str::to_string).collect()
    }
}

/// `-` for zero, else digits with optional `,` grouping; a leading `_` routes to principal
pub fn parse_amount(text: &str) -> Result<Amount> {
    let malformed = || LedgerError::MalformedAmount {
        text: text.to_string(),
    };
    let caps = amount_regex().captures(text).ok_or_else(malformed)?;
    let Some(digits) = caps.get(2) else {
        return Ok(Amount::zero());
    };
    let to_principal = caps.get(1).map(|m| !m.as_str().is_empty()).unwrap_or(false);
    let value = Decimal::from_str(&digits.as_str().replace(',', "")).map_err(|_| malformed())?;
    Ok(Amount::new(Money::from_decimal_truncated(value), to_principal))
}

/// Parse a rate field. `None` means the standard is inherited.
///
/// A number after `=` or `*` is what a rendered table shows and is ignored.
pub fn parse_rate(text: &str) -> Result<Option<RateStandard>> {
    let malformed = || LedgerError::MalformedRate {
        text: text.to_string(),
    };
    if text.is_empty() {
        return Ok(None);
    }
    let caps = rate_regex().captures(text).ok_or_else(malformed)?;
    match (caps.get(1).map(|m| m.as_str()), caps.get(2)) {
        (Some("="), _) => Ok(Some(RateStandard::Statutory)),
        (Some(_), _) => Ok(Some(RateStandard::Delinquent)),
        (None, Some(number)) => {
            let percent = Decimal::from_str(number.as_str()).map_err(|_| malformed())?;
            Ok(Some(RateStandard::Explicit(Rate::from_percent(percent))))
        }
        (None, None) => Err(malformed()),
    }
}

/// Parse an options field; a bare day count is accepted and ignored.
///
/// When toggles conflict the later one in `_ ? ! + - ; . : t c w m M` wins.
pub fn parse_options(text: &str) -> Result<LineOptions> {
    if day_count_regex().is_match(text) {
        return Ok(LineOptions::default());
    }
    if !options_regex().is_match(text) {
        return Err(LedgerError::MalformedOptions {
            text: text.to_string(),
        });
    }

    let mut options = LineOptions::default();
    for toggle in "_?!+-;.:tcwmM".chars().filter(|c| text.contains(*c)) {
        match toggle {
            '_' => options.no_comma = true,
            '?' => options.day_count = Some(DayCountMode::ByDayPartial),
            '!' => options.day_count = Some(DayCountMode::ByDayTotal),
            '+' => options.include_first_day = Some(true),
            '-' => options.include_first_day = Some(false),
            ';' => options.date_style = Some(DateStyle::Era),
            '.' => options.date_style = Some(DateStyle::TwoDigit),
            ':' => options.date_style = Some(DateStyle::FourDigit),
            't' => options.output = Some(OutputStyle::Tex),
            'c' => options.output = Some(OutputStyle::Csv),
            'w' => options.output = Some(OutputStyle::Html),
            'm' => options.output = Some(OutputStyle::Markdown),
            'M' => options.output = Some(OutputStyle::Math),
            _ => {}
        }
    }
    Ok(options)
}
