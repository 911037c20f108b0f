//! keiji: statutory interest ledger calculator
//!
//! Reads a borrowing and repayment history from a file or stdin and writes
//! the calculated ledger to stdout.

use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, LevelFilter};

use interest_ledger::input::SAMPLE_DATA;
use interest_ledger::types::{DateStyle, DayCountMode, OutputStyle};
use interest_ledger::{render_report, LedgerReport, RunConfig, Tables};

#[derive(Parser, Debug)]
#[command(name = "keiji", version, about = "Calculate an interest ledger from borrowings and repayments")]
struct Cli {
    /// input file; `-` or nothing reads stdin
    file: Option<PathBuf>,

    /// do not count the day of a transaction
    #[arg(short = 'e', long = "exclude")]
    exclude: bool,

    /// count remainder days over 365 regardless of leap years
    #[arg(short = 'd', long = "daily")]
    daily: bool,

    /// count every day over 365
    #[arg(short = 'D', long = "Daily")]
    daily_total: bool,

    /// write money without `,` grouping
    #[arg(short = 'n', long = "no-comma")]
    no_comma: bool,

    /// write dates with an era letter
    #[arg(short = '3', long = "3jc")]
    era_dates: bool,

    /// write dates with a 2 digit western year
    #[arg(short = '2', long = "2wc")]
    two_digit_dates: bool,

    /// write dates with a 4 digit western year
    #[arg(short = '4', long = "4wc")]
    four_digit_dates: bool,

    /// LaTeX tabular output
    #[arg(short = 't', long = "tex")]
    tex: bool,

    /// CSV output
    #[arg(short = 'c', long = "csv")]
    csv: bool,

    /// HTML table output
    #[arg(short = 'w', long = "web")]
    web: bool,

    /// Markdown table output
    #[arg(short = 'm', long = "markdown")]
    markdown: bool,

    /// one accrual formula per line
    #[arg(short = 'M', long = "math")]
    math: bool,

    /// print sample input and exit
    #[arg(long = "sample")]
    sample: bool,

    /// era and rate tables as JSON
    #[arg(long = "tables", value_name = "FILE")]
    tables: Option<PathBuf>,

    /// trace every line read and calculated
    #[arg(long = "debug")]
    debug: bool,
}

impl Cli {
    /// run settings given on the command line, before any line options
    fn run_config(&self) -> RunConfig {
        let day_count = if self.daily_total {
            DayCountMode::ByDayTotal
        } else if self.daily {
            DayCountMode::ByDayPartial
        } else {
            DayCountMode::ByYear
        };

        let date_style = if self.four_digit_dates {
            Some(DateStyle::FourDigit)
        } else if self.two_digit_dates {
            Some(DateStyle::TwoDigit)
        } else if self.era_dates {
            Some(DateStyle::Era)
        } else {
            None
        };

        let output = if self.math {
            OutputStyle::Math
        } else if self.markdown {
            OutputStyle::Markdown
        } else if self.web {
            OutputStyle::Html
        } else if self.csv {
            OutputStyle::Csv
        } else if self.tex {
            OutputStyle::Tex
        } else {
            OutputStyle::Text
        };

        RunConfig {
            include_first_day: !self.exclude,
            day_count,
            date_style,
            output,
            insert_comma: !self.no_comma,
            ..RunConfig::default()
        }
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if cli.sample {
        println!("{}", SAMPLE_DATA);
        return Ok(());
    }

    let tables = match &cli.tables {
        Some(path) => Tables::load(path)
            .with_context(|| format!("failed to load tables from {}", path.display()))?,
        None => Tables::default(),
    };

    let text = read_input(cli.file.as_ref())?;
    let report = LedgerReport::from_document(&text, &tables, cli.run_config());
    debug!(
        "calculated {} rows, {} diagnostics",
        report.rows.len(),
        report.diagnostics.len()
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    render_report(&report, &tables.eras, &mut out).context("failed to write the ledger")?;
    out.flush().context("failed to flush stdout")?;
    Ok(())
}
