use amortization::{AmortizationTable, LoanTerms, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;
use std::process;

/// Print the amortization schedule of a fixed-rate loan
#[derive(Parser, Debug)]
#[command(name = "amortize", version, about)]
struct Cli {
    /// Original loan balance
    #[arg(long, default_value_t = 200000.)]
    principal: f64,

    /// Annual interest rate in percent (7.5 means 7.5%)
    #[arg(long, default_value_t = 7.5)]
    rate: f64,

    /// Term of the loan in years (at most 100)
    #[arg(long, default_value_t = 30)]
    years: u32,

    /// Month reported by the remaining balance and scheduled principal lines
    #[arg(long, default_value_t = 12)]
    month: u32,

    /// First pay date (YYYY-MM-DD)
    #[arg(long, default_value = "2019-02-01")]
    pay_date: NaiveDate,

    /// Date the loan was originated (YYYY-MM-DD), defaults to today
    #[arg(long)]
    closing_date: Option<NaiveDate>,

    /// Print only the first N rows of the table
    #[arg(long)]
    rows: Option<usize>,

    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    SimpleLogger::new()
        .with_level(cli.log_level.into())
        .init()
        .unwrap();

    if let Err(e) = run(&cli) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let closing_date = match cli.closing_date {
        Some(date) => date,
        None => {
            let today = Local::now().date_naive();
            info!("no closing date given, using {}", today);
            today
        }
    };

    let terms = LoanTerms::new(cli.principal, cli.rate, cli.years)?;
    let balance = terms.remaining_balance(cli.month)?;
    let principal = terms.scheduled_principal(cli.month)?;
    let table = terms.schedule(cli.pay_date, closing_date)?;

    println!("Remaining balance after month {}: ${:.2}", cli.month, balance);
    println!("Scheduled principal for month {}: ${:.2}", cli.month, principal);
    println!();
    show_schedule(&table, cli.rows);
    Ok(())
}

fn show_schedule(table: &AmortizationTable, limit: Option<usize>) {
    match limit {
        // header line plus `n` rows
        Some(n) => {
            for line in table.to_string().lines().take(n + 1) {
                println!("{}", line);
            }
        }
        None => print!("{}", table),
    }
    println!();
    println!(
        "Total paid ${:.2}: principal ${:.2}, interest ${:.2}",
        table.total_due(),
        table.total_principal(),
        table.total_interest()
    );
}
