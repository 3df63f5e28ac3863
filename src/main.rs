mod api;
mod board;
mod cache;
mod config;
mod convert;
mod error;
mod export;
mod models;

use chrono::Local;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use log::{debug, error, info};
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process,
};

use crate::api::ExchangeRateApi;
use crate::board::{refresh, render};
use crate::cache::RateCache;
use crate::config::{
    normalize_code, Config, DEFAULT_AMOUNT, DEFAULT_BASE, DEFAULT_EXPORT_FILE, MIN_AMOUNT,
};
use crate::error::BoardResult;
use crate::models::DEFAULT_TARGETS;

/// Live CNY exchange-rate board with CSV export.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Amount of CNY to convert (minimum 1.0).
    #[arg(long, default_value_t = DEFAULT_AMOUNT, value_parser = parse_amount)]
    amount: f64,

    /// Where to write the CSV export.
    #[arg(long, default_value = DEFAULT_EXPORT_FILE)]
    output: PathBuf,

    /// Skip writing the CSV export.
    #[arg(long)]
    no_export: bool,

    /// Keep prompting for new amounts, reusing the cached rates.
    #[arg(long, short)]
    interactive: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every rate for a base currency.
    Rates {
        /// Base currency, defaults to RATES_BASE or CNY.
        #[arg(long)]
        base: Option<String>,
    },
}

fn parse_amount(raw: &str) -> Result<f64, String> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("not a number: {}", raw))?;
    if amount.is_finite() && amount >= MIN_AMOUNT {
        Ok(amount)
    } else {
        Err(format!("amount must be at least {}", MIN_AMOUNT))
    }
}

fn main() {
    dotenv().ok();
    init_logger();
    let args = Args::parse();

    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

fn run(args: Args) -> BoardResult<()> {
    let config = Config::from_env()?;
    let runtime = tokio::runtime::Runtime::new()?;

    match args.command {
        Some(Command::Rates { base }) => {
            let base = match base {
                Some(raw) => normalize_code(&raw)?,
                None => config.base.clone(),
            };
            let mut cache = RateCache::new(ExchangeRateApi::new(&config)?, &base);
            let snapshot = runtime.block_on(cache.get())?;

            let mut codes: Vec<_> = snapshot.rates.iter().collect();
            codes.sort_by(|a, b| a.0.cmp(b.0));
            println!("Exchange rates for {}:", snapshot.base);
            for (currency, rate) in codes {
                println!("{}: {}", currency, rate);
            }
            Ok(())
        }
        None => {
            let export_path = (!args.no_export).then_some(args.output.as_path());
            let mut cache = RateCache::new(ExchangeRateApi::new(&config)?, DEFAULT_BASE);
            let stdout = io::stdout();
            let mut amount = args.amount;

            loop {
                let outcome =
                    runtime.block_on(refresh(&mut cache, amount, &DEFAULT_TARGETS, export_path));
                render(&mut stdout.lock(), &outcome, amount, export_path, &Local::now())?;

                if !args.interactive {
                    return Ok(());
                }
                debug!("Cached rates age: {:?}", cache.age());
                match prompt_amount(amount)? {
                    Some(next) => amount = next,
                    None => return Ok(()),
                }
            }
        }
    }
}

/// Reads the next amount from stdin. An empty line keeps the previous amount;
/// `q` or end of input stops.
fn prompt_amount(current: f64) -> BoardResult<Option<f64>> {
    let stdin = io::stdin();
    loop {
        print!("\n请输入人民币金额 (CNY) [回车沿用 {}, q 退出]: ", current);
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        if line.is_empty() {
            return Ok(Some(current));
        }
        match parse_amount(line) {
            Ok(amount) => return Ok(Some(amount)),
            Err(e) => {
                info!("Rejected amount input {:?}", line);
                println!("{}", e);
            }
        }
    }
}
