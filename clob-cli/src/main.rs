//! # CLOB CLI
//!
//! A stdin-driven SETSmm order-entry driver: reads one ASCII order line at a
//! time, submits it to the book, and prints trades and (unless suppressed) a
//! snapshot of the resulting book state.

use clap::Parser;
use clob_core::{format, parse_line, Book, Instrument};
use std::io::{self, BufRead, Write};

const BANNER: &str = r#"
  ____ _     ___  ____
 / ___| |   / _ \| __ )
| |   | |  | | | |  _ \
| |___| |__| |_| | |_) |
 \____|_____\___/|____/

 central limit order book -- SETSmm line driver
"#;

#[derive(Parser)]
#[command(name = "clob-cli")]
#[command(about = "Reads SETSmm order lines from stdin and matches them", long_about = None)]
struct Cli {
    /// Instrument symbol shown in the startup banner.
    #[arg(long, default_value = "XLON")]
    symbol: String,

    /// Suppress the per-line snapshot, printing only trade lines.
    #[arg(long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    let quiet = cli.quiet || env_profiling_enabled();

    println!("{}", BANNER.trim_start_matches('\n'));
    let instrument = Instrument::new(cli.symbol);
    println!("Instrument: {}\n", instrument);

    let mut book = Book::new(instrument);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                eprintln!("error reading stdin: {}", error);
                std::process::exit(1);
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let order = match parse_line(&line) {
            Ok(order) => order,
            Err(err) => {
                eprintln!("rejected line: {}", err);
                continue;
            }
        };

        match book.submit(order) {
            Ok(trades) => {
                for trade in &trades {
                    let _ = writeln!(out, "{}", format::render_trade(trade));
                }
                if !quiet {
                    let _ = writeln!(out, "{}", format::render_snapshot(&book));
                }
            }
            Err(err) => eprintln!("rejected order: {}", err),
        }
    }
}

fn env_profiling_enabled() -> bool {
    std::env::var("ENABLE_PROFILING")
        .map(|v| !v.is_empty())
        .unwrap_or(false)
}
