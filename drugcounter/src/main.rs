//! # Drugcounter
//!
//! Command-line front end for the drug cost ranking pipeline.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- <input_path> <output_path> [top_k] [logging_flag] [log_path]
//! ```
//!
//! - `top_k`: keep only the K most expensive drugs (all drugs if absent or not a number)
//! - `logging_flag`: `1` writes an audit log, `0` disables it (default `1`)
//! - `log_path`: audit log destination (default `log.txt`)

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{fmt, EnvFilter};

use drugcounter::config::{parse_top_k, LoggingFlag, RunConfig};
use drugcounter::Error;

/// Rank drugs in a prescription ledger by total cost
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Prescription ledger; the first line is a header
    input_path: PathBuf,

    /// Report destination
    output_path: PathBuf,

    /// Number of drugs to report
    #[arg(allow_hyphen_values = true)]
    top_k: Option<String>,

    /// 1 to write an audit log, 0 to skip it
    #[arg(allow_hyphen_values = true)]
    logging_flag: Option<String>,

    /// Audit log destination
    #[arg(allow_hyphen_values = true)]
    log_path: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> RunConfig {
        let flag = LoggingFlag::parse(self.logging_flag.as_deref());
        if flag == LoggingFlag::Unrecognized {
            println!("Logging flag should be 0 or 1. Program continues with logging.");
        }

        let mut config = RunConfig::new(self.input_path, self.output_path);
        config.top_k = parse_top_k(self.top_k.as_deref());
        config.logging = flag.enabled();
        if let Some(log_path) = self.log_path {
            config.log_path = log_path;
        }
        config
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Entry point for the ranking pipeline
///
/// ## Stages
///
/// 1. **Argument Parsing**: Validates positional arguments into a [`RunConfig`]
/// 2. **Ranking**: Reads, aggregates, selects and writes via [`drugcounter::run`]
/// 3. **Summary**: Prints line and drug counts
///
/// A missing input file is reported before anything is opened and exits with
/// status 1.
fn main() -> anyhow::Result<()> {
    init_tracing();

    // Stage 1: Argument Parsing
    let config = Cli::parse().into_config();

    println!("=== Drug Cost Ranking ===\n");
    println!("Reading ledger: {}", config.input_path.display());
    match config.top_k {
        Some(k) => println!("Keeping top {} drugs", k),
        None => println!("Keeping all drugs"),
    }

    // Stage 2: Ranking
    let summary = match drugcounter::run(&config) {
        Ok(summary) => summary,
        Err(Error::InputNotFound(path)) => {
            eprintln!("Input file '{}' does not exist.", path.display());
            process::exit(1);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("ranking {} failed", config.input_path.display()));
        }
    };

    // Stage 3: Summary
    println!("\n=== Processing Summary ===");
    println!("Lines read: {}", summary.lines_read);
    println!("Skipped: {}", summary.rejected);
    println!("Distinct drugs: {}", summary.distinct_drugs);
    println!("Drugs written: {}", summary.written);
    println!("Output saved to: {}", config.output_path.display());
    if config.logging {
        println!("Audit log: {}", config.log_path.display());
    }

    Ok(())
}
