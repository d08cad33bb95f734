mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::CalculateArgs;

/// Multi-phase trade quote calculations with decimal precision
#[derive(Parser)]
#[command(
    name = "tq",
    version,
    about = "Multi-phase trade quote calculations with decimal precision",
    long_about = "A CLI for calculating cross-border B2B trade quotes: currency \
                  normalization, purchase pricing with VAT removal, logistics \
                  distribution, customs duties, financing costs over the payment \
                  calendar, and final sale prices with VAT."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate a full quote from a quote input document
    Calculate(CalculateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<trade_quote_core::CalculationOutcome, Box<dyn std::error::Error>> =
        match cli.command {
            Commands::Calculate(args) => commands::run_calculate(args),
            Commands::Version => {
                println!("tq {}", env!("CARGO_PKG_VERSION"));
                return;
            }
        };

    match result {
        Ok(outcome) => {
            output::format_output(&cli.output, &outcome);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
