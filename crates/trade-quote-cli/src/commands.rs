use chrono::Utc;
use clap::Args;
use rust_decimal::Decimal;

use trade_quote_core::model::{QuoteInput, SystemConfig};
use trade_quote_core::rates::RateTable;
use trade_quote_core::{calculate_quote, CalculationOutcome};

use crate::input;

/// Arguments for the quote calculation
#[derive(Args)]
pub struct CalculateArgs {
    /// Path to the quote input document (JSON or YAML)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to an exchange-rate table (JSON or YAML). Without one, only
    /// USD-denominated quotes can be calculated.
    #[arg(long)]
    pub rates: Option<String>,

    /// Path to a system configuration file (JSON or YAML)
    #[arg(long)]
    pub config: Option<String>,

    /// Daily loan interest rate, e.g. 0.0005 (overrides the config file)
    #[arg(long)]
    pub daily_interest_rate: Option<Decimal>,

    /// Financing agent fee as a fraction of the sale-price base
    #[arg(long)]
    pub financing_agent_fee: Option<Decimal>,

    /// Cargo insurance as a fraction of the purchase price
    #[arg(long)]
    pub insurance: Option<Decimal>,
}

pub fn run_calculate(args: CalculateArgs) -> Result<CalculationOutcome, Box<dyn std::error::Error>> {
    let quote: QuoteInput = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        return Err("--input file is required (or pipe a quote document on stdin)".into());
    };

    let rates: RateTable = match args.rates {
        Some(ref path) => input::file::read_document(path)?,
        None => RateTable::new(Utc::now()),
    };

    let mut config: SystemConfig = match args.config {
        Some(ref path) => input::file::read_document(path)?,
        None => SystemConfig {
            daily_interest_rate: Decimal::ZERO,
            financing_agent_fee_pct: Decimal::ZERO,
            insurance_pct: Decimal::ZERO,
        },
    };
    if let Some(rate) = args.daily_interest_rate {
        config.daily_interest_rate = rate;
    }
    if let Some(fee) = args.financing_agent_fee {
        config.financing_agent_fee_pct = fee;
    }
    if let Some(pct) = args.insurance {
        config.insurance_pct = pct;
    }

    let outcome = calculate_quote(&quote, &config, &rates)?;
    Ok(outcome)
}
