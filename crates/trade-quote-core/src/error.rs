use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::Currency;

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("No exchange rate available for {currency} -> USD")]
    NoExchangeRate { currency: Currency },

    #[error("Distribution invariant violated in {context}: off by {delta}")]
    DistributionInvariant { context: String, delta: Decimal },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },
}
