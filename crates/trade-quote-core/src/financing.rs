//! Time-value-of-money helpers for financing costs.
//!
//! All compounding runs over whole days at the system's daily loan rate.
//! Integer-day iteration keeps results exactly reproducible across runs.

use rust_decimal::Decimal;

use crate::types::{Money, Rate};

/// (1 + rate)^days by iterative multiplication.
pub fn compound_factor(daily_rate: Rate, days: u32) -> Decimal {
    let base = Decimal::ONE + daily_rate;
    let mut factor = Decimal::ONE;
    for _ in 0..days {
        factor *= base;
    }
    factor
}

/// Future value of `principal` tied up for `days` at `daily_rate`.
pub fn future_value(principal: Money, daily_rate: Rate, days: u32) -> Money {
    principal * compound_factor(daily_rate, days)
}

/// Interest-equivalent cost of capital between cash-out and cash-in:
/// future value minus principal.
pub fn financing_cost(principal: Money, daily_rate: Rate, days: u32) -> Money {
    future_value(principal, daily_rate, days) - principal
}
