use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use super::{display_figures, format_value};

/// Print just the client-facing answer: the total gross sale price across
/// all products, in the display currency.
pub fn print_minimal(value: &Value) {
    let total = value
        .get("products")
        .and_then(Value::as_array)
        .map(|products| {
            products
                .iter()
                .filter_map(|p| {
                    display_figures(p)
                        .and_then(|f| f.get("sale_price_gross_total"))
                        .and_then(parse_decimal)
                })
                .sum::<Decimal>()
        });

    match total {
        Some(total) => {
            let currency = value
                .get("display_currency")
                .map(format_value)
                .unwrap_or_default();
            println!("{} {}", total, currency);
        }
        None => println!("{}", format_value(value)),
    }
}

fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}
