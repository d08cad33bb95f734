use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{display_figures, format_value, PRODUCT_COLUMNS};

/// Render a calculation outcome as product and summary tables.
pub fn print_table(value: &Value) {
    let Some(map) = value.as_object() else {
        println!("{}", value);
        return;
    };

    if let Some(currency) = map.get("display_currency") {
        println!("Quote in {}", format_value(currency));
    }

    if let Some(Value::Array(products)) = map.get("products") {
        print_product_table(products);
    }

    if let Some(Value::Object(summary)) = map.get("summary_display") {
        println!("\nQuote totals:");
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in summary {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }

    if let Some(Value::Array(warnings)) = map.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                println!("  - {}", format_warning(w));
            }
        }
    }
}

fn print_product_table(products: &[Value]) {
    if products.is_empty() {
        println!("(no products)");
        return;
    }

    let mut builder = Builder::default();
    let mut headers = vec!["product".to_string()];
    headers.extend(PRODUCT_COLUMNS.iter().map(|(header, _)| header.to_string()));
    builder.push_record(&headers);

    for product in products {
        let name = product
            .get("name")
            .map(format_value)
            .unwrap_or_default();
        let mut row = vec![name];
        if let Some(figures) = display_figures(product) {
            for (_, field) in PRODUCT_COLUMNS {
                row.push(figures.get(*field).map(format_value).unwrap_or_default());
            }
        }
        builder.push_record(row);
    }

    println!("{}", Table::from(builder));
}

fn format_warning(warning: &Value) -> String {
    match warning.as_object() {
        Some(map) => {
            let kind = map.get("kind").map(format_value).unwrap_or_default();
            let details: Vec<String> = map
                .iter()
                .filter(|(k, _)| k.as_str() != "kind")
                .map(|(k, v)| format!("{}={}", k, format_value(v)))
                .collect();
            if details.is_empty() {
                kind
            } else {
                format!("{} ({})", kind, details.join(", "))
            }
        }
        None => format_value(warning),
    }
}
