use serde_json::Value;
use std::io;

use super::{display_figures, format_value, PRODUCT_COLUMNS};

/// Write the per-product figures as CSV to stdout, one row per product,
/// in the quote's display currency.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let Some(Value::Array(products)) = value.get("products") else {
        let _ = wtr.write_record([&format_value(value)]);
        let _ = wtr.flush();
        return;
    };

    let mut headers = vec!["product"];
    headers.extend(PRODUCT_COLUMNS.iter().map(|(header, _)| *header));
    let _ = wtr.write_record(&headers);

    for product in products {
        let name = product.get("name").map(format_value).unwrap_or_default();
        let mut row = vec![name];
        if let Some(figures) = display_figures(product) {
            for (_, field) in PRODUCT_COLUMNS {
                row.push(figures.get(*field).map(format_value).unwrap_or_default());
            }
        }
        let _ = wtr.write_record(&row);
    }

    let _ = wtr.flush();
}
