pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use serde_json::Value;
use trade_quote_core::CalculationOutcome;

use crate::OutputFormat;

/// Per-product columns shared by the table and CSV renderers, in display
/// order. Each entry is (column header, field name in the product figures).
pub const PRODUCT_COLUMNS: &[(&str, &str)] = &[
    ("purchase_total", "purchase_price_total"),
    ("logistics", "logistics_total"),
    ("duties", "duties_total"),
    ("financing", "financing_cost_share"),
    ("cogs_total", "cogs_total"),
    ("margin", "margin"),
    ("commission", "transit_commission"),
    ("net_total", "sale_price_net_total"),
    ("vat", "vat_on_sale"),
    ("gross_total", "sale_price_gross_total"),
];

/// Dispatch output to the appropriate formatter. JSON renders the typed
/// outcome directly; the lossy formats work from its serialized form.
pub fn format_output(format: &OutputFormat, outcome: &CalculationOutcome) {
    if let OutputFormat::Json = format {
        json::print_json(outcome);
        return;
    }

    let value = match serde_json::to_value(outcome) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("JSON serialization error: {}", e);
            return;
        }
    };
    match format {
        OutputFormat::Table => table::print_table(&value),
        OutputFormat::Csv => csv_out::print_csv(&value),
        OutputFormat::Minimal => minimal::print_minimal(&value),
        OutputFormat::Json => {}
    }
}

/// Pull a product's figures in the quote's display currency.
pub fn display_figures(product: &Value) -> Option<&serde_json::Map<String, Value>> {
    product.get("display")?.as_object()
}

pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
