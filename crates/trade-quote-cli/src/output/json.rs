use trade_quote_core::CalculationOutcome;

/// Pretty-print the full calculation outcome as JSON. This is the
/// machine-readable rendering: every canonical and display figure, the
/// rate snapshot and the warnings, exactly as the engine produced them.
pub fn print_json(outcome: &CalculationOutcome) {
    match serde_json::to_string_pretty(outcome) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}
