/// Parses `text` as a finite float. `NaN` and infinities are rejected.
pub fn parse_finite(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Renders a number for diagnostics; integral values print without a
/// fractional part.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}
