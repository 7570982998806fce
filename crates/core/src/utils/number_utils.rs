use log::debug;

/// Parses a user-entered amount the way the form inputs do.
///
/// Surrounding whitespace is ignored and a decimal comma is accepted. Empty,
/// non-numeric or non-finite text is coerced to zero.
pub fn parse_amount_lenient(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed.replace(',', ".").parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            debug!("Coercing non-numeric amount '{}' to zero", trimmed);
            0.0
        }
    }
}
