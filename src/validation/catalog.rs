use uuid::Uuid;

use crate::error::{AppError, Result};

/// Converts a `garde` report into a validation error, keeping the first message.
pub fn report_to_error(report: garde::Report) -> AppError {
    let message = report
        .iter()
        .next()
        .map(|(path, error)| {
            let path = path.to_string();
            if path.is_empty() {
                error.to_string()
            } else {
                format!("{path}: {error}")
            }
        })
        .unwrap_or_else(|| "Invalid input".to_string());

    AppError::Validation(message)
}

/// Parses a path or form identifier, distinguishing malformed input from
/// absent records.
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::Validation(format!("Invalid {what} ID")))
}

/// The key names are compared by: trimmed and lowercased.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// The only char of a case mapping, or `None` when it expands.
fn single(mut mapping: impl Iterator<Item = char>) -> Option<char> {
    let c = mapping.next()?;
    mapping.next().is_none().then_some(c)
}

/// Capitalizes the first letter of each whitespace-delimited word and
/// lowercases the rest. Whitespace is preserved as-is.
///
/// A letter whose case mapping expands (`ß`, `İ`) or does not round-trip is
/// kept unchanged, so the result has as many chars as the input and the
/// same `name_key`. `Σ` is left alone since its lowercase form depends on
/// its position in the word.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;

    for c in name.trim().chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
            continue;
        }

        let lower = if c == 'Σ' {
            c
        } else {
            single(c.to_lowercase()).unwrap_or(c)
        };
        let mapped = if at_word_start {
            single(lower.to_uppercase())
                .filter(|upper| single(upper.to_lowercase()) == Some(lower))
                .unwrap_or(lower)
        } else {
            lower
        };

        at_word_start = false;
        out.push(mapped);
    }

    out
}

/// Lowercases the name and joins its words with hyphens.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Trims a name and rejects it when nothing is left.
pub fn require_name(name: &str, empty_message: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(empty_message.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Rejects prices that are not strictly positive finite numbers.
pub fn validate_price(price: f64) -> Result<f64> {
    if !price.is_finite() || price <= 0.0 {
        return Err(AppError::Validation(
            "Price must be a positive number".to_string(),
        ));
    }
    Ok(price)
}

/// Rejects discounts outside 0–100.
pub fn validate_discount(discount: f64) -> Result<f64> {
    if !discount.is_finite() || !(0.0..=100.0).contains(&discount) {
        return Err(AppError::Validation(
            "Discount must be between 0 and 100".to_string(),
        ));
    }
    Ok(discount)
}

/// Parses a number submitted as form text.
pub fn parse_number(raw: &str, field: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| AppError::Validation(format!("{field} must be a number")))
}
