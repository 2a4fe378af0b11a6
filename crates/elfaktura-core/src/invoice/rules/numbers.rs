//! Locale-aware number normalization.
//!
//! Invoices print numbers with a decimal comma and spaces as thousands
//! separators ("1 234,56"). This is the only place that convention lives.

use crate::error::FormatError;
use crate::layout::CellValue;

/// Normalize a cell to a float. Numeric cells pass through unchanged.
pub fn normalize(value: &CellValue) -> Result<f64, FormatError> {
    match value {
        CellValue::Number(n) => Ok(*n),
        CellValue::Text(s) => parse_locale_number(s),
        CellValue::Empty => Err(FormatError::new("")),
    }
}

/// Parse a locale-formatted number ("1 234,56" -> 1234.56).
///
/// Spaces (regular, non-breaking and narrow) are dropped and the decimal
/// comma becomes a point. Non-finite results are rejected.
pub fn parse_locale_number(s: &str) -> Result<f64, FormatError> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{00a0}' | '\u{202f}'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(FormatError::new(s)),
    }
}

/// Format a number the way invoices print it (1234.5 -> "1 234,50").
pub fn format_locale_number(n: f64) -> String {
    let s = format!("{:.2}", n.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();
    if n < 0.0 {
        formatted.push('-');
    }
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(' ');
        }
        formatted.push(*c);
    }

    format!("{},{}", formatted, decimal_part)
}
