//! Explicit numeric parsing and formatting
//!
//! Tokens are read with [`parse_number`], which returns a tagged result
//! instead of relying on a convert-and-catch idiom.

use crate::error::NumberError;

/// Parse a single token as a finite real number
///
/// Accepts the usual decimal forms (`"2"`, `"0.37"`, `".5"`, `"1e3"`).
///
/// # Errors
/// - `NumberError::Empty` for blank tokens
/// - `NumberError::Invalid` when the token is not numeric
/// - `NumberError::NonFinite` for `inf` / `NaN` spellings
pub fn parse_number(token: &str) -> Result<f64, NumberError> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(NumberError::Empty);
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| NumberError::Invalid(trimmed.to_string()))?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(NumberError::NonFinite(trimmed.to_string()))
    }
}

/// Round half away from zero to a fixed number of decimal places
#[inline]
#[must_use]
pub fn round_to(value: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    (value * scale).round() / scale
}

/// Shortest round-trip decimal form, always carrying a fractional part
///
/// `2.0` renders as `"2.0"` and `0.37` as `"0.37"`.
#[inline]
#[must_use]
pub fn format_number(value: f64) -> String {
    format!("{value:?}")
}
