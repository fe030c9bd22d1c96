//! Numeric token extraction
//!
//! Pulls at most two numbers out of a measurement expression after
//! removing parenthetical asides and treating `-` as a range separator.

use crate::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;
use std::borrow::Cow;
use traitqa_units::parse_number;

/// A measurement carries a point value or a two-value range
pub const MAX_NUMERIC_TOKENS: usize = 2;

/// Numbers found in a measurement expression, in text order
pub type NumericTokens = SmallVec<[f64; MAX_NUMERIC_TOKENS]>;

static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(.*?\)").expect("parenthetical regex"));

/// Remove every `( ... )` aside, shortest match first
#[must_use]
pub fn strip_parentheticals(text: &str) -> Cow<'_, str> {
    PARENTHETICAL.replace_all(text, "")
}

/// Extract the ordered numeric tokens of `text`
///
/// Words that are not numbers (units, qualifiers) are skipped.
///
/// # Errors
/// Returns `ExtractError::TooManyNumbers` as soon as a third number is
/// seen; the tokens are never truncated.
pub fn extract_numbers(text: &str) -> Result<NumericTokens, ExtractError> {
    let cleaned = strip_parentheticals(text).replace('-', " ");

    let mut tokens = NumericTokens::new();
    for part in cleaned.split_whitespace() {
        let Ok(value) = parse_number(part) else {
            continue;
        };
        if tokens.len() == MAX_NUMERIC_TOKENS {
            return Err(ExtractError::TooManyNumbers {
                limit: MAX_NUMERIC_TOKENS,
            });
        }
        tokens.push(value);
    }

    Ok(tokens)
}
