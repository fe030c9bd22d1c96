//! Value resolution
//!
//! Reduces a normalized measurement to one scalar. A range resolves to its
//! upper bound.

use traitqa_units::{parse_number, NormalizedMeasurement, ResolvedValue};

/// Resolve a normalized measurement to a single scalar
#[must_use]
pub fn resolve(measurement: &NormalizedMeasurement) -> ResolvedValue {
    match *measurement {
        NormalizedMeasurement::Single(value) => ResolvedValue::Value(value),
        NormalizedMeasurement::Range(_, upper) => ResolvedValue::Value(upper),
        NormalizedMeasurement::Empty
        | NormalizedMeasurement::NoMetric
        | NormalizedMeasurement::TooManyNumbers => ResolvedValue::Unresolved,
    }
}

/// Resolve a measurement given as separate textual values
///
/// One parseable token resolves to itself; two parseable tokens resolve to
/// the second. Any other shape, or any token that is not a number, is
/// unresolved.
#[must_use]
pub fn resolve_tokens<S: AsRef<str>>(tokens: &[S]) -> ResolvedValue {
    match tokens {
        [only] => parse_number(only.as_ref()).map_or(ResolvedValue::Unresolved, ResolvedValue::Value),
        [lower, upper] => match (parse_number(lower.as_ref()), parse_number(upper.as_ref())) {
            (Ok(_), Ok(upper)) => ResolvedValue::Value(upper),
            _ => ResolvedValue::Unresolved,
        },
        _ => ResolvedValue::Unresolved,
    }
}

/// Resolve the stored textual form of a measurement (e.g. `"0.2 0.37"`)
///
/// Sentinel text such as `"NoMetric"` resolves to unresolved.
#[must_use]
pub fn resolve_text(text: &str) -> ResolvedValue {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    resolve_tokens(&tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_takes_upper_bound() {
        assert_eq!(
            resolve(&NormalizedMeasurement::Range(0.2, 0.37)),
            ResolvedValue::Value(0.37)
        );
        assert_eq!(resolve_tokens(&["0.2", "0.37"]), ResolvedValue::Value(0.37));
    }

    #[test]
    fn single_value_passes_through() {
        assert_eq!(resolve(&NormalizedMeasurement::Single(1.8)), ResolvedValue::Value(1.8));
        assert_eq!(resolve_text("1.8"), ResolvedValue::Value(1.8));
    }

    #[test]
    fn sentinels_are_unresolved() {
        assert_eq!(resolve(&NormalizedMeasurement::NoMetric), ResolvedValue::Unresolved);
        assert_eq!(
            resolve(&NormalizedMeasurement::TooManyNumbers),
            ResolvedValue::Unresolved
        );
        assert_eq!(resolve(&NormalizedMeasurement::Empty), ResolvedValue::Unresolved);
        assert_eq!(resolve_text("NoMetric"), ResolvedValue::Unresolved);
        assert_eq!(resolve_text("TooManyNumbers"), ResolvedValue::Unresolved);
        assert_eq!(resolve_text(""), ResolvedValue::Unresolved);
    }

    #[test]
    fn malformed_shapes_are_unresolved() {
        assert_eq!(resolve_tokens(&["tall"]), ResolvedValue::Unresolved);
        assert_eq!(resolve_tokens(&["tall", "2.0"]), ResolvedValue::Unresolved);
        assert_eq!(resolve_tokens(&["1", "2", "3"]), ResolvedValue::Unresolved);
    }

    #[test]
    fn zero_is_a_value() {
        assert_eq!(resolve_text("0.0"), ResolvedValue::Value(0.0));
    }
}
