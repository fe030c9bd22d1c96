//! Error types for answer parsing
//!
//! Parsing outcomes the pipeline expects (no unit, too many numbers) are
//! sentinel values on `NormalizedMeasurement`. The errors here cover the
//! explicit failure of the token extractor, which parsers turn into the
//! `TooManyNumbers` sentinel, and misconfigured registries.

use traitqa_units::TraitKind;

/// Numeric token extraction failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// More numbers than a measurement can hold
    #[error("found more than {limit} numeric tokens")]
    TooManyNumbers {
        /// Maximum allowed
        limit: usize,
    },
}

/// Answer parsing failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No parser registered for the trait
    #[error("no parser registered for trait: '{0}'")]
    NoParserForTrait(TraitKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = ParseError::NoParserForTrait(TraitKind::LeafWidth);
        assert_eq!(err.to_string(), "no parser registered for trait: 'leaf_width'");
    }

    #[test]
    fn extract_error_display() {
        let err = ExtractError::TooManyNumbers { limit: 2 };
        assert_eq!(err.to_string(), "found more than 2 numeric tokens");
    }
}
