//! TraitQA Parse
//!
//! Turns a question-answering answer such as `"20-40x10-30 mm"` into one
//! scalar in the trait's canonical unit.
//!
//! # Pipeline
//!
//! ```text
//! answer text → Unit::detect → dimension split ("x") → extract_numbers
//!             → convert + round → NormalizedMeasurement → resolve → ResolvedValue
//! ```
//!
//! Failures are values, not errors: a missing unit is
//! `NormalizedMeasurement::NoMetric`, a third number is
//! `NormalizedMeasurement::TooManyNumbers`, and anything the resolver
//! cannot reduce is `ResolvedValue::Unresolved`.
//!
//! # Example
//!
//! ```rust
//! use traitqa_parse::{normalize, resolve};
//! use traitqa_units::{NormalizedMeasurement, ResolvedValue, TraitKind};
//!
//! let measurement = normalize("20-37 cm", TraitKind::Height);
//! assert_eq!(measurement, NormalizedMeasurement::Range(0.2, 0.37));
//! assert_eq!(resolve(&measurement), ResolvedValue::Value(0.37));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod extract;
pub mod parsers;
pub mod resolve;

// Re-exports for convenience
pub use error::{ExtractError, ParseError};
pub use extract::{extract_numbers, strip_parentheticals, NumericTokens, MAX_NUMERIC_TOKENS};
pub use parsers::{
    default_parsers, normalize, HeightParser, LeafLengthParser, LeafWidthParser,
    MeasurementParser, ParserRegistry, CANONICAL_PRECISION,
};
pub use resolve::{resolve, resolve_text, resolve_tokens};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for answer parsing
    pub use crate::parsers::{default_parsers, normalize, MeasurementParser, ParserRegistry};
    pub use crate::resolve::{resolve, resolve_text};
    pub use traitqa_units::{NormalizedMeasurement, ResolvedValue, TraitKind, Unit};
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use traitqa_units::{NormalizedMeasurement, ResolvedValue, TraitKind};

    #[test]
    fn normalize_then_resolve() {
        let cases = [
            ("20-37 cm", TraitKind::Height, 0.37),
            ("1.8 m", TraitKind::Height, 1.8),
            ("20-40x10-30 mm", TraitKind::LeafLength, 4.0),
            ("20-40x10-30 mm", TraitKind::LeafWidth, 3.0),
        ];

        for (answer, kind, expected) in cases {
            let resolved = resolve(&normalize(answer, kind));
            assert_eq!(resolved, ResolvedValue::Value(expected), "{answer} as {kind}");
        }
    }

    #[test]
    fn registry_matches_free_function() {
        let registry = default_parsers();
        for kind in TraitKind::ALL {
            let via_registry = registry.normalize(kind, "3-5 inches").unwrap();
            assert_eq!(via_registry, normalize("3-5 inches", kind));
        }
    }

    #[test]
    fn sentinel_resolves_to_unresolved() {
        let measurement = normalize("1 2 3 cm", TraitKind::Height);
        assert_eq!(measurement, NormalizedMeasurement::TooManyNumbers);
        assert_eq!(resolve(&measurement), ResolvedValue::Unresolved);
    }
}
