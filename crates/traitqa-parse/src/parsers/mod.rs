//! Unit-aware answer parsers
//!
//! One parser per trait kind, all sharing the same skeleton:
//! - Detect the unit in the full answer (no unit → `NoMetric`)
//! - Keep the dimension this trait describes (`LxW` split for leaves)
//! - Extract up to two numbers (a third → `TooManyNumbers`)
//! - Convert into the canonical unit and round

use crate::error::{ExtractError, ParseError};
use crate::extract::{extract_numbers, NumericTokens};
use std::sync::Arc;
use traitqa_units::{round_to, NormalizedMeasurement, TraitKind, Unit};

mod height;
mod leaf;

pub use height::HeightParser;
pub use leaf::{LeafLengthParser, LeafWidthParser, DIMENSION_SEPARATOR};

/// Decimal places kept on canonical values
pub const CANONICAL_PRECISION: u32 = 4;

/// Parser trait for turning answer text into a canonical measurement
///
/// Implementors choose the trait kind and which part of a compound answer
/// they read; the normalization steps are shared.
pub trait MeasurementParser: Send + Sync + 'static {
    /// Trait this parser produces values for
    fn kind(&self) -> TraitKind;

    /// Portion of the answer describing this trait's dimension
    fn select_dimension<'a>(&self, answer: &'a str) -> &'a str {
        answer
    }

    /// Unit values are converted into
    fn canonical_unit(&self) -> Unit {
        self.kind().canonical_unit()
    }

    /// Normalize an answer into the canonical unit
    fn normalize(&self, answer: &str) -> NormalizedMeasurement {
        // Unit comes from the whole answer; both dimensions share it
        let Some(unit) = Unit::detect(answer) else {
            tracing::debug!(kind = %self.kind(), answer, "no unit in answer");
            return NormalizedMeasurement::NoMetric;
        };

        let segment = self.select_dimension(answer);
        let tokens = match extract_numbers(segment) {
            Ok(tokens) => tokens,
            Err(ExtractError::TooManyNumbers { .. }) => {
                tracing::debug!(kind = %self.kind(), segment, "too many numbers in answer");
                return NormalizedMeasurement::TooManyNumbers;
            }
        };

        let factor = unit.factor_to(self.canonical_unit());
        let converted: NumericTokens = tokens
            .iter()
            .map(|value| round_to(value * factor, CANONICAL_PRECISION))
            .collect();

        tracing::debug!(kind = %self.kind(), %unit, ?converted, "normalized answer");
        NormalizedMeasurement::from_values(&converted)
    }
}

/// Normalize `answer` with the built-in parser for `kind`
#[must_use]
pub fn normalize(answer: &str, kind: TraitKind) -> NormalizedMeasurement {
    match kind {
        TraitKind::Height => HeightParser.normalize(answer),
        TraitKind::LeafLength => LeafLengthParser.normalize(answer),
        TraitKind::LeafWidth => LeafWidthParser.normalize(answer),
    }
}

/// Parser lookup by trait kind
#[derive(Clone)]
pub struct ParserRegistry {
    parsers: Vec<Arc<dyn MeasurementParser>>,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl ParserRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Register a parser, replacing any existing parser for the same kind
    pub fn register<P: MeasurementParser>(&mut self, parser: P) {
        let kind = parser.kind();
        self.parsers.retain(|p| p.kind() != kind);
        self.parsers.push(Arc::new(parser));
    }

    /// Find parser for a trait kind
    #[must_use]
    pub fn find(&self, kind: TraitKind) -> Option<&dyn MeasurementParser> {
        self.parsers.iter().find(|p| p.kind() == kind).map(|p| &**p)
    }

    /// Normalize an answer with the parser registered for `kind`
    ///
    /// # Errors
    /// `ParseError::NoParserForTrait` if nothing is registered for `kind`
    pub fn normalize(
        &self,
        kind: TraitKind,
        answer: &str,
    ) -> Result<NormalizedMeasurement, ParseError> {
        self.find(kind)
            .map(|parser| parser.normalize(answer))
            .ok_or(ParseError::NoParserForTrait(kind))
    }

    /// Kinds with a registered parser
    #[must_use]
    pub fn kinds(&self) -> Vec<TraitKind> {
        self.parsers.iter().map(|p| p.kind()).collect()
    }
}

/// Create registry with the built-in parsers for every trait kind
#[inline]
#[must_use]
pub fn default_parsers() -> ParserRegistry {
    let mut registry = ParserRegistry::new();
    registry.register(HeightParser);
    registry.register(LeafLengthParser);
    registry.register(LeafWidthParser);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StemParser;

    impl MeasurementParser for StemParser {
        fn kind(&self) -> TraitKind {
            TraitKind::Height
        }

        fn canonical_unit(&self) -> Unit {
            Unit::Millimeter
        }
    }

    #[test]
    fn custom_canonical_unit() {
        assert_eq!(
            StemParser.normalize("2 cm"),
            NormalizedMeasurement::Single(20.0)
        );
    }

    #[test]
    fn register_replaces_same_kind() {
        let mut registry = default_parsers();
        registry.register(StemParser);

        assert_eq!(registry.kinds().len(), 3);
        assert_eq!(
            registry.normalize(TraitKind::Height, "2 cm").unwrap(),
            NormalizedMeasurement::Single(20.0)
        );
    }

    #[test]
    fn missing_parser() {
        let registry = ParserRegistry::new();
        assert_eq!(
            registry.normalize(TraitKind::LeafWidth, "2 cm"),
            Err(ParseError::NoParserForTrait(TraitKind::LeafWidth))
        );
    }

    #[test]
    fn clone_keeps_custom_parsers() {
        let mut registry = default_parsers();
        registry.register(StemParser);

        let cloned = registry.clone();
        assert_eq!(
            cloned.normalize(TraitKind::Height, "2 cm").unwrap(),
            NormalizedMeasurement::Single(20.0)
        );
        assert_eq!(
            cloned.normalize(TraitKind::LeafWidth, "2 cm").unwrap(),
            NormalizedMeasurement::Single(2.0)
        );
    }

    #[test]
    fn registry_debug_and_clone() {
        let registry = default_parsers();
        let cloned = registry.clone();
        assert_eq!(registry.kinds(), cloned.kinds());
        assert!(format!("{registry:?}").contains("ParserRegistry"));
    }

    #[test]
    fn unit_without_number_is_empty() {
        assert_eq!(
            normalize("several cm", TraitKind::Height),
            NormalizedMeasurement::Empty
        );
    }

    #[test]
    fn imperial_units_convert() {
        assert_eq!(
            normalize("3-6 ft", TraitKind::Height),
            NormalizedMeasurement::Range(0.9144, 1.8288)
        );
        assert_eq!(
            normalize("2 inches", TraitKind::LeafLength),
            NormalizedMeasurement::Single(5.08)
        );
    }
}
