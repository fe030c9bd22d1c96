//! Leaf dimension parsers
//!
//! Leaf sizes are often written as `LxW` (`"20-40x10-30 mm"`). Length is
//! the piece before the first separator, width the piece between the first
//! and second. Answers without a separator are read whole by both parsers.

use crate::parsers::MeasurementParser;
use traitqa_units::TraitKind;

/// Separator between length and width in compound answers
pub const DIMENSION_SEPARATOR: char = 'x';

/// Reads the length component of a leaf size, in centimetres
#[derive(Debug, Clone, Copy, Default)]
pub struct LeafLengthParser;

impl MeasurementParser for LeafLengthParser {
    fn kind(&self) -> TraitKind {
        TraitKind::LeafLength
    }

    fn select_dimension<'a>(&self, answer: &'a str) -> &'a str {
        answer
            .split_once(DIMENSION_SEPARATOR)
            .map_or(answer, |(length, _)| length)
    }
}

/// Reads the width component of a leaf size, in centimetres
#[derive(Debug, Clone, Copy, Default)]
pub struct LeafWidthParser;

impl MeasurementParser for LeafWidthParser {
    fn kind(&self) -> TraitKind {
        TraitKind::LeafWidth
    }

    fn select_dimension<'a>(&self, answer: &'a str) -> &'a str {
        answer.split(DIMENSION_SEPARATOR).nth(1).unwrap_or(answer)
    }
}
