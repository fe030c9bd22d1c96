//! Plant height parser

use crate::parsers::MeasurementParser;
use traitqa_units::TraitKind;

/// Reads the whole answer as a height in metres
#[derive(Debug, Clone, Copy, Default)]
pub struct HeightParser;

impl MeasurementParser for HeightParser {
    fn kind(&self) -> TraitKind {
        TraitKind::Height
    }
}
