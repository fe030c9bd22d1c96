//! Trait kinds and their canonical units

use crate::error::SymbolError;
use crate::unit::Unit;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Measurable trait a question set targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitKind {
    /// Plant height, normalized to metres
    Height,
    /// Leaf blade length, normalized to centimetres
    LeafLength,
    /// Leaf blade width, normalized to centimetres
    LeafWidth,
}

impl TraitKind {
    /// All trait kinds in a stable order
    pub const ALL: [TraitKind; 3] = [TraitKind::Height, TraitKind::LeafLength, TraitKind::LeafWidth];

    /// Unit that values of this trait are reported in
    #[inline]
    #[must_use]
    pub const fn canonical_unit(self) -> Unit {
        match self {
            TraitKind::Height => Unit::Meter,
            TraitKind::LeafLength | TraitKind::LeafWidth => Unit::Centimeter,
        }
    }

    /// Divisor from millimetres into the canonical unit (1000 or 10)
    #[inline]
    #[must_use]
    pub const fn divisor(self) -> f64 {
        self.canonical_unit().millimeters()
    }

    /// Stable snake_case name
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TraitKind::Height => "height",
            TraitKind::LeafLength => "leaf_length",
            TraitKind::LeafWidth => "leaf_width",
        }
    }
}

impl fmt::Display for TraitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TraitKind {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "height" => Ok(TraitKind::Height),
            "leaf_length" => Ok(TraitKind::LeafLength),
            "leaf_width" => Ok(TraitKind::LeafWidth),
            _ => Err(SymbolError::UnknownTrait(s.to_string())),
        }
    }
}
