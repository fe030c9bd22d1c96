//! Length unit table
//!
//! The vocabulary is closed: eight symbols, each with an exact factor
//! into millimetres. Detection in free text matches whole words only.

use crate::error::SymbolError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length unit recognised in answer text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// `mm`
    Millimeter,
    /// `cm`
    Centimeter,
    /// `m`
    Meter,
    /// `km`
    Kilometer,
    /// `inches`
    Inch,
    /// `ft`
    Foot,
    /// `yds`
    Yard,
    /// `miles`
    Mile,
}

impl Unit {
    /// Order in which symbols are searched for in an answer; first hit wins
    pub const DETECTION_ORDER: [Unit; 8] = [
        Unit::Millimeter,
        Unit::Centimeter,
        Unit::Meter,
        Unit::Kilometer,
        Unit::Inch,
        Unit::Foot,
        Unit::Yard,
        Unit::Mile,
    ];

    /// Symbol as it must appear in text
    #[inline]
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Unit::Millimeter => "mm",
            Unit::Centimeter => "cm",
            Unit::Meter => "m",
            Unit::Kilometer => "km",
            Unit::Inch => "inches",
            Unit::Foot => "ft",
            Unit::Yard => "yds",
            Unit::Mile => "miles",
        }
    }

    /// Length of one unit in millimetres
    #[inline]
    #[must_use]
    pub const fn millimeters(self) -> f64 {
        match self {
            Unit::Millimeter => 1.0,
            Unit::Centimeter => 10.0,
            Unit::Meter => 1000.0,
            Unit::Kilometer => 1e6,
            Unit::Inch => 25.4,
            Unit::Foot => 304.8,
            Unit::Yard => 914.4,
            Unit::Mile => 1.609_344e6,
        }
    }

    /// Multiplier converting a value in `self` into `target`
    #[inline]
    #[must_use]
    pub fn factor_to(self, target: Unit) -> f64 {
        self.millimeters() / target.millimeters()
    }

    /// Look up a unit by its symbol, ignoring case
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Unit> {
        let lowered = symbol.to_lowercase();
        Self::DETECTION_ORDER
            .into_iter()
            .find(|unit| unit.symbol() == lowered)
    }

    /// Find the first unit, in [`Unit::DETECTION_ORDER`], used as a word in `text`
    ///
    /// Punctuation is dropped and case ignored before splitting on
    /// whitespace, so `"1.8 M."` detects metres while `"mm"` never matches
    /// `m`.
    #[must_use]
    pub fn detect(text: &str) -> Option<Unit> {
        let words = unit_words(text);
        Self::DETECTION_ORDER
            .into_iter()
            .find(|unit| words.iter().any(|w| w == unit.symbol()))
    }
}

/// Lowercased whitespace-separated words of `text` with ASCII punctuation removed
fn unit_words(text: &str) -> Vec<String> {
    let stripped: String = text
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    stripped
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::from_symbol(s.trim()).ok_or_else(|| SymbolError::UnknownUnit(s.to_string()))
    }
}
