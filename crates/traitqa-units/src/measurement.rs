//! Normalized measurements and resolved scalar values
//!
//! A [`NormalizedMeasurement`] never holds more than two numbers: the
//! shape is encoded in the variants, so a third value can only be
//! represented by the `TooManyNumbers` sentinel.

use crate::error::SymbolError;
use crate::number::{format_number, parse_number};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Scalar written for predictions that could not be resolved
pub const UNRESOLVED_SENTINEL: f64 = -1.0;

const NO_METRIC: &str = "NoMetric";
const TOO_MANY_NUMBERS: &str = "TooManyNumbers";

/// Answer text converted into the trait's canonical unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizedMeasurement {
    /// A unit was found but no number followed it
    Empty,
    /// One point estimate
    Single(f64),
    /// Lower and upper value of a reported range
    Range(f64, f64),
    /// No recognised unit in the answer
    NoMetric,
    /// More than two numbers remained after filtering
    TooManyNumbers,
}

impl NormalizedMeasurement {
    /// Build from an ordered list of canonical values
    ///
    /// Three or more values collapse to `TooManyNumbers`; the list is never
    /// truncated.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        match *values {
            [] => Self::Empty,
            [single] => Self::Single(single),
            [low, high] => Self::Range(low, high),
            _ => Self::TooManyNumbers,
        }
    }

    /// Numeric values held, empty for sentinels
    #[must_use]
    pub fn values(&self) -> SmallVec<[f64; 2]> {
        match *self {
            Self::Single(v) => smallvec::smallvec![v],
            Self::Range(low, high) => smallvec::smallvec![low, high],
            Self::Empty | Self::NoMetric | Self::TooManyNumbers => SmallVec::new(),
        }
    }

    /// Whether this is one of the failure sentinels
    #[inline]
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::NoMetric | Self::TooManyNumbers)
    }
}

impl fmt::Display for NormalizedMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Empty => Ok(()),
            Self::Single(v) => f.write_str(&format_number(v)),
            Self::Range(low, high) => {
                write!(f, "{} {}", format_number(low), format_number(high))
            }
            Self::NoMetric => f.write_str(NO_METRIC),
            Self::TooManyNumbers => f.write_str(TOO_MANY_NUMBERS),
        }
    }
}

impl FromStr for NormalizedMeasurement {
    type Err = SymbolError;

    /// Read back the textual form produced by `Display`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed {
            NO_METRIC => return Ok(Self::NoMetric),
            TOO_MANY_NUMBERS => return Ok(Self::TooManyNumbers),
            _ => {}
        }

        let values = trimmed
            .split_whitespace()
            .map(parse_number)
            .collect::<Result<SmallVec<[f64; 2]>, _>>()?;

        if values.len() > 2 {
            return Err(SymbolError::TooManyValues(values.len()));
        }
        Ok(Self::from_values(&values))
    }
}

impl Serialize for NormalizedMeasurement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NormalizedMeasurement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Single scalar prediction in canonical unit
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ResolvedValue {
    /// A resolved value
    Value(f64),
    /// Nothing could be resolved; written as `-1`
    #[default]
    Unresolved,
}

impl ResolvedValue {
    /// Resolved value, if any
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match *self {
            Self::Value(v) => Some(v),
            Self::Unresolved => None,
        }
    }

    /// Scalar form with `-1` standing in for unresolved
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.value().unwrap_or(UNRESOLVED_SENTINEL)
    }

    /// Whether a value was resolved
    #[inline]
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl fmt::Display for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Value(v) => f.write_str(&format_number(v)),
            Self::Unresolved => f.write_str("-1"),
        }
    }
}

impl Serialize for ResolvedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for ResolvedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        // Lengths are never negative, so -1 is unambiguous
        if raw == UNRESOLVED_SENTINEL {
            Ok(Self::Unresolved)
        } else {
            Ok(Self::Value(raw))
        }
    }
}
