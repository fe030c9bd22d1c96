//! TraitQA Units
//!
//! Value types shared by every stage of the trait extraction pipeline.
//!
//! # Overview
//!
//! - **Unit**: the fixed length vocabulary and its millimetre factors
//! - **TraitKind**: which measurement a question set targets, and the
//!   canonical unit its values are normalized into
//! - **NormalizedMeasurement**: zero, one or two canonical values, or a
//!   sentinel describing why the answer could not be read
//! - **ResolvedValue**: the single scalar prediction, or "unresolved"
//!
//! # Example
//!
//! ```rust
//! use traitqa_units::{TraitKind, Unit};
//!
//! let factor = Unit::Centimeter.factor_to(TraitKind::Height.canonical_unit());
//! assert!((factor - 0.01).abs() < 1e-12);
//! assert_eq!(Unit::detect("20-37 cm"), Some(Unit::Centimeter));
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod measurement;
pub mod number;
pub mod trait_kind;
pub mod unit;

// Re-exports
pub use error::{NumberError, SymbolError};
pub use measurement::{NormalizedMeasurement, ResolvedValue, UNRESOLVED_SENTINEL};
pub use number::{format_number, parse_number, round_to};
pub use trait_kind::TraitKind;
pub use unit::Unit;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for measurement handling
    pub use crate::{
        NormalizedMeasurement, NumberError, ResolvedValue, SymbolError, TraitKind, Unit,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
