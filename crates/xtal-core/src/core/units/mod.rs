//! # Units Module
//!
//! This module defines the process-wide unit table and the signed,
//! unit-tagged quantity type used throughout the library.
//!
//! - [`table`] - Static mapping from unit token to scale factor and unit
//!   family, initialized at compile time and never mutated
//! - [`value`] - `SignedValue`, a parsed quantity with conversion, scaling,
//!   rounding, and formatting operations

pub mod table;
pub mod value;

use thiserror::Error;

use table::UnitFamily;

/// Errors raised by unit parsing, conversion, and arithmetic.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UnitError {
    /// The numeric prefix of a quantity string could not be parsed.
    #[error("Malformed numeric value in '{input}'")]
    MalformedValue { input: String },

    /// The unit token is not present in the unit table.
    #[error("Unparsable unit token '{token}'")]
    UnparsableUnit { token: String },

    /// Conversion between units of different families was attempted.
    #[error("Incompatible unit families: {from:?} and {to:?}")]
    IncompatibleUnit { from: UnitFamily, to: UnitFamily },

    /// Two quantities that must share a unit family do not.
    #[error("Unit family mismatch: expected {expected:?}, found {found:?}")]
    UnitMismatch {
        expected: UnitFamily,
        found: UnitFamily,
    },

    /// A scale factor was negative or non-finite. Scaling never flips sign.
    #[error("Invalid scale factor {factor}")]
    InvalidScaleFactor { factor: f64 },
}
