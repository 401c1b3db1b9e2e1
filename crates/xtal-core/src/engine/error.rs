use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::reagent::ReagentError;
use crate::core::units::UnitError;

/// Fatal, structural errors of one grid generation call.
///
/// These reject a malformed configuration before any per-well computation;
/// overflow of an individual well is not an error but a cell-scoped marker
/// in the result matrix.
#[derive(Debug, Error)]
pub enum GridError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Axis reagents must be distinct, both are '{name}'")]
    DuplicateAxis { name: String },

    #[error("Grid extent for the {axis} axis must be positive")]
    EmptyAxis { axis: &'static str },

    #[error("Constant reagent '{name}' collides with an axis reagent")]
    ConstantCollision { name: String },

    #[error("Well volume must be a positive volume, got '{value}'")]
    InvalidWellVolume { value: String },

    #[error("No stock concentration configured for reagent '{name}'")]
    MissingStockConcentration { name: String },

    #[error("Stock concentration for '{name}' is not usable: {reason}")]
    InvalidStockConcentration { name: String, reason: String },

    #[error("Reagent computation failed: {source}")]
    Reagent {
        #[from]
        source: ReagentError,
    },

    #[error("Unit conversion failed: {source}")]
    Unit {
        #[from]
        source: UnitError,
    },
}
