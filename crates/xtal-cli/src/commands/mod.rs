pub mod grid;
pub mod link;

use crate::error::{CliError, Result};
use xtalgrid::core::units::value::SignedValue;

/// Parses a user-supplied quantity string (e.g. `'+20 mM'`, `'200 uL'`).
pub(crate) fn parse_quantity(text: &str) -> Result<SignedValue> {
    SignedValue::parse(text)
        .map_err(|e| CliError::Argument(format!("'{}' is not a valid quantity: {}", text, e)))
}
