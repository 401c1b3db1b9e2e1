use super::formula::resolve_molecular_weight;
use crate::core::units::table::{Unit, UnitFamily};
use crate::core::units::value::SignedValue;
use crate::core::units::UnitError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Assumed solvent density used when converting percent-by-mass
/// concentrations to molarity, in g/mL.
///
/// Screening menus do not carry solute densities, so the conversion treats
/// the solution as water at 1 g/mL. The resulting molarity is an explicit
/// approximation, not exact chemistry.
pub const SOLVENT_DENSITY_G_PER_ML: f64 = 1.0;

/// Errors raised by reagent-level chemistry operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReagentError {
    /// Molarity was requested for a percent-based concentration without a
    /// resolvable molecular weight.
    #[error("Missing molecular weight for reagent '{name}'")]
    MissingMolecularWeight { name: String },

    /// A stock concentration was zero or negative where a dilution requires
    /// a positive one.
    #[error("Non-positive stock concentration for reagent '{name}'")]
    NonPositiveStockConcentration { name: String },

    #[error(transparent)]
    Unit(#[from] UnitError),
}

/// A named chemical species at a specific concentration.
///
/// Reagents are immutable value objects: operations that change the
/// concentration (e.g. during grid generation) create a new `Reagent` via
/// [`Reagent::with_concentration`] rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reagent {
    /// Name of the chemical species (e.g. `"Ammonium sulfate"`).
    pub name: String,
    /// Raw chemical-formula string, when the menu provides one.
    pub formula: Option<String>,
    /// Concentration of this reagent in the cocktail.
    pub concentration: SignedValue,
    /// Molecular weight in g/mol, resolved from the formula or name, or
    /// supplied directly.
    pub molecular_weight: Option<f64>,
    /// Concentration of the undiluted source solution, when known.
    pub stock_concentration: Option<SignedValue>,
}

impl Reagent {
    /// Creates a reagent, resolving the molecular weight from the name when
    /// possible (PEG species and named compounds).
    pub fn new(name: &str, concentration: SignedValue) -> Self {
        Self {
            name: name.to_string(),
            formula: None,
            concentration,
            molecular_weight: resolve_molecular_weight(name, None),
            stock_concentration: None,
        }
    }

    /// Attaches a formula string and re-resolves the molecular weight from
    /// it (an explicit numeric hint in the formula wins over a name lookup).
    pub fn with_formula(mut self, formula: &str) -> Self {
        self.molecular_weight = resolve_molecular_weight(&self.name, Some(formula))
            .or(self.molecular_weight);
        self.formula = Some(formula.to_string());
        self
    }

    /// Supplies a molecular weight directly, overriding any resolved one.
    pub fn with_molecular_weight(mut self, weight: f64) -> Self {
        self.molecular_weight = Some(weight);
        self
    }

    /// Sets the stock concentration of this reagent's source solution.
    pub fn with_stock_concentration(mut self, stock: SignedValue) -> Self {
        self.stock_concentration = Some(stock);
        self
    }

    /// Returns a copy of this reagent at a different concentration.
    pub fn with_concentration(&self, concentration: SignedValue) -> Self {
        Self {
            concentration,
            ..self.clone()
        }
    }

    /// Computes the molarity of this reagent at its current concentration.
    ///
    /// Concentrations already in the molar family are converted to base
    /// (molar). Percent-based concentrations require a molecular weight and
    /// use the documented water-density approximation:
    /// `M = percent * 10 * density / molecular_weight`.
    ///
    /// # Errors
    ///
    /// Returns [`ReagentError::MissingMolecularWeight`] for percent
    /// concentrations without a resolvable weight, and
    /// [`UnitError::IncompatibleUnit`] for families that have no molar
    /// interpretation (pH, volume).
    pub fn molarity(&self) -> Result<SignedValue, ReagentError> {
        let base = self.concentration.to_base();
        match base.family() {
            UnitFamily::Concentration => Ok(base),
            UnitFamily::Percent => {
                let weight = self.molecular_weight.filter(|w| *w > 0.0).ok_or_else(|| {
                    ReagentError::MissingMolecularWeight {
                        name: self.name.clone(),
                    }
                })?;
                // % w/v is g of solute per 100 mL of solution; 10x converts
                // to g/L, and dividing by g/mol yields mol/L.
                let molar =
                    base.signed_magnitude() * 10.0 * SOLVENT_DENSITY_G_PER_ML / weight;
                Ok(SignedValue::from_signed(molar, molar_unit()))
            }
            family => Err(ReagentError::Unit(UnitError::IncompatibleUnit {
                from: family,
                to: UnitFamily::Concentration,
            })),
        }
    }

    /// Computes the volume of stock solution needed to reach
    /// `target_concentration` in `well_volume`, by the dilution law
    /// `v = target * well_volume / stock`, evaluated in base units. The
    /// result is in litres.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError::UnitMismatch`] when target and stock are not
    /// unit-family-compatible after conversion to base,
    /// [`UnitError::IncompatibleUnit`] when `well_volume` is not a volume,
    /// and [`ReagentError::NonPositiveStockConcentration`] for a zero or
    /// negative stock.
    pub fn stock_volume(
        &self,
        target_concentration: &SignedValue,
        well_volume: &SignedValue,
        stock_concentration: &SignedValue,
    ) -> Result<SignedValue, ReagentError> {
        let target = target_concentration.to_base();
        let stock = stock_concentration.to_base();
        let well = well_volume.to_base();

        if target.family() != stock.family() {
            return Err(ReagentError::Unit(UnitError::UnitMismatch {
                expected: target.family(),
                found: stock.family(),
            }));
        }
        if well.family() != UnitFamily::Volume {
            return Err(ReagentError::Unit(UnitError::IncompatibleUnit {
                from: well.family(),
                to: UnitFamily::Volume,
            }));
        }
        if stock.signed_magnitude() <= 0.0 {
            return Err(ReagentError::NonPositiveStockConcentration {
                name: self.name.clone(),
            });
        }

        let litres =
            target.signed_magnitude() * well.signed_magnitude() / stock.signed_magnitude();
        Ok(SignedValue::from_signed(litres, litre_unit()))
    }
}

pub(crate) fn molar_unit() -> Unit {
    // "M" is a table entry; lookup cannot fail.
    Unit::parse("M").unwrap_or_else(|_| unreachable!("molar base unit is always in the table"))
}

pub(crate) fn litre_unit() -> Unit {
    Unit::parse("L").unwrap_or_else(|_| unreachable!("litre base unit is always in the table"))
}
