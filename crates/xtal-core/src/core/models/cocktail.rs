use super::reagent::Reagent;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised by cocktail construction and plate assignment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CocktailError {
    /// A reagent with the same name is already present in the cocktail.
    #[error("Duplicate reagent '{name}' in cocktail")]
    DuplicateReagent { name: String },

    /// The cocktail already has a well assignment.
    #[error("Cocktail already assigned to well {well}")]
    AlreadyAssigned { well: u32 },
}

/// Tunable weighting of the cocktail similarity metric.
///
/// `mismatch_penalty` is charged once per reagent name present in exactly one
/// of the two cocktails; `unresolved_penalty` replaces the squared molarity
/// difference for a shared reagent whose molarity cannot be resolved on
/// either side. The default mismatch penalty dominates any realistic matched
/// concentration difference, so structurally different cocktails are never
/// closer than near-identical ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceWeights {
    pub mismatch_penalty: f64,
    pub unresolved_penalty: f64,
}

impl Default for DistanceWeights {
    fn default() -> Self {
        Self {
            mismatch_penalty: 10.0,
            unresolved_penalty: 1.0,
        }
    }
}

/// An ordered collection of reagents forming one screening condition.
///
/// Reagent names are unique within a cocktail and insertion order is
/// preserved. The well assignment is set at most once per instance;
/// re-assignment requires [`Cocktail::clear_well`] first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cocktail {
    /// Menu identifier of this cocktail (e.g. `"13_C0001"`).
    pub number: Option<String>,
    /// Commercial catalogue code, when the menu provides one.
    pub commercial_code: Option<String>,
    /// Overall pH of the cocktail.
    pub ph: Option<f64>,
    reagents: Vec<Reagent>,
    well_assignment: Option<u32>,
}

impl Cocktail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cocktail with a menu identifier.
    pub fn with_number(number: &str) -> Self {
        Self {
            number: Some(number.to_string()),
            ..Self::default()
        }
    }

    /// Extracts the cocktail index from the menu identifier.
    ///
    /// Menu numbers follow the `<menu>_C<index>` convention
    /// (`"13_C0001"` has index 1); a bare integer is accepted as well.
    pub fn cocktail_index(&self) -> Option<u32> {
        let number = self.number.as_deref()?;
        let tail = number.rsplit("_C").next()?;
        tail.trim_start_matches('0').parse().ok().or_else(|| {
            // An all-zero tail trims to the empty string.
            if !tail.is_empty() && tail.chars().all(|c| c == '0') {
                Some(0)
            } else {
                None
            }
        })
    }

    /// Appends a reagent.
    ///
    /// # Errors
    ///
    /// Returns [`CocktailError::DuplicateReagent`] when a reagent of the same
    /// name is already present; nothing is ever overwritten silently.
    pub fn add_reagent(&mut self, reagent: Reagent) -> Result<(), CocktailError> {
        if self.reagent(&reagent.name).is_some() {
            return Err(CocktailError::DuplicateReagent {
                name: reagent.name.clone(),
            });
        }
        self.reagents.push(reagent);
        Ok(())
    }

    /// Looks up a reagent by name.
    pub fn reagent(&self, name: &str) -> Option<&Reagent> {
        self.reagents.iter().find(|r| r.name == name)
    }

    /// Replaces a reagent of the same name, returning the previous one.
    pub fn replace_reagent(&mut self, reagent: Reagent) -> Option<Reagent> {
        let slot = self.reagents.iter_mut().find(|r| r.name == reagent.name)?;
        Some(std::mem::replace(slot, reagent))
    }

    /// The reagents in insertion order.
    pub fn reagents(&self) -> &[Reagent] {
        &self.reagents
    }

    /// Overrides the molecular weight of the named reagent. Returns whether
    /// the reagent was present.
    pub fn set_molecular_weight(&mut self, name: &str, weight: f64) -> bool {
        match self.reagents.iter_mut().find(|r| r.name == name) {
            Some(reagent) => {
                reagent.molecular_weight = Some(weight);
                true
            }
            None => false,
        }
    }

    pub fn well_assignment(&self) -> Option<u32> {
        self.well_assignment
    }

    /// Assigns this cocktail to a plate well (base 1).
    ///
    /// # Errors
    ///
    /// Returns [`CocktailError::AlreadyAssigned`] on a second call; use
    /// [`Cocktail::clear_well`] to re-assign explicitly.
    pub fn assign_well(&mut self, well: u32) -> Result<(), CocktailError> {
        if let Some(existing) = self.well_assignment {
            return Err(CocktailError::AlreadyAssigned { well: existing });
        }
        self.well_assignment = Some(well);
        Ok(())
    }

    /// Clears the well assignment so the cocktail can be re-assigned.
    pub fn clear_well(&mut self) {
        self.well_assignment = None;
    }

    /// Computes the chemical distance to another cocktail; lower is more
    /// similar.
    ///
    /// For reagent names present in both cocktails the squared difference of
    /// base molarities is summed; a shared reagent whose molarity cannot be
    /// resolved contributes `weights.unresolved_penalty` unless both sides
    /// carry the identical base concentration. Each name present in exactly
    /// one cocktail adds `weights.mismatch_penalty`.
    ///
    /// The metric is symmetric and returns 0 only for cocktails with
    /// identical reagent sets and identical base-unit concentrations.
    pub fn chemical_distance(&self, other: &Cocktail, weights: &DistanceWeights) -> f64 {
        let mut distance = 0.0;
        let mut mismatches = 0usize;

        for reagent in &self.reagents {
            match other.reagent(&reagent.name) {
                Some(peer) => {
                    distance += match (reagent.molarity(), peer.molarity()) {
                        (Ok(a), Ok(b)) => {
                            let delta = a.signed_magnitude() - b.signed_magnitude();
                            delta * delta
                        }
                        // Unresolvable molarity is a penalty, not zero --
                        // unless the raw concentrations are identical.
                        _ => {
                            let a = reagent.concentration.to_base();
                            let b = peer.concentration.to_base();
                            if a == b {
                                0.0
                            } else {
                                weights.unresolved_penalty
                            }
                        }
                    };
                }
                None => mismatches += 1,
            }
        }
        mismatches += other
            .reagents
            .iter()
            .filter(|r| self.reagent(&r.name).is_none())
            .count();

        distance + weights.mismatch_penalty * mismatches as f64
    }
}

impl fmt::Display for Cocktail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.number {
            Some(number) => writeln!(f, "Cocktail {}", number)?,
            None => writeln!(f, "Cocktail")?,
        }
        if let Some(ph) = self.ph {
            writeln!(f, "pH: {}", ph)?;
        }
        for reagent in &self.reagents {
            writeln!(f, "{} {}", reagent.name, reagent.concentration)?;
        }
        Ok(())
    }
}
