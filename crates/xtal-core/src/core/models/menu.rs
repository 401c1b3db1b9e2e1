use super::cocktail::{Cocktail, DistanceWeights};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised when assembling a cocktail menu.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MenuError {
    /// A cocktail without a well assignment cannot be placed in a menu.
    #[error("Cocktail has no well assignment")]
    UnassignedCocktail,

    /// Two cocktails claimed the same plate well.
    #[error("Well {well} is already occupied")]
    DuplicateWell { well: u32 },
}

/// The cocktail-to-well mapping for one screening plate.
///
/// Cocktails are keyed by their base-1 well number. Links between related
/// cocktails are expressed as well numbers back into this collection, never
/// as owning references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CocktailMenu {
    cocktails: BTreeMap<u32, Cocktail>,
}

impl CocktailMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a cocktail under its own well assignment.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::UnassignedCocktail`] when the cocktail carries no
    /// well assignment and [`MenuError::DuplicateWell`] when the well is
    /// already occupied.
    pub fn insert(&mut self, cocktail: Cocktail) -> Result<(), MenuError> {
        let well = cocktail
            .well_assignment()
            .ok_or(MenuError::UnassignedCocktail)?;
        if self.cocktails.contains_key(&well) {
            return Err(MenuError::DuplicateWell { well });
        }
        self.cocktails.insert(well, cocktail);
        Ok(())
    }

    pub fn get(&self, well: u32) -> Option<&Cocktail> {
        self.cocktails.get(&well)
    }

    pub fn get_mut(&mut self, well: u32) -> Option<&mut Cocktail> {
        self.cocktails.get_mut(&well)
    }

    pub fn len(&self) -> usize {
        self.cocktails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cocktails.is_empty()
    }

    /// Iterates over `(well, cocktail)` pairs in well order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Cocktail)> {
        self.cocktails.iter().map(|(well, cocktail)| (*well, cocktail))
    }

    /// Mutable variant of [`CocktailMenu::iter`].
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, &mut Cocktail)> {
        self.cocktails
            .iter_mut()
            .map(|(well, cocktail)| (*well, cocktail))
    }

    /// Ranks all other cocktails by chemical distance to the cocktail in
    /// `well`, most similar first. Returns an empty list for an unknown well.
    pub fn rank_similar(&self, well: u32, weights: &DistanceWeights) -> Vec<(u32, f64)> {
        let Some(reference) = self.get(well) else {
            return Vec::new();
        };
        let mut ranked: Vec<(u32, f64)> = self
            .cocktails
            .iter()
            .filter(|(other_well, _)| **other_well != well)
            .map(|(other_well, cocktail)| {
                (*other_well, reference.chemical_distance(cocktail, weights))
            })
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked
    }

    /// The single most similar other cocktail, when one exists.
    pub fn nearest(&self, well: u32, weights: &DistanceWeights) -> Option<(u32, f64)> {
        self.rank_similar(well, weights).into_iter().next()
    }
}
