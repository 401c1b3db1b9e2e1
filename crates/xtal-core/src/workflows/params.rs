use crate::core::models::cocktail::DistanceWeights;
use crate::core::models::menu::CocktailMenu;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ParamsLoadError {
    #[error("Failed to read parameter file '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML parameter file '{path}'")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Site-specific chemistry overrides, loaded from a TOML file.
///
/// Menus often name reagents that the built-in tables do not know; the
/// `molecular_weights` section maps reagent names (as they appear in the
/// menu) to weights in g/mol. The `distance` section tunes the similarity
/// metric. Every section is optional.
///
/// ```toml
/// [distance]
/// mismatch_penalty = 10.0
/// unresolved_penalty = 1.0
///
/// [molecular_weights]
/// "Jeffamine M-600" = 600.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChemistryParams {
    pub distance: DistanceWeights,
    pub molecular_weights: HashMap<String, f64>,
}

impl ChemistryParams {
    /// Loads parameters from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ParamsLoadError::Io`] when the file cannot be read and
    /// [`ParamsLoadError::Toml`] when its contents are not valid TOML for
    /// this schema.
    pub fn load(path: &Path) -> Result<Self, ParamsLoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| ParamsLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let params = toml::from_str(&content).map_err(|source| ParamsLoadError::Toml {
            path: path.display().to_string(),
            source,
        })?;
        Ok(params)
    }

    /// Applies the molecular-weight overrides to every matching reagent in
    /// the menu. Returns the number of reagents updated.
    pub fn apply_to_menu(&self, menu: &mut CocktailMenu) -> usize {
        let mut updated = 0;
        for (_, cocktail) in menu.iter_mut() {
            for (name, weight) in &self.molecular_weights {
                if cocktail.set_molecular_weight(name, *weight) {
                    updated += 1;
                }
            }
        }
        debug!("Applied molecular weight overrides to {} reagents", updated);
        updated
    }
}
