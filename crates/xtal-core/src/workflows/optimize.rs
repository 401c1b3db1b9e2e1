use crate::core::models::cocktail::{Cocktail, DistanceWeights};
use crate::core::models::menu::CocktailMenu;
use crate::core::units::value::SignedValue;
use crate::engine::config::{ConfigError, GridConfigBuilder};
use crate::engine::error::GridError;
use crate::engine::grid::{self, ScreeningGrid};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum OptimizeError {
    /// The requested axis reagent is not part of the cocktail.
    #[error("Cocktail has no reagent named '{name}'")]
    UnknownReagent { name: String },

    /// The axis reagent has no stock concentration and none was supplied.
    #[error("No stock concentration available for axis reagent '{name}'")]
    MissingStockConcentration { name: String },

    /// The requested plate well is not occupied in the menu.
    #[error("Menu has no cocktail in well {well}")]
    UnknownWell { well: u32 },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// What to vary, and how, when designing an optimization screen around a
/// cocktail.
///
/// Stock concentrations default to the ones carried by the cocktail's
/// reagents; `x_stock`/`y_stock` override them for this request only.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationSpec {
    pub x_reagent: String,
    pub y_reagent: String,
    pub x_wells: usize,
    pub y_wells: usize,
    pub x_step: SignedValue,
    pub y_step: SignedValue,
    pub well_volume: SignedValue,
    pub x_stock: Option<SignedValue>,
    pub y_stock: Option<SignedValue>,
}

/// Designs a two-axis concentration gradient around a hit cocktail.
///
/// The two named reagents become the free axes; every other reagent of the
/// cocktail that carries a stock concentration is included as a constant at
/// its menu concentration. Reagents without a stock concentration cannot be
/// pipetted and are skipped with a warning.
///
/// # Errors
///
/// Fails when an axis name is absent from the cocktail, when no stock
/// concentration can be resolved for an axis, or when the grid engine
/// rejects the assembled configuration.
pub fn design_grid(
    cocktail: &Cocktail,
    spec: &OptimizationSpec,
) -> Result<ScreeningGrid, OptimizeError> {
    let x_reagent = cocktail
        .reagent(&spec.x_reagent)
        .ok_or_else(|| OptimizeError::UnknownReagent {
            name: spec.x_reagent.clone(),
        })?
        .clone();
    let y_reagent = cocktail
        .reagent(&spec.y_reagent)
        .ok_or_else(|| OptimizeError::UnknownReagent {
            name: spec.y_reagent.clone(),
        })?
        .clone();

    let x_stock = spec
        .x_stock
        .or(x_reagent.stock_concentration)
        .ok_or_else(|| OptimizeError::MissingStockConcentration {
            name: x_reagent.name.clone(),
        })?;
    let y_stock = spec
        .y_stock
        .or(y_reagent.stock_concentration)
        .ok_or_else(|| OptimizeError::MissingStockConcentration {
            name: y_reagent.name.clone(),
        })?;

    let mut builder = GridConfigBuilder::new()
        .x_reagent(x_reagent)
        .x_wells(spec.x_wells)
        .x_step(spec.x_step)
        .x_stock(x_stock)
        .y_reagent(y_reagent)
        .y_wells(spec.y_wells)
        .y_step(spec.y_step)
        .y_stock(y_stock)
        .well_volume(spec.well_volume);

    for reagent in cocktail.reagents() {
        if reagent.name == spec.x_reagent || reagent.name == spec.y_reagent {
            continue;
        }
        if reagent.stock_concentration.is_none() {
            warn!(
                "Skipping constant reagent '{}': no stock concentration",
                reagent.name
            );
            continue;
        }
        builder = builder.constant(reagent.clone());
    }

    let config = builder.build()?;
    info!(
        "Designing optimization screen: '{}' x '{}'",
        spec.x_reagent, spec.y_reagent
    );
    Ok(grid::generate(&config)?)
}

/// One entry of a similarity ranking: another occupied well, its cocktail's
/// menu identifier, and the chemical distance to the reference cocktail.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarCocktail {
    pub well: u32,
    pub number: Option<String>,
    pub distance: f64,
}

/// Ranks every other cocktail of the menu by chemical distance to the one in
/// `well`, most similar first.
///
/// # Errors
///
/// Returns [`OptimizeError::UnknownWell`] when `well` is not occupied.
pub fn rank_similar(
    menu: &CocktailMenu,
    well: u32,
    weights: &DistanceWeights,
) -> Result<Vec<SimilarCocktail>, OptimizeError> {
    if menu.get(well).is_none() {
        return Err(OptimizeError::UnknownWell { well });
    }
    Ok(menu
        .rank_similar(well, weights)
        .into_iter()
        .map(|(other, distance)| SimilarCocktail {
            well: other,
            number: menu.get(other).and_then(|c| c.number.clone()),
            distance,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::reagent::Reagent;

    fn value(text: &str) -> SignedValue {
        SignedValue::parse(text).unwrap()
    }

    fn hit_cocktail() -> Cocktail {
        let mut cocktail = Cocktail::with_number("13_C0042");
        cocktail
            .add_reagent(
                Reagent::new("Sodium chloride", value("100 mM"))
                    .with_stock_concentration(value("5 M")),
            )
            .unwrap();
        cocktail
            .add_reagent(
                Reagent::new("PEG 3350", value("25 % w/v"))
                    .with_stock_concentration(value("50 % w/v")),
            )
            .unwrap();
        cocktail
            .add_reagent(
                Reagent::new("Tris", value("50 mM")).with_stock_concentration(value("1 M")),
            )
            .unwrap();
        cocktail
            .add_reagent(Reagent::new("mystery additive", value("1 % v/v")))
            .unwrap();
        cocktail
    }

    fn spec() -> OptimizationSpec {
        OptimizationSpec {
            x_reagent: "Sodium chloride".to_string(),
            y_reagent: "PEG 3350".to_string(),
            x_wells: 6,
            y_wells: 4,
            x_step: value("+20 mM"),
            y_step: value("-2 % w/v"),
            well_volume: value("200 uL"),
            x_stock: None,
            y_stock: None,
        }
    }

    #[test]
    fn designs_a_complete_grid_around_the_cocktail() {
        let grid = design_grid(&hit_cocktail(), &spec()).unwrap();
        assert_eq!(grid.x_wells(), 6);
        assert_eq!(grid.y_wells(), 4);
        assert_eq!(grid.cells().len(), 24);
        // Tris is carried as a constant; the stock-less additive is skipped.
        for (_, _, cell) in grid.iter() {
            if let crate::engine::grid::WellCell::Feasible(recipe) = cell {
                let names: Vec<&str> =
                    recipe.constants.iter().map(|c| c.name.as_str()).collect();
                assert_eq!(names, ["Tris"]);
            }
        }
    }

    #[test]
    fn unknown_axis_reagents_are_rejected() {
        let mut bad = spec();
        bad.x_reagent = "Imidazole".to_string();
        assert!(matches!(
            design_grid(&hit_cocktail(), &bad),
            Err(OptimizeError::UnknownReagent { .. })
        ));
    }

    #[test]
    fn axis_without_stock_concentration_is_rejected() {
        let mut cocktail = hit_cocktail();
        // Strip the stock from the x reagent.
        cocktail.replace_reagent(Reagent::new("Sodium chloride", value("100 mM")));
        assert!(matches!(
            design_grid(&cocktail, &spec()),
            Err(OptimizeError::MissingStockConcentration { .. })
        ));
    }

    #[test]
    fn similarity_ranking_spans_the_menu() {
        let mut menu = CocktailMenu::new();
        for (well, number, concentration) in [
            (1, "13_C0001", "100 mM"),
            (2, "13_C0002", "150 mM"),
            (3, "13_C0003", "900 mM"),
        ] {
            let mut cocktail = Cocktail::with_number(number);
            cocktail
                .add_reagent(Reagent::new("Sodium chloride", value(concentration)))
                .unwrap();
            cocktail.assign_well(well).unwrap();
            menu.insert(cocktail).unwrap();
        }

        let ranked = rank_similar(&menu, 1, &DistanceWeights::default()).unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].well, 2);
        assert_eq!(ranked[0].number.as_deref(), Some("13_C0002"));
        assert_eq!(ranked[1].well, 3);
        assert!(ranked[0].distance < ranked[1].distance);

        assert!(matches!(
            rank_similar(&menu, 99, &DistanceWeights::default()),
            Err(OptimizeError::UnknownWell { well: 99 })
        ));
    }

    #[test]
    fn stock_overrides_take_precedence() {
        let mut cocktail = hit_cocktail();
        cocktail.replace_reagent(Reagent::new("Sodium chloride", value("100 mM")));
        let mut with_override = spec();
        with_override.x_stock = Some(value("5 M"));
        assert!(design_grid(&cocktail, &with_override).is_ok());
    }
}
