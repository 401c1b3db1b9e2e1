use super::config::{AxisSpec, GridConfig};
use super::error::GridError;
use crate::core::models::reagent::{Reagent, litre_unit};
use crate::core::units::UnitError;
use crate::core::units::table::UnitFamily;
use crate::core::units::value::SignedValue;
use serde::Serialize;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One reagent's contribution to a single well: its target concentration and
/// the stock volume (litres) that realizes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReagentVolume {
    pub name: String,
    pub concentration: SignedValue,
    pub volume: SignedValue,
}

/// The full volume breakdown of one feasible well. All reagent volumes plus
/// the diluent sum to the configured well volume exactly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellRecipe {
    pub x: ReagentVolume,
    pub y: ReagentVolume,
    pub constants: Vec<ReagentVolume>,
    /// Residual volume of diluent (water); never negative.
    pub diluent: SignedValue,
}

/// One cell of the screening grid: either a realizable volume breakdown or
/// an infeasibility marker. Overflow is cell-scoped and never aborts the
/// surrounding generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WellCell {
    Feasible(WellRecipe),
    Overflow {
        /// Total reagent volume the cell would need, in litres.
        required_litres: f64,
        /// Configured well capacity, in litres.
        capacity_litres: f64,
    },
}

impl WellCell {
    pub fn is_feasible(&self) -> bool {
        matches!(self, WellCell::Feasible(_))
    }
}

/// The immutable result of one grid generation call: a complete
/// `x_wells x y_wells` matrix of well records in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningGrid {
    x_wells: usize,
    y_wells: usize,
    /// Per-column target concentrations of the x reagent, in base units.
    pub x_concentrations: Vec<SignedValue>,
    /// Per-row target concentrations of the y reagent, in base units.
    pub y_concentrations: Vec<SignedValue>,
    cells: Vec<WellCell>,
}

impl ScreeningGrid {
    pub fn x_wells(&self) -> usize {
        self.x_wells
    }

    pub fn y_wells(&self) -> usize {
        self.y_wells
    }

    /// The cell at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics when the coordinates are outside the grid extent.
    pub fn well(&self, x: usize, y: usize) -> &WellCell {
        assert!(x < self.x_wells && y < self.y_wells, "well out of range");
        &self.cells[y * self.x_wells + x]
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[WellCell] {
        &self.cells
    }

    /// Iterates cells with their `(x, y)` coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &WellCell)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, cell)| (index % self.x_wells, index / self.x_wells, cell))
    }

    pub fn feasible_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_feasible()).count()
    }
}

/// Generates a screening grid from a validated configuration.
///
/// Structural problems (indistinct axes, empty extents, colliding or
/// stock-less constants, a non-volume well capacity, unusable stocks) are
/// fatal and reported before any computation. A well whose required reagent
/// volumes exceed the well capacity becomes a [`WellCell::Overflow`] marker
/// while its siblings are still computed; the caller decides whether an
/// all-infeasible grid is itself a hard failure.
pub fn generate(config: &GridConfig) -> Result<ScreeningGrid, GridError> {
    validate(config)?;

    info!(
        "Generating {}x{} screening grid: x='{}', y='{}', {} constant reagent(s)",
        config.x.wells,
        config.y.wells,
        config.x.reagent.name,
        config.y.reagent.name,
        config.constants.len()
    );

    let x_concentrations = gradient(&config.x);
    let y_concentrations = gradient(&config.y);

    // Stock volumes depend only on the axis index, so each axis is computed
    // once and shared across its row or column.
    let x_volumes = axis_volumes(&config.x, &x_concentrations, &config.well_volume)?;
    let y_volumes = axis_volumes(&config.y, &y_concentrations, &config.well_volume)?;

    let constants = constant_volumes(config)?;
    let constant_total: f64 = constants
        .iter()
        .map(|c| c.volume.signed_magnitude())
        .sum();
    let capacity_litres = config.well_volume.to_base().signed_magnitude();

    let compute_cell = |x: usize, y: usize| -> WellCell {
        let required_litres =
            x_volumes[x].signed_magnitude() + y_volumes[y].signed_magnitude() + constant_total;
        if required_litres > capacity_litres {
            return WellCell::Overflow {
                required_litres,
                capacity_litres,
            };
        }
        WellCell::Feasible(WellRecipe {
            x: ReagentVolume {
                name: config.x.reagent.name.clone(),
                concentration: x_concentrations[x],
                volume: x_volumes[x],
            },
            y: ReagentVolume {
                name: config.y.reagent.name.clone(),
                concentration: y_concentrations[y],
                volume: y_volumes[y],
            },
            constants: constants.clone(),
            diluent: SignedValue::new(capacity_litres - required_litres, litre_unit()),
        })
    };

    #[cfg(feature = "parallel")]
    let cells: Vec<WellCell> = (0..config.y.wells)
        .into_par_iter()
        .flat_map_iter(|y| (0..config.x.wells).map(move |x| compute_cell(x, y)))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let cells: Vec<WellCell> = (0..config.y.wells)
        .flat_map(|y| (0..config.x.wells).map(move |x| compute_cell(x, y)))
        .collect();

    let grid = ScreeningGrid {
        x_wells: config.x.wells,
        y_wells: config.y.wells,
        x_concentrations,
        y_concentrations,
        cells,
    };
    debug!(
        "Grid complete: {}/{} wells feasible",
        grid.feasible_count(),
        grid.cells.len()
    );
    Ok(grid)
}

fn validate(config: &GridConfig) -> Result<(), GridError> {
    if config.x.reagent.name == config.y.reagent.name {
        return Err(GridError::DuplicateAxis {
            name: config.x.reagent.name.clone(),
        });
    }
    if config.x.wells == 0 {
        return Err(GridError::EmptyAxis { axis: "x" });
    }
    if config.y.wells == 0 {
        return Err(GridError::EmptyAxis { axis: "y" });
    }

    let well = config.well_volume.to_base();
    if well.family() != UnitFamily::Volume || well.signed_magnitude() <= 0.0 {
        return Err(GridError::InvalidWellVolume {
            value: config.well_volume.to_string(),
        });
    }

    validate_axis(&config.x)?;
    validate_axis(&config.y)?;

    let mut seen = Vec::with_capacity(config.constants.len());
    for constant in &config.constants {
        if constant.name == config.x.reagent.name
            || constant.name == config.y.reagent.name
            || seen.contains(&constant.name.as_str())
        {
            return Err(GridError::ConstantCollision {
                name: constant.name.clone(),
            });
        }
        seen.push(constant.name.as_str());

        let stock = constant.stock_concentration.as_ref().ok_or_else(|| {
            GridError::MissingStockConcentration {
                name: constant.name.clone(),
            }
        })?;
        validate_stock(&constant.name, &constant.concentration, stock)?;
    }
    Ok(())
}

fn validate_axis(axis: &AxisSpec) -> Result<(), GridError> {
    let family = axis.reagent.concentration.family();
    if axis.step.family() != family {
        return Err(GridError::Unit {
            source: UnitError::UnitMismatch {
                expected: family,
                found: axis.step.family(),
            },
        });
    }
    validate_stock(&axis.reagent.name, &axis.reagent.concentration, &axis.stock)
}

fn validate_stock(
    name: &str,
    concentration: &SignedValue,
    stock: &SignedValue,
) -> Result<(), GridError> {
    if stock.family() != concentration.family() {
        return Err(GridError::InvalidStockConcentration {
            name: name.to_string(),
            reason: format!(
                "family {:?} does not match concentration family {:?}",
                stock.family(),
                concentration.family()
            ),
        });
    }
    if stock.to_base().signed_magnitude() <= 0.0 {
        return Err(GridError::InvalidStockConcentration {
            name: name.to_string(),
            reason: "must be positive".to_string(),
        });
    }
    Ok(())
}

/// Arithmetic concentration sequence `start + i * step` in base units.
///
/// A step that would drive a concentration below zero floors at zero: a well
/// simply receives none of that reagent.
fn gradient(axis: &AxisSpec) -> Vec<SignedValue> {
    let start = axis.reagent.concentration.to_base();
    let step = axis.step.to_base();
    (0..axis.wells)
        .map(|i| {
            let target = start.signed_magnitude() + i as f64 * step.signed_magnitude();
            SignedValue::new(target.max(0.0), start.unit())
        })
        .collect()
}

fn axis_volumes(
    axis: &AxisSpec,
    targets: &[SignedValue],
    well_volume: &SignedValue,
) -> Result<Vec<SignedValue>, GridError> {
    targets
        .iter()
        .map(|target| {
            axis.reagent
                .stock_volume(target, well_volume, &axis.stock)
                .map_err(GridError::from)
        })
        .collect()
}

fn constant_volumes(config: &GridConfig) -> Result<Vec<ReagentVolume>, GridError> {
    config
        .constants
        .iter()
        .map(|constant: &Reagent| {
            // Presence was checked during validation.
            let stock = constant.stock_concentration.as_ref().ok_or_else(|| {
                GridError::MissingStockConcentration {
                    name: constant.name.clone(),
                }
            })?;
            let volume = constant.stock_volume(
                &constant.concentration,
                &config.well_volume,
                stock,
            )?;
            Ok(ReagentVolume {
                name: constant.name.clone(),
                concentration: constant.concentration,
                volume,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::GridConfigBuilder;

    fn value(text: &str) -> SignedValue {
        SignedValue::parse(text).unwrap()
    }

    fn base_config() -> GridConfigBuilder {
        GridConfigBuilder::new()
            .x_reagent(Reagent::new("Sodium chloride", value("10 mM")))
            .x_wells(4)
            .x_step(value("+5 mM"))
            .x_stock(value("1 M"))
            .y_reagent(Reagent::new("Magnesium chloride", value("50 mM")))
            .y_wells(3)
            .y_step(value("+10 mM"))
            .y_stock(value("1 M"))
            .well_volume(value("100 uL"))
    }

    #[test]
    fn gradient_produces_increasing_x_concentrations() {
        let config = base_config().build().unwrap();
        let grid = generate(&config).unwrap();

        let expected_molar = [0.010, 0.015, 0.020, 0.025];
        assert_eq!(grid.x_concentrations.len(), 4);
        for (concentration, expected) in grid.x_concentrations.iter().zip(expected_molar) {
            assert_eq!(concentration.unit().token(), "M");
            assert!((concentration.signed_magnitude() - expected).abs() < 1e-12);
        }
        // The stated stock and well volume keep every well feasible.
        assert_eq!(grid.feasible_count(), 12);
    }

    #[test]
    fn grid_is_always_complete() {
        let config = base_config().build().unwrap();
        let grid = generate(&config).unwrap();
        assert_eq!(grid.cells().len(), grid.x_wells() * grid.y_wells());
        assert_eq!(grid.x_wells(), 4);
        assert_eq!(grid.y_wells(), 3);
    }

    #[test]
    fn feasible_wells_balance_to_the_well_volume_exactly() {
        let config = base_config().build().unwrap();
        let grid = generate(&config).unwrap();

        let capacity = 100e-6;
        for (_, _, cell) in grid.iter() {
            let WellCell::Feasible(recipe) = cell else {
                panic!("expected all wells feasible");
            };
            let total = recipe.x.volume.signed_magnitude()
                + recipe.y.volume.signed_magnitude()
                + recipe
                    .constants
                    .iter()
                    .map(|c| c.volume.signed_magnitude())
                    .sum::<f64>()
                + recipe.diluent.signed_magnitude();
            assert!((total - capacity).abs() < 1e-15);
            assert!(recipe.diluent.signed_magnitude() >= 0.0);
        }
    }

    #[test]
    fn overflow_is_cell_scoped_not_fatal() {
        // A weak stock makes high-target columns overflow while the first
        // column stays realizable.
        let config = base_config()
            .x_reagent(Reagent::new("Sodium chloride", value("10 mM")))
            .x_step(value("+30 mM"))
            .x_stock(value("20 mM"))
            .build()
            .unwrap();
        let grid = generate(&config).unwrap();

        assert_eq!(grid.cells().len(), 12);
        assert!(grid.well(0, 0).is_feasible());
        assert!(!grid.well(1, 0).is_feasible());
        match grid.well(1, 0) {
            WellCell::Overflow {
                required_litres,
                capacity_litres,
            } => {
                assert!(required_litres > capacity_litres);
            }
            WellCell::Feasible(_) => panic!("expected overflow"),
        }
    }

    #[test]
    fn constant_reagents_are_applied_uniformly() {
        let config = base_config()
            .constant(
                Reagent::new("Tris", value("50 mM"))
                    .with_stock_concentration(value("1 M")),
            )
            .build()
            .unwrap();
        let grid = generate(&config).unwrap();

        for (_, _, cell) in grid.iter() {
            let WellCell::Feasible(recipe) = cell else {
                panic!("expected feasible well");
            };
            assert_eq!(recipe.constants.len(), 1);
            assert_eq!(recipe.constants[0].name, "Tris");
            // 0.05 M * 1e-4 L / 1 M = 5 uL in every well.
            assert!((recipe.constants[0].volume.signed_magnitude() - 5e-6).abs() < 1e-15);
        }
    }

    #[test]
    fn negative_gradient_floors_at_zero() {
        let config = base_config()
            .x_reagent(Reagent::new("Sodium chloride", value("10 mM")))
            .x_step(value("-6 mM"))
            .x_wells(3)
            .build()
            .unwrap();
        let grid = generate(&config).unwrap();
        let magnitudes: Vec<f64> = grid
            .x_concentrations
            .iter()
            .map(|c| c.signed_magnitude())
            .collect();
        assert!((magnitudes[0] - 0.010).abs() < 1e-12);
        assert!((magnitudes[1] - 0.004).abs() < 1e-12);
        assert_eq!(magnitudes[2], 0.0);
    }

    #[test]
    fn duplicate_axis_reagents_are_rejected() {
        let config = base_config()
            .y_reagent(Reagent::new("Sodium chloride", value("50 mM")))
            .build()
            .unwrap();
        assert!(matches!(
            generate(&config),
            Err(GridError::DuplicateAxis { .. })
        ));
    }

    #[test]
    fn zero_extents_are_rejected() {
        let config = base_config().x_wells(0).build().unwrap();
        assert!(matches!(
            generate(&config),
            Err(GridError::EmptyAxis { axis: "x" })
        ));
    }

    #[test]
    fn constant_collisions_are_rejected() {
        let config = base_config()
            .constant(
                Reagent::new("Sodium chloride", value("10 mM"))
                    .with_stock_concentration(value("1 M")),
            )
            .build()
            .unwrap();
        assert!(matches!(
            generate(&config),
            Err(GridError::ConstantCollision { .. })
        ));
    }

    #[test]
    fn constants_require_a_stock_concentration() {
        let config = base_config()
            .constant(Reagent::new("Tris", value("50 mM")))
            .build()
            .unwrap();
        assert!(matches!(
            generate(&config),
            Err(GridError::MissingStockConcentration { .. })
        ));
    }

    #[test]
    fn non_volume_well_capacity_is_rejected() {
        let config = base_config().well_volume(value("100 mM")).build().unwrap();
        assert!(matches!(
            generate(&config),
            Err(GridError::InvalidWellVolume { .. })
        ));

        let config = base_config().well_volume(value("0 uL")).build().unwrap();
        assert!(matches!(
            generate(&config),
            Err(GridError::InvalidWellVolume { .. })
        ));
    }

    #[test]
    fn unusable_stock_concentrations_are_rejected() {
        let config = base_config().x_stock(value("0 M")).build().unwrap();
        assert!(matches!(
            generate(&config),
            Err(GridError::InvalidStockConcentration { .. })
        ));

        let config = base_config().x_stock(value("25 % w/v")).build().unwrap();
        assert!(matches!(
            generate(&config),
            Err(GridError::InvalidStockConcentration { .. })
        ));
    }

    #[test]
    fn mismatched_step_family_is_rejected() {
        let config = base_config().x_step(value("+5 % w/v")).build().unwrap();
        assert!(matches!(
            generate(&config),
            Err(GridError::Unit {
                source: UnitError::UnitMismatch { .. }
            })
        ));
    }
}
