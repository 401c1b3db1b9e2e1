use super::parse_quantity;
use crate::cli::GridArgs;
use crate::error::{CliError, Result};
use tracing::info;
use xtalgrid::core::io::menu::load_menu;
use xtalgrid::core::units::value::SignedValue;
use xtalgrid::engine::grid::{ScreeningGrid, WellCell};
use xtalgrid::workflows::optimize::{self, OptimizationSpec};
use xtalgrid::workflows::params::ChemistryParams;

pub fn run(args: GridArgs) -> Result<()> {
    let mut menu = load_menu(&args.menu)?;
    info!("Loaded {} cocktails from '{}'.", menu.len(), args.menu.display());

    if let Some(path) = &args.params {
        let params = ChemistryParams::load(path)?;
        let updated = params.apply_to_menu(&mut menu);
        info!("Applied parameter overrides to {} reagents.", updated);
    }

    let cocktail = menu.get(args.well).ok_or_else(|| {
        CliError::Argument(format!("Menu has no cocktail in well {}", args.well))
    })?;

    let spec = OptimizationSpec {
        x_reagent: args.x_reagent.clone(),
        y_reagent: args.y_reagent.clone(),
        x_wells: args.x_wells,
        y_wells: args.y_wells,
        x_step: parse_quantity(&args.x_step)?,
        y_step: parse_quantity(&args.y_step)?,
        well_volume: parse_quantity(&args.well_volume)?,
        x_stock: args.x_stock.as_deref().map(parse_quantity).transpose()?,
        y_stock: args.y_stock.as_deref().map(parse_quantity).transpose()?,
    };

    let grid = optimize::design_grid(cocktail, &spec)?;
    print_grid(&grid, &args);
    Ok(())
}

fn print_grid(grid: &ScreeningGrid, args: &GridArgs) {
    println!(
        "Optimization grid: '{}' (x, {} wells) vs '{}' (y, {} wells)",
        args.x_reagent,
        grid.x_wells(),
        args.y_reagent,
        grid.y_wells()
    );
    println!(
        "Feasible wells: {}/{}",
        grid.feasible_count(),
        grid.cells().len()
    );
    println!();

    for (x, y, cell) in grid.iter() {
        if x == 0 && y > 0 {
            println!();
        }
        let target_x = &grid.x_concentrations[x];
        let target_y = &grid.y_concentrations[y];
        match cell {
            WellCell::Feasible(recipe) => {
                println!("({}, {})  {} @ {}, {} @ {}", x, y, args.x_reagent, target_x, args.y_reagent, target_y);
                println!(
                    "        {}: {}   {}: {}",
                    recipe.x.name,
                    microlitres(&recipe.x.volume),
                    recipe.y.name,
                    microlitres(&recipe.y.volume)
                );
                for constant in &recipe.constants {
                    println!("        {}: {}", constant.name, microlitres(&constant.volume));
                }
                println!("        diluent: {}", microlitres(&recipe.diluent));
            }
            WellCell::Overflow {
                required_litres,
                capacity_litres,
            } => {
                println!(
                    "({}, {})  OVERFLOW: needs {:.1} uL, well holds {:.1} uL",
                    x,
                    y,
                    required_litres * 1e6,
                    capacity_litres * 1e6
                );
            }
        }
    }
}

/// Formats a litre-family volume in microlitres for bench use.
fn microlitres(volume: &SignedValue) -> String {
    match volume.with_prefix('u') {
        Ok(ul) => ul.round(2).to_string(),
        Err(_) => volume.to_string(),
    }
}
