use crate::core::models::cocktail::Cocktail;
use crate::core::models::menu::{CocktailMenu, MenuError};
use crate::core::models::reagent::Reagent;
use crate::core::units::UnitError;
use crate::core::units::value::SignedValue;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use MenuLoadError::{Csv, Io, Quantity, Row};

// Fixed column layout of screening menu csv files. One chemical formula is
// recorded per cocktail row no matter how many reagents the row lists; the
// remaining columns are (name, concentration) pairs.
const WELL_COLUMN: usize = 0;
const NUMBER_COLUMN: usize = 1;
const COMMERCIAL_CODE_COLUMN: usize = 2;
const FORMULA_COLUMN: usize = 4;
const PH_COLUMN: usize = 8;
const HEADER_ROWS: usize = 2;

#[derive(Debug, Error)]
pub enum MenuLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },

    #[error("Bad quantity in '{path}' record {record}: {source}")]
    Quantity {
        path: String,
        record: usize,
        source: UnitError,
    },

    #[error("Bad record {record} in '{path}': {message}")]
    Row {
        path: String,
        record: usize,
        message: String,
    },

    #[error(transparent)]
    Menu(#[from] MenuError),
}

/// Reads a cocktail menu csv file into a [`CocktailMenu`].
///
/// The first two lines of menu files are headers and are skipped. Each
/// remaining record becomes one [`Cocktail`] keyed by its well assignment
/// (base 1). Empty reagent cells are skipped; malformed quantities are hard
/// errors, never coerced.
pub fn load_menu(path: &Path) -> Result<CocktailMenu, MenuLoadError> {
    let display_path = path.to_string_lossy().to_string();
    let file = std::fs::File::open(path).map_err(|source| Io {
        path: display_path.clone(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut menu = CocktailMenu::new();
    for (index, result) in reader.records().enumerate() {
        if index < HEADER_ROWS {
            continue;
        }
        let record = result.map_err(|source| Csv {
            path: display_path.clone(),
            source,
        })?;
        let cocktail = parse_record(&record, &display_path, index)?;
        menu.insert(cocktail)?;
    }

    debug!("Loaded menu with {} cocktails from {}", menu.len(), display_path);
    Ok(menu)
}

fn parse_record(
    record: &csv::StringRecord,
    path: &str,
    index: usize,
) -> Result<Cocktail, MenuLoadError> {
    let cell = |column: usize| record.get(column).unwrap_or("").trim();

    let well: u32 = cell(WELL_COLUMN).parse().map_err(|_| Row {
        path: path.to_string(),
        record: index,
        message: format!("unparsable well assignment '{}'", cell(WELL_COLUMN)),
    })?;

    let mut cocktail = Cocktail::new();
    if !cell(NUMBER_COLUMN).is_empty() {
        cocktail.number = Some(cell(NUMBER_COLUMN).to_string());
    }
    if !cell(COMMERCIAL_CODE_COLUMN).is_empty() {
        cocktail.commercial_code = Some(cell(COMMERCIAL_CODE_COLUMN).to_string());
    }
    let ph_cell = cell(PH_COLUMN);
    if !ph_cell.is_empty() {
        cocktail.ph = Some(ph_cell.parse().map_err(|_| Row {
            path: path.to_string(),
            record: index,
            message: format!("unparsable pH '{}'", ph_cell),
        })?);
    }

    let reagent_columns: Vec<usize> = (0..record.len())
        .filter(|column| {
            !matches!(
                *column,
                WELL_COLUMN | NUMBER_COLUMN | COMMERCIAL_CODE_COLUMN | FORMULA_COLUMN | PH_COLUMN
            )
        })
        .collect();

    let formula = cell(FORMULA_COLUMN);
    for (pair_index, pair) in reagent_columns.chunks(2).enumerate() {
        let [name_column, concentration_column] = pair else {
            break;
        };
        let name = cell(*name_column);
        let concentration_text = cell(*concentration_column);
        if name.is_empty() || concentration_text.is_empty() {
            continue;
        }
        let concentration =
            SignedValue::parse(concentration_text).map_err(|source| Quantity {
                path: path.to_string(),
                record: index,
                source,
            })?;
        let mut reagent = Reagent::new(name, concentration);
        if pair_index == 0 && !formula.is_empty() {
            reagent = reagent.with_formula(formula);
        }
        cocktail.add_reagent(reagent).map_err(|e| Row {
            path: path.to_string(),
            record: index,
            message: e.to_string(),
        })?;
    }

    cocktail.assign_well(well).map_err(|e| Row {
        path: path.to_string(),
        record: index,
        message: e.to_string(),
    })?;
    Ok(cocktail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const MENU: &str = "\
Menu header line one,,,,,,,,
well,number,code,reagent,formula,conc,reagent,conc,pH
1,13_C0001,HR-001,Sodium chloride,NaCl,100 mM,PEG 3350,25 % w/v,7.4
2,13_C0002,HR-002,Ammonium sulfate,(NH4)2SO4,1 M,,,6.5
";

    #[test]
    fn load_menu_parses_cocktails_and_reagents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("menu.csv");
        fs::write(&path, MENU).unwrap();

        let menu = load_menu(&path).unwrap();
        assert_eq!(menu.len(), 2);

        let first = menu.get(1).unwrap();
        assert_eq!(first.number.as_deref(), Some("13_C0001"));
        assert_eq!(first.cocktail_index(), Some(1));
        assert_eq!(first.ph, Some(7.4));
        assert_eq!(first.reagents().len(), 2);

        let salt = first.reagent("Sodium chloride").unwrap();
        assert_eq!(salt.formula.as_deref(), Some("NaCl"));
        assert_eq!(salt.molecular_weight, Some(58.44));
        let peg = first.reagent("PEG 3350").unwrap();
        assert_eq!(peg.molecular_weight, Some(3350.0));

        let second = menu.get(2).unwrap();
        assert_eq!(second.reagents().len(), 1);
        assert_eq!(
            second.reagent("Ammonium sulfate").unwrap().molecular_weight,
            Some(132.14)
        );
    }

    #[test]
    fn load_menu_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = load_menu(&dir.path().join("nope.csv"));
        assert!(matches!(result, Err(MenuLoadError::Io { .. })));
    }

    #[test]
    fn malformed_quantities_are_hard_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("menu.csv");
        fs::write(
            &path,
            "h,,,,,,,,\nh,,,,,,,,\n1,13_C0001,,Sodium chloride,,lots,,,\n",
        )
        .unwrap();
        let result = load_menu(&path);
        assert!(matches!(result, Err(MenuLoadError::Quantity { .. })));
    }

    #[test]
    fn duplicate_wells_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("menu.csv");
        fs::write(
            &path,
            "h,,,,,,,,\nh,,,,,,,,\n1,a,,Tris,,50 mM,,,\n1,b,,Hepes,,50 mM,,,\n",
        )
        .unwrap();
        let result = load_menu(&path);
        assert!(matches!(
            result,
            Err(MenuLoadError::Menu(MenuError::DuplicateWell { well: 1 }))
        ));
    }
}
