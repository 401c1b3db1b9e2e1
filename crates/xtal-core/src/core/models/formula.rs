use phf::{Map, phf_map};

// Molecular weights (g/mol) of compounds that appear in screening menus
// without a parsable formula. Keys are lowercased names or formulas.
static NAMED_MOLECULAR_WEIGHTS: Map<&'static str, f64> = phf_map! {
    "ammonium sulfate" => 132.14,
    "(nh4)2so4" => 132.14,
    "sodium chloride" => 58.44,
    "nacl" => 58.44,
    "potassium chloride" => 74.55,
    "kcl" => 74.55,
    "magnesium chloride" => 95.21,
    "mgcl2" => 95.21,
    "calcium chloride" => 110.98,
    "cacl2" => 110.98,
    "lithium sulfate" => 109.94,
    "li2so4" => 109.94,
    "sodium acetate" => 82.03,
    "sodium citrate" => 258.07,
    "ammonium chloride" => 53.49,
    "nh4cl" => 53.49,
    "zinc acetate" => 183.48,
    "tris" => 121.14,
    "tris hydrochloride" => 157.60,
    "hepes" => 238.30,
    "bis-tris" => 209.24,
    "mes" => 195.24,
    "imidazole" => 68.08,
    "glycerol" => 92.09,
};

/// Splits a free-form formula string into a leading compound name and an
/// optional trailing numeric molecular-weight hint.
///
/// `"PEG 3350"` yields `("PEG", Some(3350.0))`. Parenthesized stoichiometric
/// groups such as `"(NH4)2SO4"` are preserved verbatim in the name; no
/// stoichiometric mass computation is attempted. Comma-grouped digits in the
/// hint (`"3,350"`) are accepted.
pub fn parse_formula(formula: &str) -> (String, Option<f64>) {
    let tokens: Vec<&str> = formula.split_whitespace().collect();
    if tokens.len() > 1 {
        let candidate = tokens[tokens.len() - 1].replace(',', "");
        if let Ok(hint) = candidate.parse::<f64>() {
            let name = tokens[..tokens.len() - 1].join(" ");
            return (name, Some(hint));
        }
    }
    (tokens.join(" "), None)
}

/// Pulls a molecular weight out of a PEG species name.
///
/// Polyethylene glycol menus encode the polymer weight in the name itself
/// (`"PEG 3350"`, `"Polyethylene glycol 8,000"`); a string is considered a
/// PEG species when it contains `PEG` or `polyethylene glycol`.
pub fn peg_molecular_weight(name: &str) -> Option<f64> {
    let lowered = name.to_lowercase();
    if !name.contains("PEG") && !lowered.contains("polyethylene glycol") {
        return None;
    }
    let cleaned = name.replace(',', "");
    let digits: String = cleaned
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Looks up a molecular weight by compound name or formula.
pub fn named_molecular_weight(name: &str) -> Option<f64> {
    NAMED_MOLECULAR_WEIGHTS
        .get(name.trim().to_lowercase().as_str())
        .copied()
}

/// Resolves a molecular weight from a reagent name and optional formula
/// string, in order of preference: explicit formula hint, named lookup of
/// the formula, PEG species name, then named lookup of the reagent name.
/// Returns `None` when nothing resolves.
pub fn resolve_molecular_weight(name: &str, formula: Option<&str>) -> Option<f64> {
    if let Some(formula) = formula {
        let (base_name, hint) = parse_formula(formula);
        if let Some(hint) = hint {
            return Some(hint);
        }
        if let Some(weight) = named_molecular_weight(&base_name) {
            return Some(weight);
        }
    }
    peg_molecular_weight(name).or_else(|| named_molecular_weight(name))
}
