use super::UnitError;
use phf::{Map, phf_map};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Classifies unit tokens into compatibility families.
///
/// Conversion is only defined between units of the same family; crossing
/// families fails with [`UnitError::IncompatibleUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitFamily {
    /// Molar concentration. Base unit is molar (`M`).
    Concentration,
    /// Percent by mass or volume. Base unit is the percent token itself.
    Percent,
    /// pH readings. Dimensionless, no scaling.
    Ph,
    /// Liquid volume. Base unit is the litre (`L`).
    Volume,
    /// Recognized but unclassified units.
    Other,
}

/// One entry of the static unit table.
#[derive(Debug)]
pub struct UnitDef {
    /// Canonical spelling used for display (`"mM"`, `"% w/v"`).
    pub token: &'static str,
    /// Compatibility family of this unit.
    pub family: UnitFamily,
    /// Multiplier converting a value in this unit to the family base unit.
    pub scale: f64,
    /// Canonical token of the family base unit for this entry.
    pub base: &'static str,
}

const fn def(token: &'static str, family: UnitFamily, scale: f64, base: &'static str) -> UnitDef {
    UnitDef {
        token,
        family,
        scale,
        base,
    }
}

// Keys are the normalized (lowercased, whitespace-collapsed) spellings.
// `% w/v` and `% v/v` are distinct tokens sharing the Percent family; they
// are never inter-converted.
static UNIT_TABLE: Map<&'static str, UnitDef> = phf_map! {
    "m" => def("M", UnitFamily::Concentration, 1.0, "M"),
    "mm" => def("mM", UnitFamily::Concentration, 1e-3, "M"),
    "um" => def("uM", UnitFamily::Concentration, 1e-6, "M"),
    "µm" => def("uM", UnitFamily::Concentration, 1e-6, "M"),
    "nm" => def("nM", UnitFamily::Concentration, 1e-9, "M"),

    "% w/v" => def("% w/v", UnitFamily::Percent, 1.0, "% w/v"),
    "%w/v" => def("% w/v", UnitFamily::Percent, 1.0, "% w/v"),
    "w/v" => def("% w/v", UnitFamily::Percent, 1.0, "% w/v"),
    "% v/v" => def("% v/v", UnitFamily::Percent, 1.0, "% v/v"),
    "%v/v" => def("% v/v", UnitFamily::Percent, 1.0, "% v/v"),
    "v/v" => def("% v/v", UnitFamily::Percent, 1.0, "% v/v"),

    "ph" => def("pH", UnitFamily::Ph, 1.0, "pH"),

    "l" => def("L", UnitFamily::Volume, 1.0, "L"),
    "cl" => def("cL", UnitFamily::Volume, 1e-2, "L"),
    "ml" => def("mL", UnitFamily::Volume, 1e-3, "L"),
    "ul" => def("uL", UnitFamily::Volume, 1e-6, "L"),
    "µl" => def("uL", UnitFamily::Volume, 1e-6, "L"),
    "nl" => def("nL", UnitFamily::Volume, 1e-9, "L"),
};

/// Normalizes a raw unit token for table lookup: trims, collapses internal
/// whitespace runs to a single space, and lowercases.
pub(crate) fn normalize_token(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A unit token resolved against the process-wide unit table.
///
/// `Unit` is a cheap, copyable handle onto a static [`UnitDef`]; two units
/// compare equal when they resolve to the same canonical spelling.
#[derive(Debug, Clone, Copy)]
pub struct Unit(&'static UnitDef);

impl Unit {
    /// Resolves a raw unit token (case-insensitive, whitespace-normalized)
    /// against the unit table.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError::UnparsableUnit`] for tokens absent from the table.
    pub fn parse(raw: &str) -> Result<Self, UnitError> {
        let key = normalize_token(raw);
        UNIT_TABLE
            .get(key.as_str())
            .map(Unit)
            .ok_or(UnitError::UnparsableUnit { token: key })
    }

    /// The canonical spelling of this unit.
    pub fn token(&self) -> &'static str {
        self.0.token
    }

    /// The compatibility family of this unit.
    pub fn family(&self) -> UnitFamily {
        self.0.family
    }

    /// The multiplier converting a value in this unit to the family base unit.
    pub fn scale(&self) -> f64 {
        self.0.scale
    }

    /// The base unit of this unit's family.
    pub fn base(&self) -> Unit {
        // Base tokens are themselves table entries; lookup cannot fail.
        Unit(
            UNIT_TABLE
                .get(normalize_token(self.0.base).as_str())
                .unwrap_or(self.0),
        )
    }

    /// Whether this unit already is its family's base unit.
    pub fn is_base(&self) -> bool {
        self.0.token == self.0.base
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.0.token == other.0.token
    }
}

impl Eq for Unit {}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.token)
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.token)
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Unit::parse(&token).map_err(serde::de::Error::custom)
    }
}

/// Returns the multiplier converting a value in `unit` to its family's base
/// unit.
///
/// # Errors
///
/// Returns [`UnitError::UnparsableUnit`] for unknown tokens.
pub fn scale_of(unit: &str) -> Result<f64, UnitError> {
    Unit::parse(unit).map(|u| u.scale())
}

/// Classifies a unit token into its compatibility family.
///
/// # Errors
///
/// Returns [`UnitError::UnparsableUnit`] for unknown tokens.
pub fn family_of(unit: &str) -> Result<UnitFamily, UnitError> {
    Unit::parse(unit).map(|u| u.family())
}
