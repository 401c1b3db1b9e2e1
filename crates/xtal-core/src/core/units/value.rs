use super::UnitError;
use super::table::{Unit, UnitFamily};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Semantic direction of a quantity: addition versus removal.
///
/// The sign is carried separately from the magnitude; a `SignedValue` never
/// encodes direction as a negative magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sign {
    #[default]
    Positive,
    Negative,
}

impl Sign {
    fn of(value: f64) -> Self {
        if value < 0.0 {
            Sign::Negative
        } else {
            Sign::Positive
        }
    }

    fn factor(&self) -> f64 {
        match self {
            Sign::Positive => 1.0,
            Sign::Negative => -1.0,
        }
    }
}

/// A parsed, signed, unit-tagged numeric quantity.
///
/// `SignedValue` is immutable after creation; conversion, scaling, and
/// rounding all return new values. Invariant: `magnitude >= 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignedValue {
    sign: Sign,
    magnitude: f64,
    unit: Unit,
    precision: Option<u8>,
}

impl SignedValue {
    /// Creates a positive value from a non-negative magnitude.
    ///
    /// A negative `magnitude` is folded into the sign so the magnitude
    /// invariant always holds.
    pub fn new(magnitude: f64, unit: Unit) -> Self {
        Self::from_signed(magnitude, unit)
    }

    /// Creates a value from a signed float, splitting sign and magnitude.
    pub fn from_signed(value: f64, unit: Unit) -> Self {
        Self {
            sign: Sign::of(value),
            magnitude: value.abs(),
            unit,
            precision: None,
        }
    }

    /// Parses a quantity string of the form `[sign] magnitude unit`.
    ///
    /// The sign is an optional leading `+` or `-` (absence implies positive),
    /// the magnitude is a decimal number (scientific notation accepted), and
    /// the remaining token is resolved against the unit table
    /// (case-insensitive, whitespace-normalized).
    ///
    /// # Errors
    ///
    /// Returns [`UnitError::MalformedValue`] when no numeric prefix can be
    /// parsed and [`UnitError::UnparsableUnit`] for unknown unit tokens.
    /// Unparsable magnitudes are never coerced to zero.
    pub fn parse(text: &str) -> Result<Self, UnitError> {
        let trimmed = text.trim();
        let (sign, rest) = match trimmed.as_bytes().first() {
            Some(b'+') => (Sign::Positive, &trimmed[1..]),
            Some(b'-') => (Sign::Negative, &trimmed[1..]),
            _ => (Sign::Positive, trimmed),
        };
        let rest = rest.trim_start();

        let split = numeric_prefix_len(rest).ok_or_else(|| UnitError::MalformedValue {
            input: text.trim().to_string(),
        })?;
        let magnitude: f64 =
            rest[..split]
                .parse()
                .map_err(|_| UnitError::MalformedValue {
                    input: text.trim().to_string(),
                })?;
        let unit = Unit::parse(&rest[split..])?;

        Ok(Self {
            sign,
            magnitude,
            unit,
            precision: None,
        })
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// The magnitude with the sign applied, as a plain float.
    pub fn signed_magnitude(&self) -> f64 {
        self.sign.factor() * self.magnitude
    }

    /// Converts this value to its family's base unit. Idempotent; the sign is
    /// preserved.
    pub fn to_base(&self) -> SignedValue {
        SignedValue {
            sign: self.sign,
            magnitude: self.magnitude * self.unit.scale(),
            unit: self.unit.base(),
            precision: self.precision,
        }
    }

    /// Converts this value to another unit of the same family.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError::IncompatibleUnit`] when the families differ.
    pub fn convert_to(&self, unit: Unit) -> Result<SignedValue, UnitError> {
        if self.unit.family() != unit.family() {
            return Err(UnitError::IncompatibleUnit {
                from: self.unit.family(),
                to: unit.family(),
            });
        }
        Ok(SignedValue {
            sign: self.sign,
            magnitude: self.magnitude * self.unit.scale() / unit.scale(),
            unit,
            precision: self.precision,
        })
    }

    /// Re-scales this value to an SI-prefixed spelling of its base unit,
    /// e.g. `'u'` turns litres into microlitres.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError::UnparsableUnit`] when the prefixed token does not
    /// exist in the unit table for this family.
    pub fn with_prefix(&self, prefix: char) -> Result<SignedValue, UnitError> {
        let token = format!("{}{}", prefix, self.unit.base().token());
        self.convert_to(Unit::parse(&token)?)
    }

    /// Returns a new value with the magnitude multiplied by `factor`.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError::InvalidScaleFactor`] for negative or non-finite
    /// factors; scaling never flips the sign.
    pub fn scale(&self, factor: f64) -> Result<SignedValue, UnitError> {
        if factor < 0.0 || !factor.is_finite() {
            return Err(UnitError::InvalidScaleFactor { factor });
        }
        Ok(SignedValue {
            sign: self.sign,
            magnitude: self.magnitude * factor,
            unit: self.unit,
            precision: self.precision,
        })
    }

    /// Returns a new value with the magnitude rounded half-to-even to
    /// `digits` decimal places. The receiver is not mutated; the returned
    /// value formats with exactly `digits` decimals.
    pub fn round(&self, digits: u8) -> SignedValue {
        let pow = 10f64.powi(digits as i32);
        SignedValue {
            sign: self.sign,
            magnitude: (self.magnitude * pow).round_ties_even() / pow,
            unit: self.unit,
            precision: Some(digits),
        }
    }

    /// Adds another quantity of the same family, in base units.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError::UnitMismatch`] when the families differ.
    pub fn add(&self, other: &SignedValue) -> Result<SignedValue, UnitError> {
        self.combine(other, 1.0)
    }

    /// Subtracts another quantity of the same family, in base units.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError::UnitMismatch`] when the families differ.
    pub fn sub(&self, other: &SignedValue) -> Result<SignedValue, UnitError> {
        self.combine(other, -1.0)
    }

    fn combine(&self, other: &SignedValue, direction: f64) -> Result<SignedValue, UnitError> {
        if self.unit.family() != other.unit.family() {
            return Err(UnitError::UnitMismatch {
                expected: self.unit.family(),
                found: other.unit.family(),
            });
        }
        let lhs = self.to_base();
        let rhs = other.to_base();
        Ok(SignedValue::from_signed(
            lhs.signed_magnitude() + direction * rhs.signed_magnitude(),
            lhs.unit,
        ))
    }

    /// The compatibility family of this value's unit.
    pub fn family(&self) -> UnitFamily {
        self.unit.family()
    }
}

fn numeric_prefix_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
        seen_digit |= bytes[end].is_ascii_digit();
        end += 1;
    }
    if !seen_digit {
        return None;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut cursor = end + 1;
        if cursor < bytes.len() && (bytes[cursor] == b'+' || bytes[cursor] == b'-') {
            cursor += 1;
        }
        let exponent_start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        if cursor > exponent_start {
            end = cursor;
        }
    }
    Some(end)
}

impl fmt::Display for SignedValue {
    /// Formats as `[-]magnitude unit` using the canonical unit spelling.
    ///
    /// This is the left inverse of [`SignedValue::parse`] up to unit-token
    /// normalization and rounding.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.sign {
            Sign::Negative => "-",
            Sign::Positive => "",
        };
        match self.precision {
            Some(digits) => write!(
                f,
                "{}{:.*} {}",
                sign, digits as usize, self.magnitude, self.unit
            ),
            None => write!(f, "{}{} {}", sign, self.magnitude, self.unit),
        }
    }
}

impl FromStr for SignedValue {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignedValue::parse(s)
    }
}

impl Serialize for SignedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SignedValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        SignedValue::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_extracts_sign_magnitude_and_unit() {
        let value = SignedValue::parse("+25 % w/v").unwrap();
        assert_eq!(value.sign(), Sign::Positive);
        assert_eq!(value.magnitude(), 25.0);
        assert_eq!(value.family(), UnitFamily::Percent);

        let value = SignedValue::parse("-0.5 mM").unwrap();
        assert_eq!(value.sign(), Sign::Negative);
        assert_eq!(value.magnitude(), 0.5);
        assert_eq!(value.unit().token(), "mM");
    }

    #[test]
    fn parse_accepts_missing_sign_and_tight_spacing() {
        let value = SignedValue::parse("10.0M").unwrap();
        assert_eq!(value.sign(), Sign::Positive);
        assert_eq!(value.magnitude(), 10.0);
        assert_eq!(value.unit().token(), "M");
    }

    #[test]
    fn parse_accepts_scientific_notation() {
        let value = SignedValue::parse("1e-3 M").unwrap();
        assert_eq!(value.magnitude(), 1e-3);
    }

    #[test]
    fn parse_rejects_malformed_magnitudes() {
        assert!(matches!(
            SignedValue::parse("abc M"),
            Err(UnitError::MalformedValue { .. })
        ));
        assert!(matches!(
            SignedValue::parse("1.2.3 M"),
            Err(UnitError::MalformedValue { .. })
        ));
        assert!(matches!(
            SignedValue::parse(""),
            Err(UnitError::MalformedValue { .. })
        ));
    }

    #[test]
    fn parse_rejects_unknown_units() {
        assert!(matches!(
            SignedValue::parse("10 parsecs"),
            Err(UnitError::UnparsableUnit { .. })
        ));
        assert!(matches!(
            SignedValue::parse("10"),
            Err(UnitError::UnparsableUnit { .. })
        ));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for text in ["25 % w/v", "-0.5 mM", "10 M", "1.25 uL", "7.4 pH"] {
            let value = SignedValue::parse(text).unwrap();
            let reparsed = SignedValue::parse(&value.to_string()).unwrap();
            assert_eq!(value, reparsed, "round-trip failed for '{}'", text);
        }
    }

    #[test]
    fn to_base_is_idempotent() {
        let value = SignedValue::parse("250 mM").unwrap();
        let once = value.to_base();
        let twice = once.to_base();
        assert_eq!(once, twice);
        assert_eq!(once.magnitude(), 0.25);
        assert_eq!(once.unit().token(), "M");
    }

    #[test]
    fn to_base_preserves_sign() {
        let value = SignedValue::parse("-10 mM").unwrap().to_base();
        assert_eq!(value.sign(), Sign::Negative);
        assert_eq!(value.magnitude(), 0.01);
    }

    #[test]
    fn scale_rejects_negative_factors() {
        let value = SignedValue::parse("10 mM").unwrap();
        assert!(matches!(
            value.scale(-2.0),
            Err(UnitError::InvalidScaleFactor { .. })
        ));
        assert!(matches!(
            value.scale(f64::NAN),
            Err(UnitError::InvalidScaleFactor { .. })
        ));
        assert_eq!(value.scale(2.0).unwrap().magnitude(), 20.0);
    }

    #[test]
    fn round_is_half_to_even_and_does_not_mutate() {
        let value = SignedValue::parse("0.125 M").unwrap();
        let rounded = value.round(2);
        assert_eq!(rounded.magnitude(), 0.12);
        assert_eq!(rounded.to_string(), "0.12 M");
        assert_eq!(value.magnitude(), 0.125);

        let rounded = SignedValue::parse("0.135 M").unwrap().round(2);
        assert_eq!(rounded.to_string(), "0.14 M");
    }

    #[test]
    fn add_and_sub_operate_in_base_units() {
        let a = SignedValue::parse("10 mM").unwrap();
        let b = SignedValue::parse("5 mM").unwrap();
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.unit().token(), "M");
        assert!((sum.signed_magnitude() - 0.015).abs() < 1e-12);

        let diff = b.sub(&a).unwrap();
        assert_eq!(diff.sign(), Sign::Negative);
        assert!((diff.signed_magnitude() + 0.005).abs() < 1e-12);
    }

    #[test]
    fn arithmetic_across_families_fails() {
        let conc = SignedValue::parse("10 mM").unwrap();
        let vol = SignedValue::parse("10 mL").unwrap();
        assert!(matches!(
            conc.add(&vol),
            Err(UnitError::UnitMismatch { .. })
        ));
    }

    #[test]
    fn convert_to_and_prefix_rescale_volumes() {
        let vol = SignedValue::parse("0.0001 L").unwrap();
        let micro = vol.with_prefix('u').unwrap();
        assert_eq!(micro.unit().token(), "uL");
        assert!((micro.magnitude() - 100.0).abs() < 1e-9);

        let milli = micro.convert_to(Unit::parse("mL").unwrap()).unwrap();
        assert!((milli.magnitude() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn serde_round_trips_through_display_representation() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            value: SignedValue,
        }

        let wrapper = Wrapper {
            value: SignedValue::parse("25 % w/v").unwrap(),
        };
        let text = toml::to_string(&wrapper).unwrap();
        assert_eq!(text.trim(), "value = \"25 % w/v\"");

        let back: Wrapper = toml::from_str(&text).unwrap();
        assert_eq!(back.value, wrapper.value);
    }
}
