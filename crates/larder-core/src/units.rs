// ABOUTME: Mass and volume unit conversion to and from canonical base units
// ABOUTME: Total functions that degrade to pass-through for unrecognized units
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Unit conversion
//!
//! Mass quantities are canonicalized to grams and volume quantities to milliliters.
//! Conversion never fails: an unrecognized unit yields [`UnitKind::Unknown`] and the
//! quantity passes through unchanged, so adapters can call these helpers on whatever a
//! provider sends without guarding first.

use serde::{Deserialize, Serialize};

use crate::constants::units::{
    GRAMS_PER_GRAM, GRAMS_PER_KILOGRAM, GRAMS_PER_OUNCE, GRAMS_PER_POUND, ML_PER_CUP,
    ML_PER_FLUID_OUNCE, ML_PER_LITER, ML_PER_MILLILITER, ML_PER_TABLESPOON, ML_PER_TEASPOON,
};

/// Physical dimension of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Canonical base is grams
    Mass,
    /// Canonical base is milliliters
    Volume,
    /// Unit not recognized
    Unknown,
}

impl UnitKind {
    /// Canonical unit symbol for this kind, if any
    #[must_use]
    pub const fn base_unit(self) -> Option<&'static str> {
        match self {
            Self::Mass => Some("g"),
            Self::Volume => Some("ml"),
            Self::Unknown => None,
        }
    }
}

/// Quantity expressed in its canonical base unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseQuantity {
    /// Value in grams, milliliters, or the original unit when unknown
    pub value: f64,
    /// Dimension of the original unit
    pub kind: UnitKind,
}

/// Quantity with an explicit unit label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    /// Numeric amount
    pub value: f64,
    /// Unit label
    pub unit: String,
}

/// Resolve a unit label to its kind and base-units-per-unit factor
#[must_use]
pub fn unit_factor(unit: &str) -> Option<(UnitKind, f64)> {
    let normalized = normalize_unit(unit);
    let entry = match normalized.as_str() {
        "g" | "gr" | "grm" | "gram" | "grams" | "gramme" | "grammes" => {
            (UnitKind::Mass, GRAMS_PER_GRAM)
        }
        "kg" | "kilo" | "kilos" | "kilogram" | "kilograms" => (UnitKind::Mass, GRAMS_PER_KILOGRAM),
        "oz" | "ounce" | "ounces" | "onz" => (UnitKind::Mass, GRAMS_PER_OUNCE),
        "lb" | "lbs" | "pound" | "pounds" => (UnitKind::Mass, GRAMS_PER_POUND),
        "ml" | "mlt" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => {
            (UnitKind::Volume, ML_PER_MILLILITER)
        }
        "l" | "ltr" | "liter" | "liters" | "litre" | "litres" => (UnitKind::Volume, ML_PER_LITER),
        "tsp" | "teaspoon" | "teaspoons" => (UnitKind::Volume, ML_PER_TEASPOON),
        "tbsp" | "tbs" | "tablespoon" | "tablespoons" => (UnitKind::Volume, ML_PER_TABLESPOON),
        "cup" | "cups" => (UnitKind::Volume, ML_PER_CUP),
        "floz" | "fluidounce" | "fluidounces" => (UnitKind::Volume, ML_PER_FLUID_OUNCE),
        _ => return None,
    };
    Some(entry)
}

/// Convert a quantity to its canonical base unit
#[must_use]
pub fn to_base(quantity: f64, unit: &str) -> BaseQuantity {
    unit_factor(unit).map_or(
        BaseQuantity {
            value: quantity,
            kind: UnitKind::Unknown,
        },
        |(kind, factor)| BaseQuantity {
            value: quantity * factor,
            kind,
        },
    )
}

/// Convert a base-unit value into the target unit
///
/// An unknown target unit returns the base value unchanged.
#[must_use]
pub fn from_base(base_value: f64, target_unit: &str) -> Quantity {
    let value = unit_factor(target_unit).map_or(base_value, |(_, factor)| base_value / factor);
    Quantity {
        value,
        unit: target_unit.to_owned(),
    }
}

/// Lowercase and strip spacing/punctuation so "Fl. Oz", "fl oz" and "FLOZ" compare equal
fn normalize_unit(unit: &str) -> String {
    unit.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_mass_units_convert_to_grams() {
        assert!(close(to_base(2.0, "kg").value, 2000.0));
        assert!(close(to_base(1.0, "oz").value, 28.349_523_1));
        assert!(close(to_base(1.0, "lb").value, 453.592_37));
        assert_eq!(to_base(1.0, "GRM").kind, UnitKind::Mass);
    }

    #[test]
    fn test_volume_units_convert_to_milliliters() {
        assert!(close(to_base(1.0, "cup").value, 236.588_236_5));
        assert!(close(to_base(2.0, "tbsp").value, 29.573_529_6));
        assert!(close(to_base(1.0, "fl oz").value, 29.573_529_6));
        assert!(close(to_base(1.0, "Fl. Oz.").value, 29.573_529_6));
        assert_eq!(to_base(1.5, "L").kind, UnitKind::Volume);
    }

    #[test]
    fn test_unknown_unit_passes_through() {
        let base = to_base(3.0, "pouch");
        assert!(close(base.value, 3.0));
        assert_eq!(base.kind, UnitKind::Unknown);
    }

    #[test]
    fn test_from_base_inverts_to_base() {
        let grams = to_base(4.0, "oz").value;
        let back = from_base(grams, "oz");
        assert!(close(back.value, 4.0));
        assert_eq!(back.unit, "oz");
    }

    #[test]
    fn test_from_base_unknown_target_is_identity() {
        let quantity = from_base(125.0, "handful");
        assert!(close(quantity.value, 125.0));
    }
}
