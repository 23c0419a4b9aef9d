//! Supported weight units.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// Pounds per kilogram.
pub const POUNDS_PER_KILOGRAM: f64 = 2.204_622_62;

/// Unit a weight magnitude is expressed in.
///
/// Serialized as the short symbol (`"kg"` / `"lb"`), which is also what the
/// persisted records store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeightUnit {
    /// Kilograms.
    #[default]
    #[serde(rename = "kg")]
    Kilograms,
    /// Pounds.
    #[serde(rename = "lb")]
    Pounds,
}

impl WeightUnit {
    /// Returns the unit symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Kilograms => "kg",
            Self::Pounds => "lb",
        }
    }

    /// Converts `value` expressed in `self` into `target`.
    #[must_use]
    pub fn convert(self, value: f64, target: Self) -> f64 {
        match (self, target) {
            (Self::Kilograms, Self::Pounds) => value * POUNDS_PER_KILOGRAM,
            (Self::Pounds, Self::Kilograms) => value / POUNDS_PER_KILOGRAM,
            _ => value,
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for WeightUnit {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kg" | "kgs" => Ok(Self::Kilograms),
            "lb" | "lbs" => Ok(Self::Pounds),
            _ => Err(TrackerError::UnsupportedUnit(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parses_symbols_case_insensitively() {
        assert!(matches!("KG".parse::<WeightUnit>(), Ok(WeightUnit::Kilograms)));
        assert!(matches!(" lbs ".parse::<WeightUnit>(), Ok(WeightUnit::Pounds)));
    }

    #[test]
    fn rejects_unknown_unit() {
        let Err(err) = "stone".parse::<WeightUnit>() else {
            panic!("stone should be rejected");
        };
        assert!(matches!(err, TrackerError::UnsupportedUnit(ref s) if s == "stone"));
    }

    #[test]
    fn converts_between_units() {
        let lb = WeightUnit::Kilograms.convert(100.0, WeightUnit::Pounds);
        assert!((lb - 220.462_262).abs() < 1e-6);
        let kg = WeightUnit::Pounds.convert(lb, WeightUnit::Kilograms);
        assert!((kg - 100.0).abs() < 1e-9);
        let same = WeightUnit::Pounds.convert(150.0, WeightUnit::Pounds);
        assert!((same - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_as_symbol() {
        assert_eq!(serde_json::to_string(&WeightUnit::Pounds).ok().as_deref(), Some("\"lb\""));
    }
}
