//! Measurement and product value types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel unit for ingredients whose quantity never limits feasibility.
pub const TO_TASTE_UNIT: &str = "to taste";

/// Marker used in tabular sources for "no value".
pub const NOT_APPLICABLE: &str = "-";

#[derive(Debug, Error, PartialEq)]
pub enum ParseMeasurementError {
    #[error("measurement is empty")]
    Empty,

    #[error("measurement '{0}' has no unit")]
    MissingUnit(String),

    #[error("invalid quantity '{0}'")]
    InvalidQuantity(String),
}

/// An amount expressed in a named unit, e.g. `120 g`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub quantity: f64,
    pub unit: String,
}

impl Measurement {
    pub fn new(quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            quantity,
            unit: unit.into(),
        }
    }

    pub fn is_to_taste(&self) -> bool {
        self.unit == TO_TASTE_UNIT
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quantity, self.unit)
    }
}

/// Parses `<quantity> <unit>`. The unit is everything after the first run of
/// whitespace, so multi-word units such as `fl oz` are accepted.
impl FromStr for Measurement {
    type Err = ParseMeasurementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseMeasurementError::Empty);
        }

        let (quantity, unit) = s
            .split_once(char::is_whitespace)
            .ok_or_else(|| ParseMeasurementError::MissingUnit(s.to_string()))?;

        let quantity: f64 = quantity
            .parse()
            .map_err(|_| ParseMeasurementError::InvalidQuantity(quantity.to_string()))?;

        let unit = unit.trim();
        if unit.is_empty() {
            return Err(ParseMeasurementError::MissingUnit(s.to_string()));
        }

        Ok(Measurement::new(quantity, unit))
    }
}

/// A named substance with an amount. Used for catalog requirements and for
/// caller-supplied stock entries alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(flatten)]
    pub measurement: Measurement,
}

impl Product {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            measurement: Measurement::new(quantity, unit),
        }
    }
}
