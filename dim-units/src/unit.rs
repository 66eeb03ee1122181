//! Unit representation with conversion factors

use std::fmt;
use serde::{Serialize, Deserialize};
use dim_core::{DimError, Dimension, Quantity};

/// Represents a physical unit with its dimension and scale factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// The unit symbol (e.g., "m", "kg", "m/s^2")
    pub symbol: String,
    /// The unit name (e.g., "meter", "kilogram")
    pub name: String,
    /// The dimensional signature
    pub dimension: Dimension,
    /// Factor to convert to canonical base units (value_base = value * scale)
    pub scale: f64,
    /// Whether metric prefixes may be attached (km, mg, ns)
    pub prefixable: bool,
}

impl Unit {
    pub fn new(symbol: &str, name: &str, dimension: Dimension, scale: f64) -> Self {
        Unit {
            symbol: symbol.to_string(),
            name: name.to_string(),
            dimension,
            scale,
            prefixable: false,
        }
    }

    /// Builder: allow metric prefixes
    pub fn prefixed(mut self) -> Self {
        self.prefixable = true;
        self
    }

    /// Check if this is a canonical (scale 1) unit
    pub fn is_canonical(&self) -> bool {
        self.scale == 1.0
    }

    /// Check if two units are dimensionally compatible (can be converted)
    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
    }

    /// A quantity of `value` in this unit, normalized to base units
    pub fn quantity(&self, value: f64) -> Quantity {
        Quantity::new(value * self.scale, self.dimension)
    }

    /// Magnitude of `q` expressed in this unit
    pub fn magnitude_of(&self, q: &Quantity) -> Result<f64, DimError> {
        q.value_in(&self.dimension, self.scale)
    }

    /// Convert a value from this unit to another unit
    pub fn convert_to(&self, value: f64, target: &Unit) -> Result<f64, DimError> {
        target.magnitude_of(&self.quantity(value))
    }

    /// Multiply two units (e.g., kg * m -> kg*m)
    pub fn multiply(&self, other: &Unit) -> Result<Unit, DimError> {
        Ok(Unit {
            symbol: format!("{}*{}", self.symbol, other.symbol),
            name: format!("{} {}", self.name, other.name),
            dimension: self.dimension.multiply(&other.dimension)?,
            scale: self.scale * other.scale,
            prefixable: false,
        })
    }

    /// Divide two units (e.g., m / s -> m/s)
    pub fn divide(&self, other: &Unit) -> Result<Unit, DimError> {
        Ok(Unit {
            symbol: format!("{}/{}", self.symbol, other.symbol),
            name: format!("{} per {}", self.name, other.name),
            dimension: self.dimension.divide(&other.dimension)?,
            scale: self.scale / other.scale,
            prefixable: false,
        })
    }

    /// Raise unit to an integer power (e.g., m^2, s^-1)
    pub fn power(&self, exp: i32) -> Result<Unit, DimError> {
        if exp == 1 {
            return Ok(self.clone());
        }
        let symbol = if self.symbol.contains(['*', '/']) {
            format!("({})^{}", self.symbol, exp)
        } else {
            format!("{}^{}", self.symbol, exp)
        };

        Ok(Unit {
            symbol,
            name: format!("{} to the {}", self.name, exp),
            dimension: self.dimension.power(&dim_core::rational::int(i64::from(exp)))?,
            scale: self.scale.powi(exp),
            prefixable: false,
        })
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}
