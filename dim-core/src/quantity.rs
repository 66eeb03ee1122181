//! Quantity type - a magnitude in canonical base units with its dimension

use serde::{Serialize, Deserialize};
use crate::rational::{self, Rational};
use crate::{DimError, Dimension};

/// A physical quantity.
///
/// `value` is always expressed in canonical base units (m, kg, s, A, K,
/// mol, cd); display units only exist at parse and format time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub dimension: Dimension,
}

/// A literal exponent as written in an expression
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Power {
    pub value: f64,
    /// Exact value, when the literal is an exactly representable ratio
    pub exact: Option<Rational>,
}

impl Power {
    pub fn integer(n: i64) -> Self {
        Power {
            value: n as f64,
            exact: rational::ratio(n, 1),
        }
    }

    pub fn ratio(r: Rational) -> Self {
        Power {
            value: rational::to_f64(&r),
            exact: Some(r),
        }
    }

    /// A real exponent with no exact form
    pub fn real(value: f64) -> Self {
        Power { value, exact: None }
    }

    pub fn negate(&self) -> Self {
        Power {
            value: -self.value,
            exact: self.exact.and_then(|r| rational::neg(&r)),
        }
    }
}

impl Quantity {
    pub fn new(value: f64, dimension: Dimension) -> Self {
        Quantity { value, dimension }
    }

    /// Create a dimensionless quantity (pure number)
    pub fn dimensionless(value: f64) -> Self {
        Quantity {
            value,
            dimension: Dimension::DIMENSIONLESS,
        }
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimension.is_dimensionless()
    }

    /// Check if two quantities have the same dimension
    pub fn is_compatible(&self, other: &Quantity) -> bool {
        self.dimension == other.dimension
    }

    fn require_compatible(&self, other: &Quantity) -> Result<(), DimError> {
        if self.is_compatible(other) {
            Ok(())
        } else {
            Err(DimError::mismatch(self.dimension, other.dimension))
        }
    }

    pub fn add(&self, other: &Quantity) -> Result<Quantity, DimError> {
        self.require_compatible(other)?;
        Ok(Quantity::new(self.value + other.value, self.dimension))
    }

    pub fn sub(&self, other: &Quantity) -> Result<Quantity, DimError> {
        self.require_compatible(other)?;
        Ok(Quantity::new(self.value - other.value, self.dimension))
    }

    pub fn mul(&self, other: &Quantity) -> Result<Quantity, DimError> {
        let dimension = self.dimension.multiply(&other.dimension)?;
        Ok(Quantity::new(self.value * other.value, dimension))
    }

    pub fn div(&self, other: &Quantity) -> Result<Quantity, DimError> {
        if other.value == 0.0 {
            return Err(DimError::DivisionByZero);
        }
        let dimension = self.dimension.divide(&other.dimension)?;
        Ok(Quantity::new(self.value / other.value, dimension))
    }

    pub fn neg(&self) -> Quantity {
        Quantity::new(-self.value, self.dimension)
    }

    /// Raise to a literal power.
    ///
    /// Dimensionless bases accept any real exponent. A dimensioned base needs
    /// an exact rational exponent so the resulting exponents stay exact.
    pub fn pow(&self, power: &Power) -> Result<Quantity, DimError> {
        let exact = match power.exact {
            Some(r) => r,
            None if self.is_dimensionless() => {
                return Ok(Quantity::dimensionless(self.value.powf(power.value)));
            }
            None => {
                return Err(DimError::IrrationalDimension {
                    dimension: self.dimension,
                    exponent: power.value.to_string(),
                });
            }
        };

        let dimension = self.dimension.power(&exact)?;
        Ok(Quantity::new(pow_exact(self.value, &exact), dimension))
    }

    /// Square root; halves every exponent
    pub fn sqrt(&self) -> Result<Quantity, DimError> {
        self.pow(&Power::ratio(Rational::new_raw(1, 2)))
    }

    /// Cube root; real for negative magnitudes
    pub fn cbrt(&self) -> Result<Quantity, DimError> {
        self.pow(&Power::ratio(Rational::new_raw(1, 3)))
    }

    /// Magnitude expressed in a unit of the same dimension and `scale`
    pub fn value_in(&self, dimension: &Dimension, scale: f64) -> Result<f64, DimError> {
        if self.dimension != *dimension {
            return Err(DimError::mismatch(self.dimension, *dimension));
        }
        Ok(self.value / scale)
    }
}

fn pow_exact(base: f64, exp: &Rational) -> f64 {
    if exp.is_integer() {
        if let Ok(n) = i32::try_from(*exp.numer()) {
            return base.powi(n);
        }
    }
    let value = rational::to_f64(exp);
    // Odd roots of negative numbers have a real answer
    if base < 0.0 && exp.denom() % 2 == 1 {
        let magnitude = (-base).powf(value);
        return if exp.numer() % 2 == 0 { magnitude } else { -magnitude };
    }
    base.powf(value)
}
