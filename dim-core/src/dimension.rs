//! Dimensional analysis types
//!
//! Each physical quantity has dimensions represented as a 7-element vector
//! of exact rational exponents:
//! [length, mass, time, current, temperature, amount, luminosity]

use std::fmt;
use serde::{Serialize, Deserialize};
use crate::rational::{self, int, Rational, ZERO};
use crate::DimError;

/// Number of SI base dimensions
pub const BASE_COUNT: usize = 7;

/// Dimension indices for the 7 SI base quantities
pub const LENGTH: usize = 0;
pub const MASS: usize = 1;
pub const TIME: usize = 2;
pub const CURRENT: usize = 3;
pub const TEMPERATURE: usize = 4;
pub const AMOUNT: usize = 5;
pub const LUMINOSITY: usize = 6;

/// Short names used when displaying a bare dimension
pub const BASE_NAMES: [&str; BASE_COUNT] = ["L", "M", "T", "I", "Θ", "N", "J"];

const fn base(index: usize) -> Dimension {
    let mut exponents = [ZERO; BASE_COUNT];
    exponents[index] = int(1);
    Dimension { exponents }
}

const fn dim(l: i64, m: i64, t: i64, i: i64) -> Dimension {
    Dimension {
        exponents: [int(l), int(m), int(t), int(i), ZERO, ZERO, ZERO],
    }
}

/// Represents the dimensions of a physical quantity
/// as exponents of the 7 SI base dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    /// [length, mass, time, current, temperature, amount, luminosity]
    pub exponents: [Rational; BASE_COUNT],
}

impl Dimension {
    /// Dimensionless quantity (all exponents zero)
    pub const DIMENSIONLESS: Dimension = Dimension { exponents: [ZERO; BASE_COUNT] };

    pub const LENGTH: Dimension = base(LENGTH);
    pub const MASS: Dimension = base(MASS);
    pub const TIME: Dimension = base(TIME);
    pub const CURRENT: Dimension = base(CURRENT);
    pub const TEMPERATURE: Dimension = base(TEMPERATURE);
    pub const AMOUNT: Dimension = base(AMOUNT);
    pub const LUMINOSITY: Dimension = base(LUMINOSITY);

    /// Velocity [L T^-1]
    pub const VELOCITY: Dimension = dim(1, 0, -1, 0);

    /// Acceleration [L T^-2]
    pub const ACCELERATION: Dimension = dim(1, 0, -2, 0);

    /// Force [M L T^-2]
    pub const FORCE: Dimension = dim(1, 1, -2, 0);

    /// Energy [M L^2 T^-2]
    pub const ENERGY: Dimension = dim(2, 1, -2, 0);

    /// Power [M L^2 T^-3]
    pub const POWER: Dimension = dim(2, 1, -3, 0);

    /// Pressure [M L^-1 T^-2]
    pub const PRESSURE: Dimension = dim(-1, 1, -2, 0);

    pub const AREA: Dimension = dim(2, 0, 0, 0);
    pub const VOLUME: Dimension = dim(3, 0, 0, 0);

    /// Frequency [T^-1]
    pub const FREQUENCY: Dimension = dim(0, 0, -1, 0);

    /// Electric charge [I T]
    pub const CHARGE: Dimension = dim(0, 0, 1, 1);

    /// Voltage [M L^2 T^-3 I^-1]
    pub const VOLTAGE: Dimension = dim(2, 1, -3, -1);

    /// Resistance [M L^2 T^-3 I^-2]
    pub const RESISTANCE: Dimension = dim(2, 1, -3, -2);

    /// Capacitance [M^-1 L^-2 T^4 I^2]
    pub const CAPACITANCE: Dimension = dim(-2, -1, 4, 2);

    /// Conductance [M^-1 L^-2 T^3 I^2]
    pub const CONDUCTANCE: Dimension = dim(-2, -1, 3, 2);

    /// Magnetic flux [M L^2 T^-2 I^-1]
    pub const MAGNETIC_FLUX: Dimension = dim(2, 1, -2, -1);

    /// Magnetic flux density [M T^-2 I^-1]
    pub const FLUX_DENSITY: Dimension = dim(0, 1, -2, -1);

    /// Inductance [M L^2 T^-2 I^-2]
    pub const INDUCTANCE: Dimension = dim(2, 1, -2, -2);

    /// Absorbed dose [L^2 T^-2]
    pub const DOSE: Dimension = dim(2, 0, -2, 0);

    /// Catalytic activity [N T^-1]
    pub const CATALYTIC_ACTIVITY: Dimension = Dimension {
        exponents: [ZERO, ZERO, int(-1), ZERO, ZERO, int(1), ZERO],
    };

    /// Illuminance [J L^-2]
    pub const ILLUMINANCE: Dimension = Dimension {
        exponents: [int(-2), ZERO, ZERO, ZERO, ZERO, ZERO, int(1)],
    };

    /// Create a new dimension from exponents
    pub fn new(exponents: [Rational; BASE_COUNT]) -> Self {
        Dimension { exponents }
    }

    /// Create a dimension from integer exponents
    pub fn from_ints(exponents: [i64; BASE_COUNT]) -> Self {
        Dimension { exponents: exponents.map(int) }
    }

    /// Check if this is a dimensionless quantity
    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(rational::is_zero)
    }

    /// Multiply dimensions (add exponents)
    pub fn multiply(&self, other: &Dimension) -> Result<Dimension, DimError> {
        self.zip_with(other, rational::add)
    }

    /// Divide dimensions (subtract exponents)
    pub fn divide(&self, other: &Dimension) -> Result<Dimension, DimError> {
        self.zip_with(other, rational::sub)
    }

    /// Raise to a rational power (multiply exponents)
    pub fn power(&self, exp: &Rational) -> Result<Dimension, DimError> {
        let mut result = [ZERO; BASE_COUNT];
        for (slot, e) in result.iter_mut().zip(&self.exponents) {
            *slot = rational::mul(e, exp).ok_or_else(|| DimError::IrrationalDimension {
                dimension: *self,
                exponent: rational::render(exp),
            })?;
        }
        Ok(Dimension { exponents: result })
    }

    fn zip_with(
        &self,
        other: &Dimension,
        op: fn(&Rational, &Rational) -> Option<Rational>,
    ) -> Result<Dimension, DimError> {
        let mut result = [ZERO; BASE_COUNT];
        for i in 0..BASE_COUNT {
            result[i] = op(&self.exponents[i], &other.exponents[i]).ok_or_else(|| {
                DimError::IrrationalDimension {
                    dimension: *self,
                    exponent: rational::render(&other.exponents[i]),
                }
            })?;
        }
        Ok(Dimension { exponents: result })
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        for (i, exp) in self.exponents.iter().enumerate() {
            if rational::is_zero(exp) {
                continue;
            }
            if *exp == int(1) {
                parts.push(BASE_NAMES[i].to_string());
            } else {
                parts.push(format!("{}^{}", BASE_NAMES[i], rational::render(exp)));
            }
        }

        if parts.is_empty() {
            write!(f, "1")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::DIMENSIONLESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational::ratio;

    #[test]
    fn test_dimensionless() {
        assert!(Dimension::DIMENSIONLESS.is_dimensionless());
        assert!(!Dimension::LENGTH.is_dimensionless());
    }

    #[test]
    fn test_multiply() {
        let velocity = Dimension::LENGTH.divide(&Dimension::TIME).unwrap();
        assert_eq!(velocity, Dimension::VELOCITY);
    }

    #[test]
    fn test_force() {
        // Force = Mass * Acceleration = M * L * T^-2
        let force = Dimension::MASS.multiply(&Dimension::ACCELERATION).unwrap();
        assert_eq!(force, Dimension::FORCE);
    }

    #[test]
    fn test_power() {
        let area = Dimension::LENGTH.power(&int(2)).unwrap();
        assert_eq!(area, Dimension::AREA);

        let root = Dimension::AREA.power(&ratio(1, 2).unwrap()).unwrap();
        assert_eq!(root, Dimension::LENGTH);
    }

    #[test]
    fn test_fractional_power_stays_exact() {
        let third = ratio(1, 3).unwrap();
        let cube_root = Dimension::LENGTH.power(&third).unwrap();
        let back = cube_root.power(&int(3)).unwrap();
        assert_eq!(back, Dimension::LENGTH);
    }

    #[test]
    fn test_power_overflow_is_reported() {
        let huge = Dimension::LENGTH.power(&int(i64::MAX)).unwrap();
        let err = huge.power(&int(2)).unwrap_err();
        assert!(matches!(err, DimError::IrrationalDimension { .. }));

        // i64::MIN could not be negated, so it counts as overflow too
        let inverse = Dimension::new([int(-i64::MAX), ZERO, ZERO, ZERO, ZERO, ZERO, ZERO]);
        let err = inverse.divide(&Dimension::LENGTH).unwrap_err();
        assert!(matches!(err, DimError::IrrationalDimension { .. }));
        assert_eq!(inverse.multiply(&Dimension::LENGTH).unwrap().exponents[0], int(1 - i64::MAX));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Dimension::DIMENSIONLESS), "1");
        assert_eq!(format!("{}", Dimension::LENGTH), "L");
        assert_eq!(format!("{}", Dimension::VELOCITY), "L T^-1");
        let half = Dimension::LENGTH.power(&ratio(1, 2).unwrap()).unwrap();
        assert_eq!(format!("{}", half), "L^(1/2)");
    }
}
