//! Rendering quantities back into unit text
//!
//! A result is shown in canonical units: either the single registered
//! display unit of its dimension (`N`, `Pa`, `m`) or a compound of base
//! symbols such as `m/s^2` or `kg/(m*s^2)`.

use dim_core::rational::{self, Rational};
use dim_core::{DimError, Dimension, Quantity, BASE_COUNT};
use crate::units::UNITS;
use crate::Unit;

/// Canonical symbol of each base dimension, in rendering order
pub const BASE_SYMBOLS: [&str; BASE_COUNT] = ["m", "kg", "s", "A", "K", "mol", "cd"];

/// Formatting switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Use a registered display unit (N, J, Pa, ...) when one matches
    pub named_units: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions { named_units: true }
    }
}

/// Render a quantity as `"<magnitude> <unit>"`, or just the magnitude when
/// it is dimensionless.
pub fn format_quantity(q: &Quantity, options: &FormatOptions) -> String {
    let magnitude = format_magnitude(q.value);
    let unit = unit_text(&q.dimension, options);
    if unit.is_empty() {
        magnitude
    } else {
        format!("{} {}", magnitude, unit)
    }
}

/// Render a quantity in an explicitly requested unit
pub fn format_in(q: &Quantity, unit: &Unit) -> Result<String, DimError> {
    let magnitude = format_magnitude(unit.magnitude_of(q)?);
    if unit.symbol.is_empty() {
        Ok(magnitude)
    } else {
        Ok(format!("{} {}", magnitude, unit.symbol))
    }
}

/// Shortest decimal that round-trips to the same `f64`
pub fn format_magnitude(value: f64) -> String {
    // -0 and 0 print the same
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

/// Unit expression for a dimension in canonical units; empty when
/// dimensionless.
pub fn unit_text(dimension: &Dimension, options: &FormatOptions) -> String {
    if dimension.is_dimensionless() {
        return String::new();
    }
    if options.named_units {
        if let Some(symbol) = UNITS.display_symbol(dimension) {
            return symbol.to_string();
        }
    }
    compound_text(dimension)
}

fn compound_text(dimension: &Dimension) -> String {
    let mut numerator: Vec<(&str, Rational)> = Vec::new();
    let mut denominator: Vec<(&str, Rational)> = Vec::new();

    for (symbol, exp) in BASE_SYMBOLS.iter().zip(dimension.exponents.iter()) {
        if rational::is_zero(exp) {
            continue;
        }
        // an exponent that cannot be negated stays signed in the numerator
        match rational::neg(exp) {
            Some(flipped) if *exp < rational::ZERO => denominator.push((*symbol, flipped)),
            _ => numerator.push((*symbol, *exp)),
        }
    }

    if numerator.is_empty() {
        // Nothing to divide: keep the signs on the exponents instead
        return BASE_SYMBOLS
            .iter()
            .zip(dimension.exponents.iter())
            .filter(|(_, exp)| !rational::is_zero(exp))
            .map(|(symbol, exp)| factor(symbol, exp))
            .collect::<Vec<_>>()
            .join("*");
    }

    let top = join(&numerator);
    match denominator.len() {
        0 => top,
        1 => format!("{}/{}", top, join(&denominator)),
        _ => format!("{}/({})", top, join(&denominator)),
    }
}

fn join(factors: &[(&str, Rational)]) -> String {
    factors
        .iter()
        .map(|(symbol, exp)| factor(symbol, exp))
        .collect::<Vec<_>>()
        .join("*")
}

fn factor(symbol: &str, exp: &Rational) -> String {
    if *exp == rational::ONE {
        symbol.to_string()
    } else {
        format!("{}^{}", symbol, rational::render(exp))
    }
}
