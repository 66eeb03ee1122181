//! Builtin functions
//!
//! The set is closed: a call to any other name fails with `UnknownFunction`.

use dim_core::{DimError, Dimension, Quantity};

/// Names accepted in call position
pub const BUILTINS: [&str; 14] = [
    "sqrt", "cbrt", "abs", "floor", "ceil", "round", "min", "max",
    "exp", "ln", "log10", "sin", "cos", "tan",
];

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains(&name)
}

/// Apply a builtin to already-evaluated arguments
pub fn call(name: &str, args: &[Quantity]) -> Result<Quantity, DimError> {
    match name {
        "sqrt" => unary(name, args)?.sqrt(),
        "cbrt" => unary(name, args)?.cbrt(),
        "abs" => Ok(map_value(unary(name, args)?, f64::abs)),
        "floor" => Ok(map_value(unary(name, args)?, f64::floor)),
        "ceil" => Ok(map_value(unary(name, args)?, f64::ceil)),
        "round" => Ok(map_value(unary(name, args)?, f64::round)),
        "min" => extremum(name, args, f64::min),
        "max" => extremum(name, args, f64::max),
        "exp" => transcendental(name, args, f64::exp),
        "ln" => transcendental(name, args, f64::ln),
        "log10" => transcendental(name, args, f64::log10),
        "sin" => transcendental(name, args, f64::sin),
        "cos" => transcendental(name, args, f64::cos),
        "tan" => transcendental(name, args, f64::tan),
        _ => Err(DimError::unknown_function(name)),
    }
}

fn unary(name: &str, args: &[Quantity]) -> Result<Quantity, DimError> {
    match args {
        [arg] => Ok(*arg),
        _ => Err(DimError::ArgumentCount {
            name: name.to_string(),
            expected: 1,
            found: args.len(),
        }),
    }
}

// Rounding and sign functions act on the canonical magnitude
fn map_value(q: Quantity, f: fn(f64) -> f64) -> Quantity {
    Quantity::new(f(q.value), q.dimension)
}

fn transcendental(name: &str, args: &[Quantity], f: fn(f64) -> f64) -> Result<Quantity, DimError> {
    let arg = unary(name, args)?;
    if !arg.is_dimensionless() {
        return Err(DimError::mismatch(arg.dimension, Dimension::DIMENSIONLESS));
    }
    Ok(Quantity::dimensionless(f(arg.value)))
}

fn extremum(name: &str, args: &[Quantity], pick: fn(f64, f64) -> f64) -> Result<Quantity, DimError> {
    let (first, rest) = args.split_first().ok_or_else(|| DimError::ArgumentCount {
        name: name.to_string(),
        expected: 1,
        found: 0,
    })?;

    rest.iter().try_fold(*first, |acc, q| {
        if !acc.is_compatible(q) {
            return Err(DimError::mismatch(acc.dimension, q.dimension));
        }
        Ok(Quantity::new(pick(acc.value, q.value), acc.dimension))
    })
}
