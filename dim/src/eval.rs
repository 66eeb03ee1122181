//! Expression evaluator
//!
//! Walks the tree in post-order, left to right. The first error stops the
//! walk and is returned as is.

use std::collections::HashSet;

use dim_core::{DimError, Quantity};
use dim_units::Unit;
use crate::ast::{BinOp, Expr, UnaryOp};
use crate::builtins;
use crate::constants::ConstantTable;

/// Value of a whole input, plus the unit it should be shown in when the
/// input ended with a conversion
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub quantity: Quantity,
    pub display: Option<Unit>,
}

/// Evaluator over one constant table
pub struct Evaluator<'a> {
    constants: &'a ConstantTable,
    defining: HashSet<&'a str>,
}

impl<'a> Evaluator<'a> {
    pub fn new(constants: &'a ConstantTable) -> Self {
        Self {
            constants,
            defining: HashSet::new(),
        }
    }

    /// Mark a name as being defined; referencing it fails with
    /// `CyclicDefinition`
    pub fn defining(mut self, name: &'a str) -> Self {
        self.defining.insert(name);
        self
    }

    /// Evaluate a parsed input
    pub fn evaluate(&self, expr: &Expr) -> Result<Evaluation, DimError> {
        match expr {
            Expr::Convert(inner, unit) => {
                let quantity = self.eval_expr(inner)?;
                if quantity.dimension != unit.dimension {
                    return Err(DimError::mismatch(quantity.dimension, unit.dimension));
                }
                Ok(Evaluation {
                    quantity,
                    display: Some(unit.clone()),
                })
            }
            _ => Ok(Evaluation {
                quantity: self.eval_expr(expr)?,
                display: None,
            }),
        }
    }

    fn eval_expr(&self, expr: &Expr) -> Result<Quantity, DimError> {
        match expr {
            Expr::Literal(q) => Ok(*q),

            Expr::Identifier(name) => self.lookup(name),

            Expr::UnaryOp(UnaryOp::Neg, inner) => Ok(self.eval_expr(inner)?.neg()),

            Expr::BinaryOp(..) => self.eval_chain(expr),

            Expr::Power(base, power) => self.eval_expr(base)?.pow(power),

            Expr::Call(name, args) => {
                if !builtins::is_builtin(name) {
                    return Err(DimError::unknown_function(name));
                }
                let args = args
                    .iter()
                    .map(|a| self.eval_expr(a))
                    .collect::<Result<Vec<_>, _>>()?;
                builtins::call(name, &args)
            }

            // Conversion only appears at the top of an input
            Expr::Convert(inner, unit) => {
                let q = self.eval_expr(inner)?;
                if q.dimension != unit.dimension {
                    return Err(DimError::mismatch(q.dimension, unit.dimension));
                }
                Ok(q)
            }
        }
    }

    /// Fold a left-nested chain such as `a + b - c` in a loop, so long
    /// chains do not grow the stack
    fn eval_chain(&self, expr: &Expr) -> Result<Quantity, DimError> {
        let mut operands = Vec::new();
        let mut node = expr;
        while let Expr::BinaryOp(left, op, right) = node {
            operands.push((*op, right.as_ref()));
            node = left;
        }

        let mut acc = self.eval_expr(node)?;
        for (op, right) in operands.into_iter().rev() {
            let r = self.eval_expr(right)?;
            acc = match op {
                BinOp::Add => acc.add(&r),
                BinOp::Sub => acc.sub(&r),
                BinOp::Mul => acc.mul(&r),
                BinOp::Div => acc.div(&r),
            }?;
        }
        Ok(acc)
    }

    fn lookup(&self, name: &str) -> Result<Quantity, DimError> {
        if self.defining.contains(name) {
            return Err(DimError::cyclic(name));
        }
        self.constants
            .lookup(name)
            .ok_or_else(|| DimError::undefined_constant(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;
    use dim_core::Dimension;

    fn eval_with(table: &ConstantTable, input: &str) -> Result<Quantity, DimError> {
        let expr = parse_expr(input)?;
        Evaluator::new(table).evaluate(&expr).map(|e| e.quantity)
    }

    fn eval(input: &str) -> Result<Quantity, DimError> {
        eval_with(&ConstantTable::new(), input)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("1 + 2 * 3").unwrap(), Quantity::dimensionless(7.0));
        assert_eq!(eval("(1 + 2) * 3").unwrap(), Quantity::dimensionless(9.0));
        assert_eq!(eval("-2^2").unwrap(), Quantity::dimensionless(4.0));
        assert_eq!(eval("1 m + 1 m").unwrap(), Quantity::new(2.0, Dimension::LENGTH));
    }

    #[test]
    fn test_units_scale_into_base() {
        assert_eq!(eval("1 km + 500 m").unwrap(), Quantity::new(1500.0, Dimension::LENGTH));
        assert_eq!(eval("2 kg * 3 m/s^2").unwrap(), Quantity::new(6.0, Dimension::FORCE));
    }

    #[test]
    fn test_dimension_errors() {
        let err = eval("1 m + 1 s").unwrap_err();
        assert_eq!(err, DimError::mismatch(Dimension::LENGTH, Dimension::TIME));

        assert_eq!(eval("1 m / 0").unwrap_err(), DimError::DivisionByZero);

        // too many digits for an exact ratio
        let err = eval("(2 m)^0.12345678901234567891").unwrap_err();
        assert!(matches!(err, DimError::IrrationalDimension { .. }));
        assert!(eval("2^0.12345678901234567891").is_ok());

        let q = eval("(16 m)^0.25").unwrap();
        assert_eq!(q.dimension, Dimension::LENGTH.power(&dim_core::rational::ratio(1, 4).unwrap()).unwrap());
    }

    #[test]
    fn test_fractional_power() {
        let q = eval("(4 m^2)^(1/2)").unwrap();
        assert_eq!(q, Quantity::new(2.0, Dimension::LENGTH));
    }

    #[test]
    fn test_constants() {
        let table = ConstantTable::new();
        table.insert("g", Quantity::new(9.8, Dimension::ACCELERATION));

        let q = eval_with(&table, "g * 2 kg").unwrap();
        assert_eq!(q.dimension, Dimension::FORCE);
        assert!((q.value - 19.6).abs() < 1e-12);

        let err = eval_with(&table, "h * 2").unwrap_err();
        assert_eq!(err, DimError::undefined_constant("h"));
    }

    #[test]
    fn test_cycle_detected() {
        let table = ConstantTable::new();
        table.insert("x", Quantity::dimensionless(1.0));

        let expr = parse_expr("x + 1").unwrap();
        let err = Evaluator::new(&table).defining("x").evaluate(&expr).unwrap_err();
        assert_eq!(err, DimError::cyclic("x"));
    }

    #[test]
    fn test_calls() {
        assert_eq!(eval("sqrt(9 m^2)").unwrap(), Quantity::new(3.0, Dimension::LENGTH));
        assert_eq!(eval("max(1 m, 300 cm)").unwrap(), Quantity::new(3.0, Dimension::LENGTH));
        assert_eq!(eval("nope(1)").unwrap_err(), DimError::unknown_function("nope"));
    }

    #[test]
    fn test_first_error_wins() {
        let err = eval("undefined_a + 1 m / 0").unwrap_err();
        assert_eq!(err, DimError::undefined_constant("undefined_a"));

        // the mismatch is found before the later operand is looked up
        let err = eval("1 m + 1 s + undefined_b").unwrap_err();
        assert_eq!(err, DimError::mismatch(Dimension::LENGTH, Dimension::TIME));
    }

    #[test]
    fn test_long_chains() {
        let sum = vec!["1 m"; 1500].join(" + ");
        assert_eq!(eval(&sum).unwrap(), Quantity::new(1500.0, Dimension::LENGTH));

        assert_eq!(eval("8 - 4 - 2").unwrap(), Quantity::dimensionless(2.0));
        assert_eq!(eval("8 / 4 / 2").unwrap(), Quantity::dimensionless(1.0));
        assert_eq!(eval("2 * 3 + 4 * 5 - 6").unwrap(), Quantity::dimensionless(20.0));
    }

    #[test]
    fn test_conversion() {
        let table = ConstantTable::new();
        let expr = parse_expr("1500 m -> km").unwrap();
        let result = Evaluator::new(&table).evaluate(&expr).unwrap();
        assert_eq!(result.quantity, Quantity::new(1500.0, Dimension::LENGTH));
        assert_eq!(result.display.map(|u| u.symbol), Some("km".to_string()));

        let expr = parse_expr("1 s to m").unwrap();
        let err = Evaluator::new(&table).evaluate(&expr).unwrap_err();
        assert_eq!(err, DimError::mismatch(Dimension::TIME, Dimension::LENGTH));
    }
}
