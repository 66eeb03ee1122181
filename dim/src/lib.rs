//! Dim - Dimensional-analysis expression evaluator
//!
//! Evaluates arithmetic over physical quantities, checks dimensional
//! consistency, and renders results in canonical SI units:
//!
//! ```
//! let engine = dim::Engine::new();
//! assert_eq!(engine.eval("2 kg * 9.8 m/s^2").unwrap(), "19.6 N");
//! assert_eq!(engine.eval("36 km/h -> m/s").unwrap(), "10 m/s");
//! ```

mod ast;
mod builtins;
mod constants;
mod eval;
mod lexer;
mod parser;

pub use ast::{BinOp, Expr, UnaryOp};
pub use builtins::BUILTINS;
pub use constants::ConstantTable;
pub use eval::{Evaluation, Evaluator};
pub use lexer::{tokenize, Operator, Span, Token, TokenKind};
pub use parser::{parse_expr, Parser, DEFAULT_MAX_DEPTH};

pub use dim_core::{codes, DimError, Dimension, ErrorReport, Power, Quantity};
pub use dim_units::{FormatOptions, Unit};

use dim_units::{format_in, format_quantity};
use std::sync::{Arc, LazyLock};
use tracing::{debug, trace};

/// Main Dim engine
///
/// Cloning is cheap: clones share one constant table.
#[derive(Debug, Clone)]
pub struct Engine {
    constants: Arc<ConstantTable>,
    max_depth: usize,
    format: FormatOptions,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_constants(Arc::new(ConstantTable::new()))
    }

    /// Engine over an existing, possibly shared, constant table
    pub fn with_constants(constants: Arc<ConstantTable>) -> Self {
        Self {
            constants,
            max_depth: DEFAULT_MAX_DEPTH,
            format: FormatOptions::default(),
        }
    }

    /// Limit on nested parentheses and function calls
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Render results with named display units (`N`, `J`, `Pa`) when one
    /// matches, or always as base-unit compounds
    pub fn with_named_units(mut self, enabled: bool) -> Self {
        self.format.named_units = enabled;
        self
    }

    pub fn constants(&self) -> &ConstantTable {
        &self.constants
    }

    fn parse(&self, input: &str) -> Result<Expr, DimError> {
        Parser::new(input)?.with_max_depth(self.max_depth).parse()
    }

    fn run(&self, input: &str) -> Result<Evaluation, DimError> {
        trace!(input, "evaluating");
        let expr = self.parse(input)?;
        let result = Evaluator::new(&self.constants).evaluate(&expr);
        match &result {
            Ok(evaluation) => trace!(input, value = evaluation.quantity.value, "evaluated"),
            Err(e) => trace!(input, code = e.code(), "evaluation failed"),
        }
        result
    }

    /// Evaluate and render as `"<magnitude> <unit>"`
    pub fn eval(&self, input: &str) -> Result<String, DimError> {
        let evaluation = self.run(input)?;
        match &evaluation.display {
            Some(unit) => format_in(&evaluation.quantity, unit),
            None => Ok(format_quantity(&evaluation.quantity, &self.format)),
        }
    }

    /// Evaluate to a quantity in canonical base units
    pub fn evaluate(&self, input: &str) -> Result<Quantity, DimError> {
        self.run(input).map(|e| e.quantity)
    }

    /// Bind `name` to the value of `expr`.
    ///
    /// `expr` is evaluated against the current table before anything is
    /// stored, so a failing definition leaves the table unchanged.
    ///
    /// Constants are only looked up where a value is expected. Right after
    /// a number's unit, `*` or `/` followed by a unit symbol extends that
    /// unit, so with `g` defined `2 kg * g` still means kilogram-grams.
    /// Write `g * 2 kg` or `2 kg * (g)` to use the constant.
    pub fn define(&self, name: &str, expr: &str) -> Result<(), DimError> {
        let name = parser::parse_name(name)?;
        let parsed = self.parse(expr)?;
        let value = Evaluator::new(&self.constants)
            .defining(name)
            .evaluate(&parsed)?
            .quantity;

        let previous = self.constants.insert(name, value);
        debug!(constant = name, value = value.value, dimension = %value.dimension, replaced = previous.is_some(), "defined constant");
        Ok(())
    }

    /// Remove a constant; unknown or malformed names are ignored
    pub fn clear(&self, name: &str) {
        let removed = match parser::parse_name(name) {
            Ok(name) => self.constants.remove(name).is_some(),
            Err(_) => false,
        };
        debug!(constant = name, removed, "cleared constant");
    }

    pub fn clear_all(&self) {
        let count = self.constants.len();
        self.constants.clear();
        debug!(count, "cleared all constants");
    }

    /// Current value of a constant, with `name` read the way `define` reads it
    pub fn lookup(&self, name: &str) -> Option<Quantity> {
        let name = parser::parse_name(name).ok()?;
        self.constants.lookup(name)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: LazyLock<Engine> = LazyLock::new(Engine::new);

/// Process-wide engine behind the free functions below
pub fn global() -> &'static Engine {
    &GLOBAL
}

/// Evaluate with the process-wide engine
pub fn eval(input: &str) -> Result<String, DimError> {
    global().eval(input)
}

/// Define a constant in the process-wide engine
pub fn define(name: &str, expr: &str) -> Result<(), DimError> {
    global().define(name, expr)
}

/// Remove a constant from the process-wide engine
pub fn clear(name: &str) {
    global().clear(name)
}

/// Remove every constant from the process-wide engine
pub fn clear_all() {
    global().clear_all()
}
