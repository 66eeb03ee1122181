//! Error taxonomy for every stage of evaluation
//!
//! Errors are local to a single call: they carry enough context to render a
//! human-readable message, and `report()` turns them into a structured,
//! serializable payload with a stable code and status.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::Dimension;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const LEX_ERROR: &str = "LEX_ERROR";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const UNDEFINED_CONSTANT: &str = "UNDEFINED_CONSTANT";
    pub const UNKNOWN_FUNCTION: &str = "UNKNOWN_FUNCTION";
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const DIMENSION_MISMATCH: &str = "DIMENSION_MISMATCH";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const IRRATIONAL_DIMENSION: &str = "IRRATIONAL_DIMENSION";
    pub const CYCLIC_DEFINITION: &str = "CYCLIC_DEFINITION";
}

/// What the lexer choked on
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("malformed number '{0}'")]
    MalformedNumber(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DimError {
    #[error("lex error at {position}: {kind}")]
    Lex { position: usize, kind: LexErrorKind },

    #[error("parse error at {position}: expected {expected}, found {found}")]
    Parse {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("undefined constant '{name}'")]
    UndefinedConstant { name: String },

    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("{name}() expects {expected} argument(s), got {found}")]
    ArgumentCount {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: Dimension, right: Dimension },

    #[error("division by zero")]
    DivisionByZero,

    #[error("exponent {exponent} applied to {dimension} is not representable")]
    IrrationalDimension { dimension: Dimension, exponent: String },

    #[error("cyclic definition: '{name}' refers to itself")]
    CyclicDefinition { name: String },
}

impl DimError {
    pub fn lex(position: usize, kind: LexErrorKind) -> Self {
        DimError::Lex { position, kind }
    }

    pub fn parse(position: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        DimError::Parse {
            position,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn undefined_constant(name: &str) -> Self {
        DimError::UndefinedConstant { name: name.to_string() }
    }

    pub fn unknown_function(name: &str) -> Self {
        DimError::UnknownFunction { name: name.to_string() }
    }

    pub fn mismatch(left: Dimension, right: Dimension) -> Self {
        DimError::DimensionMismatch { left, right }
    }

    pub fn cyclic(name: &str) -> Self {
        DimError::CyclicDefinition { name: name.to_string() }
    }

    /// Machine-readable code, stable across releases
    pub fn code(&self) -> &'static str {
        match self {
            DimError::Lex { .. } => codes::LEX_ERROR,
            DimError::Parse { .. } => codes::PARSE_ERROR,
            DimError::UndefinedConstant { .. } => codes::UNDEFINED_CONSTANT,
            DimError::UnknownFunction { .. } => codes::UNKNOWN_FUNCTION,
            DimError::ArgumentCount { .. } => codes::ARG_COUNT,
            DimError::DimensionMismatch { .. } => codes::DIMENSION_MISMATCH,
            DimError::DivisionByZero => codes::DIV_ZERO,
            DimError::IrrationalDimension { .. } => codes::IRRATIONAL_DIMENSION,
            DimError::CyclicDefinition { .. } => codes::CYCLIC_DEFINITION,
        }
    }

    /// Non-zero status code handed back across the call boundary
    pub fn status(&self) -> i32 {
        match self {
            DimError::Lex { .. } => 1,
            DimError::Parse { .. } => 2,
            DimError::UndefinedConstant { .. } => 3,
            DimError::UnknownFunction { .. } => 4,
            DimError::ArgumentCount { .. } => 5,
            DimError::DimensionMismatch { .. } => 6,
            DimError::DivisionByZero => 7,
            DimError::IrrationalDimension { .. } => 8,
            DimError::CyclicDefinition { .. } => 9,
        }
    }

    /// Source offset, for errors that have one
    pub fn position(&self) -> Option<usize> {
        match self {
            DimError::Lex { position, .. } | DimError::Parse { position, .. } => Some(*position),
            _ => None,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code().to_string(),
            status: self.status(),
            message: self.to_string(),
            position: self.position(),
        }
    }
}

/// Structured form of a `DimError`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,

    /// Status returned to the caller, never zero
    pub status: i32,

    /// Human-readable error message
    pub message: String,

    /// Byte offset into the expression, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_distinct_and_nonzero() {
        let errors = [
            DimError::lex(0, LexErrorKind::UnexpectedChar('$')),
            DimError::parse(0, "expression", "end of input"),
            DimError::undefined_constant("x"),
            DimError::unknown_function("f"),
            DimError::ArgumentCount { name: "sqrt".into(), expected: 1, found: 2 },
            DimError::mismatch(Dimension::LENGTH, Dimension::MASS),
            DimError::DivisionByZero,
            DimError::IrrationalDimension { dimension: Dimension::LENGTH, exponent: "0.3".into() },
            DimError::cyclic("x"),
        ];
        let mut seen: Vec<i32> = errors.iter().map(DimError::status).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), errors.len());
        assert!(seen.iter().all(|&s| s != 0));
    }

    #[test]
    fn test_display() {
        let err = DimError::mismatch(Dimension::LENGTH, Dimension::MASS);
        assert_eq!(err.to_string(), "dimension mismatch: L vs M");

        let err = DimError::lex(3, LexErrorKind::MalformedNumber("1.2.3".into()));
        assert_eq!(err.to_string(), "lex error at 3: malformed number '1.2.3'");
    }

    #[test]
    fn test_report_serializes() {
        let report = DimError::parse(4, "')'", "end of input").report();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["code"], "PARSE_ERROR");
        assert_eq!(json["status"], 2);
        assert_eq!(json["position"], 4);

        let report = DimError::DivisionByZero.report();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("position").is_none());
    }
}
