//! Abstract Syntax Tree

use dim_core::{Power, Quantity};
use dim_units::Unit;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    /// Numeric literal, already scaled by its unit into base units
    Literal(Quantity),
    /// Reference into the constant table
    Identifier(String),
    UnaryOp(UnaryOp, Box<Expr>),
    BinaryOp(Box<Expr>, BinOp, Box<Expr>),
    /// `base ^ exponent`; the exponent is always a literal
    Power(Box<Expr>, Power),
    Call(String, Vec<Expr>),
    /// `expr -> unit`: render the result in a chosen unit
    Convert(Box<Expr>, Unit),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOp { Add, Sub, Mul, Div }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp { Neg }
