//! Dim Core - Fundamental types
//!
//! This crate provides the core types used throughout Dim:
//! - `Dimension`: exact rational exponents over the 7 SI base dimensions
//! - `Quantity`: an `f64` magnitude in canonical base units plus its dimension
//! - `Power`: a literal exponent, exact when it can be
//! - `DimError`: the error taxonomy shared by every stage of the pipeline

mod dimension;
mod error;
mod quantity;
pub mod rational;

pub use dimension::{Dimension, BASE_COUNT, BASE_NAMES};
pub use error::{codes, DimError, ErrorReport, LexErrorKind};
pub use quantity::{Power, Quantity};
pub use rational::Rational;

/// Result alias used across the workspace
pub type Result<T> = std::result::Result<T, DimError>;
