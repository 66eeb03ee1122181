//! Dim Units - Unit registry and quantity formatting
//!
//! Maps unit symbols to a dimension and a scale factor relative to the
//! canonical SI base units, with metric prefixes composed at lookup time.
//!
//! Categories:
//! - SI base (m, kg, s, A, K, mol, cd)
//! - Coherent derived (N, J, W, Pa, Hz, C, V, ohm, F, S, Wb, T, H, kat, ...)
//! - Length (in, ft, yd, mi, nmi, au, ly, pc)
//! - Mass (g, t, lb, oz, Da)
//! - Time (min, h, d, wk, yr)
//! - Volume (L, gal)
//! - Energy (eV, cal, Wh)
//! - Pressure (bar, atm, psi)
//! - Angle (rad, sr, deg)

mod format;
mod unit;
mod units;

pub use format::{format_in, format_magnitude, format_quantity, unit_text, FormatOptions, BASE_SYMBOLS};
pub use unit::Unit;
pub use units::{resolve, UnitRegistry, PREFIXES, UNITS};
