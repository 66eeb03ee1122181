//! Exact exponent arithmetic
//!
//! Dimension exponents are `i64` ratios kept in lowest terms, with a
//! numerator that is never `i64::MIN` so every exponent can be negated.
//! Every operation is checked: an exponent that no longer fits is reported
//! as `None` and turned into `IrrationalDimension` by the caller.

use num_rational::Ratio;
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, Zero};

pub type Rational = num_rational::Rational64;

pub const ZERO: Rational = Ratio::new_raw(0, 1);
pub const ONE: Rational = Ratio::new_raw(1, 1);

/// Integer exponent
pub const fn int(n: i64) -> Rational {
    Ratio::new_raw(n, 1)
}

/// Reduced `num/den`, `None` for a zero denominator or `i64::MIN` overflow
pub fn ratio(num: i64, den: i64) -> Option<Rational> {
    if den == 0 {
        return None;
    }
    // Ratio::new negates both sides when den < 0, which overflows on i64::MIN
    if den < 0 && (num == i64::MIN || den == i64::MIN) {
        return None;
    }
    in_range(Ratio::new(num, den))
}

fn in_range(r: Rational) -> Option<Rational> {
    (*r.numer() != i64::MIN).then_some(r)
}

pub fn add(a: &Rational, b: &Rational) -> Option<Rational> {
    a.checked_add(b).and_then(in_range)
}

pub fn sub(a: &Rational, b: &Rational) -> Option<Rational> {
    a.checked_sub(b).and_then(in_range)
}

pub fn mul(a: &Rational, b: &Rational) -> Option<Rational> {
    a.checked_mul(b).and_then(in_range)
}

/// `None` on overflow or a zero divisor
pub fn div(a: &Rational, b: &Rational) -> Option<Rational> {
    a.checked_div(b).and_then(in_range)
}

pub fn neg(r: &Rational) -> Option<Rational> {
    r.numer().checked_neg().map(|n| Ratio::new_raw(n, *r.denom()))
}

pub fn is_zero(r: &Rational) -> bool {
    r.is_zero()
}

/// Best `f64` approximation of the ratio
pub fn to_f64(r: &Rational) -> f64 {
    *r.numer() as f64 / *r.denom() as f64
}

/// Exact ratio of a decimal literal such as `0.5`, `12`, `2.5e-1`.
///
/// Returns `None` when the text is not a plain decimal or the exact value
/// does not fit an `i64` ratio.
pub fn parse_decimal(text: &str) -> Option<Rational> {
    let (mantissa, exp) = match text.find(['e', 'E']) {
        Some(pos) => (&text[..pos], text[pos + 1..].parse::<i32>().ok()?),
        None => (text, 0),
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = format!("{}{}", int_part, frac_part);
    let digits = digits.trim_start_matches('0');
    let numer: i64 = if digits.is_empty() { 0 } else { digits.parse().ok()? };

    let scale = exp.checked_sub(i32::try_from(frac_part.len()).ok()?)?;
    let pow10 = |n: u32| 10i64.checked_pow(n);
    if scale >= 0 {
        let factor = pow10(scale.unsigned_abs())?;
        Some(int(numer.checked_mul(factor)?))
    } else {
        let den = pow10(scale.unsigned_abs())?;
        ratio(numer, den)
    }
}

/// Render an exponent the way it is written back into unit text:
/// `2`, `-1`, `(1/2)`, `(-3/2)`
pub fn render(r: &Rational) -> String {
    if r.is_integer() {
        r.numer().to_string()
    } else {
        format!("({}/{})", r.numer(), r.denom())
    }
}
