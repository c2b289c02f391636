//! Tolerant field and row equality.
//!
//! Two numeric fields are equal when they agree on every digit up to a fixed number of
//! decimal places (four by default); digits beyond that are cut off, not rounded.
//! Everything else is compared byte-wise. Both the comparison and
//! [`ValueEquivalence::normalize`], which the row hash is built from, work on the same
//! truncated value, so equal rows always hash equally.

use std::borrow::Cow;

use crate::csv_hasher::hash_normalized_fields;
use crate::row::Row;

pub const DEFAULT_DECIMAL_DIGITS: u32 = 4;
pub const MAX_DECIMAL_DIGITS: u32 = 15;

/// Absorbs representation noise before truncating, e.g. `1.0001 * 1e4 = 10000.999…`.
const MIN_NUDGE: f64 = 1e-6;
const RELATIVE_NUDGE: f64 = 4.0 * f64::EPSILON;
const MAX_NUDGE: f64 = 0.5;
/// From 2^52 on every `f64` is integral.
const INTEGRAL_FROM: f64 = 4_503_599_627_370_496.0;

/// A numeric field reduced to what tolerant equality looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Truncated {
    /// The value times `10^digits`, truncated toward zero. Always integral, never `-0.0`.
    Units(f64),
    /// The value is too large to scale and carries no fractional digits anyway.
    Unscaled(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueEquivalence {
    decimal_digits: u32,
    factor: f64,
}

impl Default for ValueEquivalence {
    fn default() -> Self {
        Self::with_decimal_digits(DEFAULT_DECIMAL_DIGITS)
    }
}

impl ValueEquivalence {
    /// `decimal_digits` is clamped to [`MAX_DECIMAL_DIGITS`].
    pub fn with_decimal_digits(decimal_digits: u32) -> Self {
        let decimal_digits = decimal_digits.min(MAX_DECIMAL_DIGITS);
        Self {
            decimal_digits,
            factor: 10f64.powi(decimal_digits as i32),
        }
    }

    pub fn decimal_digits(&self) -> u32 {
        self.decimal_digits
    }

    /// `true` iff the whole field is a finite decimal number.
    #[inline]
    pub fn is_numeric(&self, field: &str) -> bool {
        parse_finite(field).is_some()
    }

    pub fn fields_equal(&self, a: &str, b: &str) -> bool {
        match (parse_finite(a), parse_finite(b)) {
            (Some(x), Some(y)) => self.truncate(x) == self.truncate(y),
            _ => a == b,
        }
    }

    pub fn rows_equal(&self, a: &Row, b: &Row) -> bool {
        a.len() == b.len()
            && a
                .iter()
                .zip(b.iter())
                .all(|(x, y)| self.fields_equal(x, y))
    }

    /// Numbers render with exactly `decimal_digits` decimals; other fields are returned
    /// unchanged.
    pub fn normalize<'a>(&self, field: &'a str) -> Cow<'a, str> {
        match parse_finite(field).map(|value| self.truncate(value)) {
            Some(Truncated::Units(units)) => {
                Cow::Owned(render_units(units, self.decimal_digits as usize))
            }
            Some(Truncated::Unscaled(value)) => Cow::Owned(value.to_string()),
            None => Cow::Borrowed(field),
        }
    }

    pub fn row_hash(&self, row: &Row) -> u64 {
        hash_normalized_fields(row.iter().map(|field| self.normalize(field)))
    }

    #[inline]
    fn truncate(&self, value: f64) -> Truncated {
        let scaled = value * self.factor;
        if !scaled.is_finite() {
            return Truncated::Unscaled(value);
        }
        if scaled.abs() >= INTEGRAL_FROM {
            return Truncated::Units(scaled + 0.0);
        }
        let nudge = (scaled.abs() * RELATIVE_NUDGE).clamp(MIN_NUDGE, MAX_NUDGE);
        // `+ 0.0` folds -0.0 into 0.0
        Truncated::Units((scaled + scaled.signum() * nudge).trunc() + 0.0)
    }
}

/// Renders integral `units` as a decimal with `digits` places, without going back
/// through floating point division.
fn render_units(units: f64, digits: usize) -> String {
    let magnitude = format!("{:.0}", units.abs());
    let sign = if units < 0.0 { "-" } else { "" };
    if digits == 0 {
        return format!("{}{}", sign, magnitude);
    }
    let padded = format!("{:0>width$}", magnitude, width = digits + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - digits);
    format!("{}{}.{}", sign, int_part, frac_part)
}

#[inline]
fn parse_finite(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|value| value.is_finite())
}
