//! The metaball scalar field.
//!
//! ```text
//! field(p)  = Σ 1 / (‖p − g‖² + ε)
//! ∇field(p) = Σ −2 (p − g) / (‖p − g‖² + ε)²
//! ```
//!
//! The field is strictly positive and falls off monotonically with distance from every
//! generator, so points at or above the threshold are inside the blob.

use crate::types::{Point, Value, Vector};

/// Keeps the field finite at generator locations.
pub const FIELD_EPSILON: Value = 1e-6;

/// Normal used when the gradient vanishes or is not finite.
pub const FALLBACK_NORMAL: Vector = Vector::new(0.0, 1.0, 0.0);

/// Returns the field value at `p`.
#[inline]
pub fn value(p: &Point, generators: &[Point]) -> Value {
    generators
        .iter()
        .map(|g| 1.0 / ((p - g).norm_squared() + FIELD_EPSILON))
        .sum()
}

/// Returns the analytic gradient of [`value`] at `p`.
///
/// Points toward increasing field, i.e. into the solid.
#[inline]
pub fn gradient(p: &Point, generators: &[Point]) -> Vector {
    generators.iter().fold(Vector::zeros(), |acc, g| {
        let d = p - g;
        let denom = d.norm_squared() + FIELD_EPSILON;
        acc - d * (2.0 / (denom * denom))
    })
}

/// Returns the unit surface normal at `p`, pointing out of the solid.
///
/// Falls back to [`FALLBACK_NORMAL`] when the gradient is degenerate.
#[inline]
pub fn normal(p: &Point, generators: &[Point]) -> Vector {
    let outward = -gradient(p, generators);
    if !outward.iter().all(|c| c.is_finite()) {
        return FALLBACK_NORMAL;
    }
    outward
        .try_normalize(Value::MIN_POSITIVE)
        .filter(|n| n.iter().all(|c| c.is_finite()))
        .unwrap_or(FALLBACK_NORMAL)
}
