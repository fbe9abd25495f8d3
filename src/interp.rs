use crate::types::{Point, Value};

/// Below this, two corner values are treated as equal.
const MIN_DENOMINATOR: Value = 1e-12;

// Return the interpolation factor t corresponding to iso_val, clamped to [0, 1].
// Falls back to the midpoint when the two values are (numerically) equal.
pub fn find_t(v0: Value, v1: Value, iso_val: Value) -> Value {
    let denom = v1 - v0;
    if !(denom.abs() > MIN_DENOMINATOR) {
        return 0.5;
    }
    let t = (iso_val - v0) / denom;
    if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) }
}

// Linear interpolation
pub fn lerp(a: Value, b: Value, t: Value) -> Value {
    a + (b - a) * t
}

// Linearly interpolate between two points by factor t
pub fn interpolate_points(p0: &Point, p1: &Point, t: Value) -> Point {
    Point::new(
        lerp(p0.x, p1.x, t),
        lerp(p0.y, p1.y, t),
        lerp(p0.z, p1.z, t),
    )
}
