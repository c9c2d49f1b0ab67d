//! Angle utilities used by the segment classifier and the projector.

/// Regularizer added to the horizontal run so vertical segments stay finite.
pub const SLOPE_EPSILON: f32 = 0.001;

/// Unsigned inclination of a direction `(dx, dy)` relative to the image
/// horizontal axis, in degrees within `[0, 90]`.
///
/// Antipodal directions are treated as equivalent, so swapping the endpoints
/// of a segment never changes the result.
#[inline]
pub fn inclination_deg(dx: f32, dy: f32) -> f32 {
    (dy.abs() / (dx.abs() + SLOPE_EPSILON)).atan().to_degrees()
}

/// Smallest unsigned difference between two inclinations in degrees.
#[inline]
pub fn inclination_difference_deg(a: f32, b: f32) -> f32 {
    (a - b).abs()
}

/// Sign of an offset as used by the steering rules: `1.0`, `-1.0`, or `0.0`.
#[inline]
pub fn offset_sign(offset: f32) -> f32 {
    if offset > 0.0 {
        1.0
    } else if offset < 0.0 {
        -1.0
    } else {
        0.0
    }
}
