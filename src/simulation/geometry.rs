//! Geometric utility functions for headings, distances, and bounds.

use ndarray::Array1;

/// Returns the unit vector pointing along `angle` (radians).
pub fn heading_vector(angle: f32) -> Array1<f32> {
    Array1::from_vec(vec![angle.cos(), angle.sin()])
}

/// Euclidean distance between two points.
pub fn distance(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}

/// Angle of the vector from `from` to `to`, in radians.
pub fn angle_to(from: &Array1<f32>, to: &Array1<f32>) -> f32 {
    (to[1] - from[1]).atan2(to[0] - from[0])
}

/// Unit vector pointing from `from` to `to`, or zero when the points coincide.
pub fn unit_to(from: &Array1<f32>, to: &Array1<f32>) -> Array1<f32> {
    let d = distance(from, to);
    if d > f32::EPSILON {
        Array1::from_vec(vec![(to[0] - from[0]) / d, (to[1] - from[1]) / d])
    } else {
        Array1::zeros(2)
    }
}

/// Wraps an angle into the interval [-pi, pi].
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::PI;
    (angle + PI).rem_euclid(2.0 * PI) - PI
}

/// Clamps a position into the world rectangle [0, width] x [0, height].
///
/// Agents reaching a boundary stop there rather than wrapping around, so a
/// clamped position is always a valid world coordinate.
pub fn clamp_to_bounds(pos: &mut Array1<f32>, width: f32, height: f32) {
    pos[0] = pos[0].clamp(0.0, width);
    pos[1] = pos[1].clamp(0.0, height);
}

/// Whether a point lies inside the world rectangle.
pub fn in_bounds(pos: &Array1<f32>, width: f32, height: f32) -> bool {
    pos[0] >= 0.0 && pos[0] <= width && pos[1] >= 0.0 && pos[1] <= height
}
