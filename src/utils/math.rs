//! Additional math helpers layered on top of `glam`.

use glam::DVec2;

/// Rotates `point` by `radian` around `pivot` (counter-clockwise in a Y-up frame).
pub fn rotate_about(point: DVec2, pivot: DVec2, radian: f64) -> DVec2 {
    let (sin, cos) = radian.sin_cos();
    let local = point - pivot;
    pivot + DVec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos)
}

/// Clamps `value` into `[min, max]`. Unlike `f64::clamp` this never panics when
/// the bounds are inverted; `min` wins in that case.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Two-dimensional cross product (z component of the 3D cross).
pub fn cross(a: DVec2, b: DVec2) -> f64 {
    a.x * b.y - a.y * b.x
}
