//! Hyperbolic plane helpers (hyperboloid model)
//!
//! Node positions live in the Euclidean plane. They are lifted onto the upper
//! sheet of the unit hyperboloid `z = sqrt(1 + x² + y²)` whenever hyperbolic
//! geometry is needed, and squashed into the unit disk for rendering.
//!
//! All functions are pure.

use crate::error::{EngineError, EngineResult};
use crate::vector::{Vec2, Vec3};

/// Below this separation geodesic directions are numerically meaningless
pub const GEODESIC_EPSILON: f64 = 1e-6;

/// Project a Euclidean position into the disk used for rendering.
///
/// `(x, y) / (1 + x² + y²)`, scaled by `scale`. Every input lands inside the
/// disk of radius `scale / 2`.
pub fn disk_project(p: Vec2, scale: f64) -> Vec2 {
    let z = 1.0 + p.length_squared();
    Vec2::new(p.x / z, p.y / z) * scale
}

/// Inverse of [`disk_project`] on the branch `|p| <= 1`.
///
/// The projection folds `r` and `1/r` onto the same disk radius, so only
/// positions inside the unit circle round-trip. Inputs beyond the image of the
/// projection are clamped to its rim.
pub fn disk_unproject(q: Vec2, scale: f64) -> Vec2 {
    let q = q / scale;
    let s = q.length().min(0.5);
    if s == 0.0 {
        return Vec2::ZERO;
    }
    // smaller root of s·r² - r + s = 0, rationalized
    let r = 2.0 * s / (1.0 + (1.0 - 4.0 * s * s).sqrt());
    q / q.length() * r
}

/// Lift a Euclidean position onto the hyperboloid sheet
pub fn to_hyperboloid(p: Vec2) -> Vec3 {
    Vec3::new(p.x, p.y, (1.0 + p.length_squared()).sqrt())
}

/// Inverse of [`to_hyperboloid`]: drop the height coordinate
pub fn from_hyperboloid(h: Vec3) -> Vec2 {
    h.xy()
}

/// Minkowski bilinear form `ax·bx + ay·by − az·bz`
pub fn lorentz_product(a: Vec3, b: Vec3) -> f64 {
    a.x * b.x + a.y * b.y - a.z * b.z
}

/// Hyperbolic distance `acosh(−⟨a, b⟩)`.
///
/// For points on the sheet `−⟨a, b⟩ >= 1`; rounding can push it a hair below,
/// so the argument is clamped to 1 and coincident points give exactly 0.
pub fn hyperbolic_distance(a: Vec3, b: Vec3) -> f64 {
    (-lorentz_product(a, b)).max(1.0).acosh()
}

/// Move `p` along the geodesic towards `towards` by arc length `distance`.
///
/// Fails with [`EngineError::DegenerateGeometry`] when the two points are too
/// close for the geodesic direction to be defined.
pub fn translate_towards(p: Vec3, towards: Vec3, distance: f64) -> EngineResult<Vec3> {
    let d = hyperbolic_distance(p, towards);
    if d <= GEODESIC_EPSILON {
        return Err(EngineError::DegenerateGeometry { distance: d });
    }
    let v = (towards - p * d.cosh()) / d.sinh();
    Ok(p * distance.cosh() + v * distance.sinh())
}

/// Point reflection of `p` through `mirror`.
///
/// `p` is carried along the geodesic through `mirror` to the same distance on
/// the other side. A point sitting on the mirror is its own image.
pub fn reflect_through(p: Vec3, mirror: Vec3) -> Vec3 {
    let d = hyperbolic_distance(p, mirror);
    match translate_towards(p, mirror, 2.0 * d) {
        Ok(image) => image,
        Err(_) => p,
    }
}
