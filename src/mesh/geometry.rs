//! Per-triangle geometry kernel.
//!
//! These functions never fail. Degenerate input (coincident or collinear
//! points) yields a zero area and angles saturated towards `0` or `π`.

use nalgebra::{Point3, Vector3};

/// Area of the triangle `(p0, p1, p2)`, half the norm of the edge cross product.
///
/// ```
/// use cornermesh::mesh::geometry::triangle_area;
/// use nalgebra::Point3;
///
/// let a = triangle_area(
///     &Point3::new(0.0, 0.0, 0.0),
///     &Point3::new(1.0, 0.0, 0.0),
///     &Point3::new(0.0, 1.0, 0.0),
/// );
/// assert!((a - 0.5).abs() < 1e-12);
/// ```
#[inline]
pub fn triangle_area(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> f64 {
    0.5 * (p1 - p0).cross(&(p2 - p0)).norm()
}

/// Interior angle at `a` in the triangle `(a, b, c)`.
///
/// The cosine is clamped to `[-1, 1]` before `acos`. A zero-length edge
/// gives an angle of `0`.
#[inline]
pub fn angle_at(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;
    let denom = ab.norm() * ac.norm();
    if denom <= f64::MIN_POSITIVE {
        return 0.0;
    }
    (ab.dot(&ac) / denom).clamp(-1.0, 1.0).acos()
}

/// Interior angles at `p0`, `p1` and `p2`, in that order.
///
/// For a non-degenerate triangle the three values sum to `π`.
#[inline]
pub fn triangle_angles(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> [f64; 3] {
    [angle_at(p0, p1, p2), angle_at(p1, p2, p0), angle_at(p2, p0, p1)]
}

/// Cotangent of the angle at `a` in the triangle `(a, b, c)`.
///
/// Returns `0` when the triangle is (nearly) degenerate.
#[inline]
pub fn cotangent(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;
    let cross_norm = ab.cross(&ac).norm();
    if cross_norm < 1e-10 {
        0.0
    } else {
        ab.dot(&ac) / cross_norm
    }
}

/// Unit normal of `(p0, p1, p2)` following its winding; zero if degenerate.
#[inline]
pub fn triangle_normal(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Vector3<f64> {
    let n = (p1 - p0).cross(&(p2 - p0));
    let len = n.norm();
    if len > 1e-12 {
        n / len
    } else {
        Vector3::zeros()
    }
}
