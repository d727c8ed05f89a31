//! Geometry primitives consumed by the wall topology builder and solvers.
//!
//! Vector arithmetic comes from `glam`; positions and velocities are
//! double-precision 3-D vectors.  Orientation tests project onto the x/y
//! plane, which is the plane agents move in.

pub use glam::DVec3 as Vec3;

/// 2-D determinant of the x/y components: `a.x * b.y - a.y * b.x`.
#[inline]
pub fn det2(a: Vec3, b: Vec3) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Orientation of `c` relative to the directed line `a → b`.
///
/// Computed as `det(a - c, b - a)`.  Positive when `c` lies to the left of
/// the line, negative to the right, zero when the three points are
/// collinear.  Walking a polygon boundary `a → b → c`, a non-negative value
/// at `b` means the boundary does not bend back by more than a straight
/// angle, i.e. the vertex is convex.
#[inline]
pub fn left_of(a: Vec3, b: Vec3, c: Vec3) -> f64 {
    det2(a - c, b - a)
}

/// Unit vector pointing from `from` to `to`.
///
/// Returns the zero vector when the points coincide, rather than NaN.
#[inline]
pub fn unit_between(from: Vec3, to: Vec3) -> Vec3 {
    (to - from).normalize_or_zero()
}

/// Squared distance from `p` to the segment `a → b`.
///
/// Used by neighbor search to rank wall segments; degenerate segments
/// collapse to a point distance.
pub fn dist_sq_point_segment(a: Vec3, b: Vec3, p: Vec3) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        return p.distance_squared(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance_squared(a + ab * t)
}
