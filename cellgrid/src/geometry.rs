//! Pure geometric primitives shared by the point and segment indexes.
//!
//! Everything here is stateless: squared distances for proximity filtering
//! and an exact segment-segment intersection predicate. Squared distances
//! are used throughout so that comparisons against a radius never need a
//! square root.

/// Squared Euclidean distance between `(x1, y1)` and `(x2, y2)`.
pub fn dist_sq(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    dx * dx + dy * dy
}

/// Squared distance from the point `(px, py)` to the segment
/// `(x1, y1)-(x2, y2)`.
///
/// The projection parameter is clamped to the segment, so points beyond an
/// endpoint measure against that endpoint. A zero-length segment degrades
/// to plain point distance.
pub fn point_segment_dist_sq(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let len_sq = dist_sq(x1, y1, x2, y2);
    if len_sq == 0.0 {
        return dist_sq(px, py, x1, y1);
    }
    let t = (((px - x1) * (x2 - x1) + (py - y1) * (y2 - y1)) / len_sq).clamp(0.0, 1.0);
    dist_sq(px, py, x1 + t * (x2 - x1), y1 + t * (y2 - y1))
}

/// Tests whether the segments `(x1, y1)-(x2, y2)` and `(x3, y3)-(x4, y4)`
/// intersect.
///
/// Touching at an endpoint counts as an intersection, and collinear
/// segments intersect when their projections onto the shared line overlap
/// (sharing a single endpoint included). Uses the 2D cross-product
/// determinant formulation: with direction vectors `r` and `s`, a non-zero
/// `r × s` gives a unique line crossing at parameters `t`, `u`, and the
/// segments meet iff both lie in `[0, 1]`.
#[allow(clippy::too_many_arguments)]
pub fn segments_intersect(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
    x4: f64,
    y4: f64,
) -> bool {
    let rx = x2 - x1;
    let ry = y2 - y1;
    let sx = x4 - x3;
    let sy = y4 - y3;
    let qpx = x3 - x1;
    let qpy = y3 - y1;

    let d = rx * sy - ry * sx;
    if d != 0.0 {
        let t = (qpx * sy - qpy * sx) / d;
        let u = (qpx * ry - qpy * rx) / d;
        return (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u);
    }

    let len_sq = rx * rx + ry * ry;
    if len_sq == 0.0 {
        // First segment degenerates to a point.
        return point_segment_dist_sq(x1, y1, x3, y3, x4, y4) == 0.0;
    }

    // Parallel lines are disjoint unless the segments are collinear.
    if qpx * ry - qpy * rx != 0.0 {
        return false;
    }

    // Collinear: project P3 and P4 onto the P1P2 parameter space and check
    // that the interval is not strictly disjoint from [0, 1].
    let t0 = (qpx * rx + qpy * ry) / len_sq;
    let t1 = ((x4 - x1) * rx + (y4 - y1) * ry) / len_sq;
    !((t0 < 0.0 && t1 < 0.0) || (t0 > 1.0 && t1 > 1.0))
}
