//! Shape sampling and brute-force reference queries.

use std::collections::HashSet;

use cellgrid::{point_segment_dist_sq, segments_intersect};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A stored point with a numeric id, as fed to both the index under test
/// and the brute-force reference.
pub type SampledPoint = (f64, f64, u32);

/// A stored segment with a numeric id.
pub type SampledSegment = (f64, f64, f64, f64, u32);

/// Deterministic shape generator over a square region around the origin.
pub struct Sampler {
    rng: StdRng,
    extent: f64,
}

impl Sampler {
    pub fn new(seed: u64, extent: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            extent,
        }
    }

    /// A random coordinate in `[-extent, extent]`.
    pub fn coord(&mut self) -> f64 {
        self.rng.random_range(-self.extent..=self.extent)
    }

    /// A random point in the sampling region.
    pub fn point(&mut self) -> (f64, f64) {
        (self.coord(), self.coord())
    }

    /// `count` random points with ids `0..count`.
    pub fn points(&mut self, count: u32) -> Vec<SampledPoint> {
        (0..count)
            .map(|id| {
                let (x, y) = self.point();
                (x, y, id)
            })
            .collect()
    }

    /// A random segment whose span in each axis is at most `max_len`.
    pub fn segment(&mut self, max_len: f64) -> (f64, f64, f64, f64) {
        let (x1, y1) = self.point();
        let dx = self.rng.random_range(-max_len..=max_len);
        let dy = self.rng.random_range(-max_len..=max_len);
        (x1, y1, x1 + dx, y1 + dy)
    }

    /// `count` random segments with ids `0..count`.
    pub fn segments(&mut self, count: u32, max_len: f64) -> Vec<SampledSegment> {
        (0..count)
            .map(|id| {
                let (x1, y1, x2, y2) = self.segment(max_len);
                (x1, y1, x2, y2, id)
            })
            .collect()
    }

    /// Points on a regular lattice with the given spacing, ids assigned in
    /// row-major order.
    pub fn lattice(&mut self, per_side: u32, spacing: f64) -> Vec<SampledPoint> {
        let mut points = Vec::new();
        for row in 0..per_side {
            for col in 0..per_side {
                let id = row * per_side + col;
                points.push((col as f64 * spacing, row as f64 * spacing, id));
            }
        }
        points
    }
}

/// Ids of all points within `radius` of `(cx, cy)`, by exhaustive scan.
pub fn nearby_brute_force(points: &[SampledPoint], cx: f64, cy: f64, radius: f64) -> HashSet<u32> {
    let radius_sq = radius * radius;
    points
        .iter()
        .filter(|(x, y, _)| {
            let dx = x - cx;
            let dy = y - cy;
            dx * dx + dy * dy <= radius_sq
        })
        .map(|&(_, _, id)| id)
        .collect()
}

/// Ids of all points within `eps` of the segment, by exhaustive scan.
pub fn near_segment_brute_force(
    points: &[SampledPoint],
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    eps: f64,
) -> HashSet<u32> {
    let eps_sq = eps * eps;
    points
        .iter()
        .filter(|(px, py, _)| point_segment_dist_sq(*px, *py, x1, y1, x2, y2) <= eps_sq)
        .map(|&(_, _, id)| id)
        .collect()
}

/// Ids of all segments intersecting the query segment, by exhaustive
/// pairwise testing.
pub fn intersecting_brute_force(
    segments: &[SampledSegment],
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
) -> HashSet<u32> {
    segments
        .iter()
        .filter(|(sx1, sy1, sx2, sy2, _)| {
            segments_intersect(x1, y1, x2, y2, *sx1, *sy1, *sx2, *sy2)
        })
        .map(|&(_, _, _, _, id)| id)
        .collect()
}
