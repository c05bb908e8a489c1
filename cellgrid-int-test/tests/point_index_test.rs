//! Sampling-based correctness tests for the point index.
//!
//! Every query result is cross-checked against brute-force enumeration
//! over the same sampled shapes, using only the index's public operations
//! plus the occupancy diagnostics.

use std::collections::HashSet;

use cellgrid::PointIndex;
use cellgrid_int_test::sample::{near_segment_brute_force, nearby_brute_force, Sampler};

const CELL_SIZE: f64 = 10.0;

#[test]
fn random_points_round_trip() {
    let mut sampler = Sampler::new(1, 200.0);
    let points = sampler.points(500);

    let mut index = PointIndex::new(CELL_SIZE).unwrap();
    for &(x, y, id) in &points {
        index.add(x, y, id);
    }
    assert_eq!(index.len(), points.len());

    for &(x, y, id) in &points {
        let entry = index.get(x, y).unwrap();
        assert_eq!(entry.value, id);
        assert_eq!((entry.x, entry.y), (x, y));
    }
}

#[test]
fn random_points_exact_miss() {
    let mut sampler = Sampler::new(2, 200.0);
    let points = sampler.points(200);

    let mut index = PointIndex::new(CELL_SIZE).unwrap();
    for &(x, y, id) in &points {
        index.add(x, y, id);
    }

    // Fresh random coordinates never collide with the stored set.
    let stored: HashSet<(u64, u64)> = points
        .iter()
        .map(|(x, y, _)| (x.to_bits(), y.to_bits()))
        .collect();
    for _ in 0..200 {
        let (x, y) = sampler.point();
        if stored.contains(&(x.to_bits(), y.to_bits())) {
            continue;
        }
        assert!(index.get(x, y).is_none());
    }
}

#[test]
fn random_removal_then_find() {
    let mut sampler = Sampler::new(3, 100.0);
    let points = sampler.points(300);

    let mut index = PointIndex::new(CELL_SIZE).unwrap();
    for &(x, y, id) in &points {
        index.add(x, y, id);
    }

    for &(x, y, id) in &points {
        let removed = index.remove(x, y).unwrap();
        assert_eq!(removed.value, id);
        assert!(index.get(x, y).is_none());
        // Second removal of the same coordinates finds nothing.
        assert!(index.remove(x, y).is_none());
    }
    assert!(index.is_empty());
    assert_eq!(index.occupied_cells(), 0);
}

#[test]
fn random_range_queries_match_brute_force() {
    let mut sampler = Sampler::new(4, 150.0);
    let points = sampler.points(800);

    let mut index = PointIndex::new(CELL_SIZE).unwrap();
    for &(x, y, id) in &points {
        index.add(x, y, id);
    }

    for _ in 0..100 {
        let (cx, cy) = sampler.point();
        let radius = sampler.coord().abs() / 4.0;

        let expected = nearby_brute_force(&points, cx, cy, radius);
        let found: HashSet<u32> = index.nearby(cx, cy, radius).map(|(e, _)| e.value).collect();
        assert_eq!(
            found, expected,
            "range query mismatch at center ({}, {}) radius {}",
            cx, cy, radius
        );
    }
}

#[test]
fn range_query_reports_exact_squared_distances() {
    let mut sampler = Sampler::new(5, 100.0);
    let points = sampler.points(300);

    let mut index = PointIndex::new(CELL_SIZE).unwrap();
    for &(x, y, id) in &points {
        index.add(x, y, id);
    }

    let (cx, cy) = (12.5, -40.0);
    for (entry, dist_sq) in index.nearby(cx, cy, 35.0) {
        let dx = entry.x - cx;
        let dy = entry.y - cy;
        assert_eq!(dist_sq, dx * dx + dy * dy);
        assert!(dist_sq <= 35.0 * 35.0);
    }
}

#[test]
fn lattice_points_range_query() {
    let mut sampler = Sampler::new(6, 0.0);
    // 20x20 lattice at spacing 5: four points per cell.
    let points = sampler.lattice(20, 5.0);

    let mut index = PointIndex::new(CELL_SIZE).unwrap();
    for &(x, y, id) in &points {
        index.add(x, y, id);
    }
    assert_eq!(index.occupied_cells(), 100);

    let expected = nearby_brute_force(&points, 50.0, 50.0, 12.0);
    let found: HashSet<u32> = index.nearby(50.0, 50.0, 12.0).map(|(e, _)| e.value).collect();
    assert_eq!(found, expected);
}

#[test]
fn near_segment_results_are_sound() {
    let mut sampler = Sampler::new(7, 150.0);
    let points = sampler.points(600);
    let eps = CELL_SIZE / 2.0;

    let mut index = PointIndex::new(CELL_SIZE).unwrap();
    for &(x, y, id) in &points {
        index.add(x, y, id);
    }

    for _ in 0..50 {
        let (x1, y1, x2, y2) = sampler.segment(80.0);
        let mut found = HashSet::new();
        for (entry, dist_sq) in index.near_segment(x1, y1, x2, y2, eps) {
            // Every yielded point genuinely lies within eps of the segment.
            assert!(dist_sq <= eps * eps);
            let recomputed =
                cellgrid::point_segment_dist_sq(entry.x, entry.y, x1, y1, x2, y2);
            assert_eq!(dist_sq, recomputed);
            found.insert(entry.value);
        }
        let all_within = near_segment_brute_force(&points, x1, y1, x2, y2, eps);
        assert!(found.is_subset(&all_within));
    }
}

#[test]
fn near_segment_finds_points_around_known_segment() {
    let mut index = PointIndex::new(CELL_SIZE).unwrap();
    // Points hand-placed around the segment (10, 15)-(70, 15).
    index.add(10.0, 15.0, "start");
    index.add(70.0, 15.0, "end");
    index.add(40.0, 18.0, "above");
    index.add(40.0, 12.0, "below");
    index.add(25.0, 15.0, "on");
    index.add(40.0, 25.0, "too_far");
    index.add(90.0, 15.0, "past_end");

    let found: HashSet<&str> = index
        .near_segment(10.0, 15.0, 70.0, 15.0, 4.0)
        .map(|(e, _)| e.value)
        .collect();
    assert_eq!(found, HashSet::from(["start", "end", "above", "below", "on"]));
}

#[test]
fn occupancy_diagnostics_are_consistent() {
    let mut sampler = Sampler::new(8, 100.0);
    let points = sampler.points(400);

    let mut index = PointIndex::new(CELL_SIZE).unwrap();
    for &(x, y, id) in &points {
        index.add(x, y, id);
    }

    let total: usize = index.bucket_sizes().map(|(_, n)| n).sum();
    assert_eq!(total, index.len());
    assert_eq!(index.bucket_sizes().count(), index.occupied_cells());
    assert!(index.bucket_sizes().all(|(_, n)| n > 0));
}
