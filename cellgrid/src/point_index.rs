//! Exact lookup and proximity queries for indexed 2D points.

use serde::{Deserialize, Serialize};

use crate::cell::CellCoord;
use crate::error::GridResult;
use crate::geometry::{dist_sq, point_segment_dist_sq};
use crate::grid::{CellMap, ExtentCells, SegmentCells};

/// A stored point together with its attached value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointEntry<V> {
    pub x: f64,
    pub y: f64,
    pub value: V,
}

/// Uniform-grid index over 2D points.
///
/// Every point occupies exactly one cell, so exact lookups probe a single
/// bucket and proximity queries scan only the cells that can hold a match.
/// Coordinates are compared with exact float equality for lookup and
/// removal; duplicate coordinates are allowed and removal takes out one
/// match per call.
///
/// # Example
///
/// ```rust
/// use cellgrid::PointIndex;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut index = PointIndex::new(10.0)?;
/// index.add(12.0, 14.0, "foo");
/// index.add(18.0, 19.0, "baz");
///
/// assert_eq!(index.get(12.0, 14.0).map(|e| e.value), Some("foo"));
/// let near: Vec<_> = index.nearby(20.0, 18.0, 4.0).map(|(e, _)| e.value).collect();
/// assert_eq!(near, vec!["baz"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PointIndex<V> {
    grid: CellMap<PointEntry<V>>,
}

impl<V> PointIndex<V> {
    /// Creates an empty index with the given cell size.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GridError::InvalidCellSize`] if `cell_size` is not
    /// finite and positive.
    pub fn new(cell_size: f64) -> GridResult<Self> {
        Ok(Self {
            grid: CellMap::new(cell_size)?,
        })
    }

    /// Stores `value` at `(x, y)`. Always succeeds; duplicate coordinates
    /// are allowed.
    pub fn add(&mut self, x: f64, y: f64, value: V) {
        let coord = self.grid.cell_of(x, y);
        self.grid.push(coord, PointEntry { x, y, value });
    }

    /// Returns the first entry stored at exactly `(x, y)`.
    pub fn get(&self, x: f64, y: f64) -> Option<&PointEntry<V>> {
        let coord = self.grid.cell_of(x, y);
        self.grid.find(coord, |e| e.x == x && e.y == y)
    }

    /// Removes and returns one entry stored at exactly `(x, y)`.
    ///
    /// With duplicates present, the earliest-stored match goes first; once
    /// none remain, further calls return `None`.
    pub fn remove(&mut self, x: f64, y: f64) -> Option<PointEntry<V>> {
        let coord = self.grid.cell_of(x, y);
        let idx = self.grid.position(coord, |e| e.x == x && e.y == y)?;
        self.grid.remove_at(coord, idx)
    }

    /// Lazily yields every stored point within `radius` of `(cx, cy)`,
    /// paired with its squared distance to the center. Order is
    /// unspecified; each matching point is yielded exactly once.
    pub fn nearby(&self, cx: f64, cy: f64, radius: f64) -> NearbyPoints<'_, V> {
        NearbyPoints {
            grid: &self.grid,
            cells: self.grid.cells_under_extent(
                cx - radius,
                cy - radius,
                radius * 2.0,
                radius * 2.0,
            ),
            bucket: [].iter(),
            cx,
            cy,
            radius_sq: radius * radius,
        }
    }

    /// Lazily yields every stored point within `eps` of the segment
    /// `(x1, y1)-(x2, y2)`, paired with its squared distance to the
    /// segment.
    ///
    /// `eps` must not exceed the cell size: larger tolerances silently
    /// produce incomplete results, because candidate cells are taken from
    /// the segment traversal at that thickness.
    pub fn near_segment(
        &self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        eps: f64,
    ) -> PointsNearSegment<'_, V> {
        PointsNearSegment {
            grid: &self.grid,
            cells: self.grid.cells_under_segment(x1, y1, x2, y2, eps),
            bucket: [].iter(),
            x1,
            y1,
            x2,
            y2,
            eps_sq: eps * eps,
        }
    }

    /// The edge length of one grid cell.
    pub fn cell_size(&self) -> f64 {
        self.grid.cell_size()
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    /// Whether the index holds no points.
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Number of occupied cells, for diagnostics.
    pub fn occupied_cells(&self) -> usize {
        self.grid.occupied_cells()
    }

    /// Occupancy of every non-empty cell, for diagnostics.
    pub fn bucket_sizes(&self) -> impl Iterator<Item = (CellCoord, usize)> + '_ {
        self.grid.bucket_sizes()
    }

    /// The underlying cell storage, for advanced callers and test harnesses.
    pub fn grid(&self) -> &CellMap<PointEntry<V>> {
        &self.grid
    }
}

/// Lazy results of [`PointIndex::nearby`].
///
/// Borrows the index, so the index cannot be mutated while results are
/// still being consumed.
pub struct NearbyPoints<'a, V> {
    grid: &'a CellMap<PointEntry<V>>,
    cells: ExtentCells,
    bucket: std::slice::Iter<'a, PointEntry<V>>,
    cx: f64,
    cy: f64,
    radius_sq: f64,
}

impl<'a, V> Iterator for NearbyPoints<'a, V> {
    type Item = (&'a PointEntry<V>, f64);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            for entry in self.bucket.by_ref() {
                let d = dist_sq(self.cx, self.cy, entry.x, entry.y);
                if d <= self.radius_sq {
                    return Some((entry, d));
                }
            }
            let coord = self.cells.next()?;
            self.bucket = self.grid.bucket(coord).iter();
        }
    }
}

/// Lazy results of [`PointIndex::near_segment`].
///
/// Borrows the index, so the index cannot be mutated while results are
/// still being consumed.
pub struct PointsNearSegment<'a, V> {
    grid: &'a CellMap<PointEntry<V>>,
    cells: SegmentCells,
    bucket: std::slice::Iter<'a, PointEntry<V>>,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    eps_sq: f64,
}

impl<'a, V> Iterator for PointsNearSegment<'a, V> {
    type Item = (&'a PointEntry<V>, f64);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            for entry in self.bucket.by_ref() {
                let d = point_segment_dist_sq(entry.x, entry.y, self.x1, self.y1, self.x2, self.y2);
                if d <= self.eps_sq {
                    return Some((entry, d));
                }
            }
            let coord = self.cells.next()?;
            self.bucket = self.grid.bucket(coord).iter();
        }
    }
}
