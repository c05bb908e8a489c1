//! Exact lookup, removal and intersection queries for indexed 2D segments.

use serde::{Deserialize, Serialize};

use crate::cell::CellCoord;
use crate::error::GridResult;
use crate::geometry::segments_intersect;
use crate::grid::{CellMap, SegmentCells};

/// A stored segment together with its attached value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentEntry<V> {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub value: V,
}

impl<V> SegmentEntry<V> {
    /// Exact endpoint equality; the value is not compared.
    fn endpoints_match(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> bool {
        self.x1 == x1 && self.y1 == y1 && self.x2 == x2 && self.y2 == y2
    }
}

/// Uniform-grid index over 2D line segments.
///
/// A segment is replicated into every cell within half a cell size of its
/// path, so any query shape touching one of those cells sees it. Adding is
/// all-or-nothing: every covering cell receives one copy. Removal visits
/// the same cell set and is atomic — it verifies a match in every covering
/// cell before removing from any, so a failed removal leaves the index
/// untouched.
///
/// # Example
///
/// ```rust
/// use cellgrid::SegmentIndex;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut index = SegmentIndex::new(10.0)?;
/// index.add(16.0, 9.0, 15.0, 26.0, "bar");
///
/// let hits: Vec<_> = index
///     .intersecting_default(11.0, 19.0, 25.0, 16.0)
///     .map(|e| e.value)
///     .collect();
/// assert_eq!(hits, vec!["bar"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SegmentIndex<V> {
    grid: CellMap<SegmentEntry<V>>,
}

impl<V> SegmentIndex<V> {
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

    /// Stores `value` for the segment `(x1, y1)-(x2, y2)`, replicating the
    /// record into every covering cell. Always succeeds; duplicate
    /// segments are allowed.
    pub fn add(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, value: V)
    where
        V: Clone,
    {
        let covering: Vec<CellCoord> =
            self.grid.cells_under_segment_default(x1, y1, x2, y2).collect();
        log::trace!(
            "segment ({}, {})-({}, {}) covers {} cells",
            x1,
            y1,
            x2,
            y2,
            covering.len()
        );
        let entry = SegmentEntry { x1, y1, x2, y2, value };
        for coord in covering {
            self.grid.push(coord, entry.clone());
        }
    }

    /// Returns the first entry stored with exactly these endpoints.
    ///
    /// Only the cell containing `(x1, y1)` is probed: a stored segment's
    /// own start point always lies in one of its covering cells, so the
    /// single-bucket probe suffices for exact lookup.
    pub fn get(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> Option<&SegmentEntry<V>> {
        let coord = self.grid.cell_of(x1, y1);
        self.grid.find(coord, |e| e.endpoints_match(x1, y1, x2, y2))
    }

    /// Removes one segment stored with exactly these endpoints from every
    /// covering cell, returning the removed entry.
    ///
    /// The removal is atomic: a match is located in every covering cell
    /// before anything is removed, and if any cell lacks one the call
    /// returns `None` without mutating the index.
    pub fn remove(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Option<SegmentEntry<V>> {
        let covering: Vec<CellCoord> =
            self.grid.cells_under_segment_default(x1, y1, x2, y2).collect();

        // First pass: resolve a match in every covering cell.
        let mut positions = Vec::with_capacity(covering.len());
        for &coord in &covering {
            let idx = self
                .grid
                .position(coord, |e| e.endpoints_match(x1, y1, x2, y2))?;
            positions.push((coord, idx));
        }

        // Second pass: each cell is removed from exactly once, so the
        // positions resolved above stay valid.
        let mut removed = None;
        for (coord, idx) in positions {
            let entry = self.grid.remove_at(coord, idx);
            if removed.is_none() {
                removed = entry;
            }
        }
        removed
    }

    /// Lazily yields stored segments intersecting the query segment
    /// `(x1, y1)-(x2, y2)`, scanning the cells within `eps` of it.
    ///
    /// Every intersecting stored segment is yielded at least once. Because
    /// a stored segment is replicated across its covering cells, the same
    /// entry may be yielded more than once: only runs of consecutive
    /// duplicates are suppressed, and callers needing full de-duplication
    /// must apply their own.
    pub fn intersecting(
        &self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        eps: f64,
    ) -> Intersections<'_, V> {
        Intersections {
            grid: &self.grid,
            cells: self.grid.cells_under_segment(x1, y1, x2, y2, eps),
            bucket: [].iter(),
            x1,
            y1,
            x2,
            y2,
            last: None,
        }
    }

    /// [`SegmentIndex::intersecting`] at the default thickness of one unit.
    pub fn intersecting_default(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> Intersections<'_, V> {
        self.intersecting(x1, y1, x2, y2, 1.0)
    }

    /// The edge length of one grid cell.
    pub fn cell_size(&self) -> f64 {
        self.grid.cell_size()
    }

    /// Total number of stored records, counting every per-cell copy.
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    /// Whether the index holds no segments.
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
    pub fn grid(&self) -> &CellMap<SegmentEntry<V>> {
        &self.grid
    }
}

/// Lazy results of [`SegmentIndex::intersecting`].
///
/// Borrows the index, so the index cannot be mutated while results are
/// still being consumed. May yield the same stored segment more than once;
/// see [`SegmentIndex::intersecting`].
pub struct Intersections<'a, V> {
    grid: &'a CellMap<SegmentEntry<V>>,
    cells: SegmentCells,
    bucket: std::slice::Iter<'a, SegmentEntry<V>>,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    last: Option<&'a SegmentEntry<V>>,
}

impl<'a, V: PartialEq> Iterator for Intersections<'a, V> {
    type Item = &'a SegmentEntry<V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            for entry in self.bucket.by_ref() {
                if !segments_intersect(
                    self.x1, self.y1, self.x2, self.y2, entry.x1, entry.y1, entry.x2, entry.y2,
                ) {
                    continue;
                }
                // Suppress a repeat of the immediately preceding yield.
                if self.last.is_some_and(|prev| prev == entry) {
                    continue;
                }
                self.last = Some(entry);
                return Some(entry);
            }
            let coord = self.cells.next()?;
            self.bucket = self.grid.bucket(coord).iter();
        }
    }
}
