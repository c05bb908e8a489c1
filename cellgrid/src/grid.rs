//! Sparse cell storage and the cell enumeration walks.
//!
//! [`CellMap`] owns the mapping from integer cell coordinates to buckets of
//! records; the point and segment indexes are thin layers over it. The two
//! enumerators answer the question "which cells can contain a match for
//! this query shape": [`ExtentCells`] for axis-aligned boxes and
//! [`SegmentCells`] for thick segments.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::cell::CellCoord;
use crate::error::{GridError, GridResult};

/// Sparse mapping from cell coordinates to buckets of records.
///
/// A coordinate is present in the map iff its bucket is non-empty: any
/// removal that empties a bucket also removes the key, so occupancy counts
/// never include ghost cells. Within a bucket, records keep insertion order
/// and duplicates are permitted, but the order carries no query-visible
/// meaning.
#[derive(Debug, Clone)]
pub struct CellMap<R> {
    cell_size: f64,
    cells: HashMap<CellCoord, Vec<R>>,
}

impl<R> CellMap<R> {
    /// Creates an empty map with the given cell size.
    pub fn new(cell_size: f64) -> GridResult<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize(cell_size));
        }
        log::debug!("creating cell map with cell size {}", cell_size);
        Ok(Self {
            cell_size,
            cells: HashMap::new(),
        })
    }

    /// The edge length of one grid cell.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Returns the cell containing the point `(x, y)`.
    pub fn cell_of(&self, x: f64, y: f64) -> CellCoord {
        CellCoord::of(x, y, self.cell_size)
    }

    /// Appends `record` to the bucket at `coord`, creating it if absent.
    pub fn push(&mut self, coord: CellCoord, record: R) {
        self.cells.entry(coord).or_default().push(record);
    }

    /// Records stored at `coord`; empty if the cell is unoccupied.
    pub fn bucket(&self, coord: CellCoord) -> &[R] {
        self.cells.get(&coord).map_or(&[], Vec::as_slice)
    }

    /// Position within the bucket at `coord` of the first record matching
    /// `pred`, or `None` if the cell is absent or nothing matches.
    pub fn position<F>(&self, coord: CellCoord, pred: F) -> Option<usize>
    where
        F: FnMut(&R) -> bool,
    {
        self.cells.get(&coord)?.iter().position(pred)
    }

    /// First record at `coord` matching `pred`.
    pub fn find<F>(&self, coord: CellCoord, mut pred: F) -> Option<&R>
    where
        F: FnMut(&R) -> bool,
    {
        self.cells.get(&coord)?.iter().find(|&r| pred(r))
    }

    /// Removes and returns the record at `idx` within the bucket at `coord`.
    ///
    /// Removing the last record drops the bucket key with it. Returns
    /// `None` if the cell is absent or `idx` is out of range; callers
    /// locate the record with [`CellMap::position`] first, so this path is
    /// a defensive no-op.
    pub fn remove_at(&mut self, coord: CellCoord, idx: usize) -> Option<R> {
        let Entry::Occupied(mut bucket) = self.cells.entry(coord) else {
            return None;
        };
        let records = bucket.get_mut();
        if idx >= records.len() {
            return None;
        }
        let record = records.remove(idx);
        if records.is_empty() {
            bucket.remove();
        }
        Some(record)
    }

    /// Number of occupied cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Total number of records stored across all cells.
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    /// Whether the map holds no records at all.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Occupancy of every non-empty cell, for diagnostics.
    pub fn bucket_sizes(&self) -> impl Iterator<Item = (CellCoord, usize)> + '_ {
        self.cells.iter().map(|(coord, bucket)| (*coord, bucket.len()))
    }

    /// Lazily enumerates the cells whose squares intersect the box
    /// `[x, x + w] × [y, y + h]`, in row-major order.
    pub fn cells_under_extent(&self, x: f64, y: f64, w: f64, h: f64) -> ExtentCells {
        ExtentCells::new(x, y, w, h, self.cell_size)
    }

    /// Lazily enumerates the distinct cells within `eps` of the segment
    /// `(x1, y1)-(x2, y2)`.
    ///
    /// See [`SegmentCells`] for the traversal contract.
    pub fn cells_under_segment(
        &self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        eps: f64,
    ) -> SegmentCells {
        SegmentCells::new(x1, y1, x2, y2, eps, self.cell_size)
    }

    /// [`CellMap::cells_under_segment`] at the default thickness of half a
    /// cell, the thickness used when storing segments.
    pub fn cells_under_segment_default(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> SegmentCells {
        self.cells_under_segment(x1, y1, x2, y2, self.cell_size / 2.0)
    }
}

/// Row-major iterator over the cells intersecting an axis-aligned box.
///
/// Yields each cell exactly once. Produced by
/// [`CellMap::cells_under_extent`].
#[derive(Debug, Clone)]
pub struct ExtentCells {
    min_x: i64,
    max_x: i64,
    max_y: i64,
    cx: i64,
    cy: i64,
}

impl ExtentCells {
    fn new(x: f64, y: f64, w: f64, h: f64, cell_size: f64) -> Self {
        let min = CellCoord::of(x, y, cell_size);
        let max = CellCoord::of(x + w, y + h, cell_size);
        let mut it = Self {
            min_x: min.x,
            max_x: max.x,
            max_y: max.y,
            cx: min.x,
            cy: min.y,
        };
        if max.x < min.x {
            // Degenerate box; exhaust immediately.
            it.cy = max.y + 1;
        }
        it
    }
}

impl Iterator for ExtentCells {
    type Item = CellCoord;

    fn next(&mut self) -> Option<CellCoord> {
        if self.cy > self.max_y {
            return None;
        }
        let item = CellCoord::new(self.cx, self.cy);
        if self.cx == self.max_x {
            self.cx = self.min_x;
            self.cy += 1;
        } else {
            self.cx += 1;
        }
        Some(item)
    }
}

/// Iterator over the distinct cells within `eps` of a line segment.
///
/// Implements a thickness-aware variant of Amanatides–Woo grid traversal.
/// The walk steps from the start cell toward the end cell one boundary
/// crossing at a time. At each walk point it emits the current cell, the
/// neighbor across every cell boundary lying within `eps` of that point,
/// and the diagonal neighbor whenever two adjacent boundaries are both
/// within `eps` (a segment grazing a corner needs cells the walk never
/// enters). After the end cell is reached the same emission runs once more
/// for the true endpoint, since the walk only checks thickness at the point
/// where each step begins.
///
/// A per-call seen set guarantees every cell is yielded at most once. The
/// number of walk steps is capped at the Manhattan cell distance between
/// the endpoints, which bounds the traversal even under degenerate
/// floating-point slopes. Axis-aligned segments never divide by the zero
/// direction component: the walk simply always advances along the other
/// axis. A zero-length segment skips the walk entirely and emits the
/// thickness neighborhood of its single point.
///
/// Produced by [`CellMap::cells_under_segment`].
#[derive(Debug, Clone)]
pub struct SegmentCells {
    cell_size: f64,
    eps: f64,
    // Segment geometry.
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    dx: f64,
    dy: f64,
    // Walk state: the current cell and the exact traversal point, which
    // sits on a cell boundary after the first step.
    cell: CellCoord,
    target: CellCoord,
    px: f64,
    py: f64,
    steps_left: u64,
    seen: HashSet<CellCoord>,
    pending: VecDeque<CellCoord>,
    state: WalkState,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum WalkState {
    Walking,
    EndpointEmit,
    Done,
}

impl SegmentCells {
    fn new(x1: f64, y1: f64, x2: f64, y2: f64, eps: f64, cell_size: f64) -> Self {
        let cell = CellCoord::of(x1, y1, cell_size);
        let target = CellCoord::of(x2, y2, cell_size);
        let steps_left = cell.x.abs_diff(target.x) + cell.y.abs_diff(target.y);
        Self {
            cell_size,
            eps,
            x1,
            y1,
            x2,
            y2,
            dx: x2 - x1,
            dy: y2 - y1,
            cell,
            target,
            px: x1,
            py: y1,
            steps_left,
            seen: HashSet::new(),
            pending: VecDeque::new(),
            state: WalkState::Walking,
        }
    }

    fn enqueue(&mut self, coord: CellCoord) {
        if self.seen.insert(coord) {
            self.pending.push_back(coord);
        }
    }

    /// Emits `cell` plus the neighbors across every boundary within `eps`
    /// of the point `(px, py)`, diagonals included.
    fn emit_around(&mut self, cell: CellCoord, px: f64, py: f64) {
        let left = cell.x as f64 * self.cell_size;
        let bottom = cell.y as f64 * self.cell_size;
        let near_left = px - left <= self.eps;
        let near_right = (left + self.cell_size) - px <= self.eps;
        let near_bottom = py - bottom <= self.eps;
        let near_top = (bottom + self.cell_size) - py <= self.eps;

        self.enqueue(cell);
        if near_left {
            self.enqueue(cell.offset(-1, 0));
        }
        if near_right {
            self.enqueue(cell.offset(1, 0));
        }
        if near_bottom {
            self.enqueue(cell.offset(0, -1));
        }
        if near_top {
            self.enqueue(cell.offset(0, 1));
        }
        if near_left && near_bottom {
            self.enqueue(cell.offset(-1, -1));
        }
        if near_left && near_top {
            self.enqueue(cell.offset(-1, 1));
        }
        if near_right && near_bottom {
            self.enqueue(cell.offset(1, -1));
        }
        if near_right && near_top {
            self.enqueue(cell.offset(1, 1));
        }
    }

    /// Moves one cell toward the target along whichever axis the segment
    /// crosses a boundary first, updating the traversal point to the exact
    /// crossing.
    fn advance(&mut self) {
        let left = self.cell.x as f64 * self.cell_size;
        let bottom = self.cell.y as f64 * self.cell_size;
        // Boundary the walk would cross next in each axis.
        let bx = if self.dx > 0.0 { left + self.cell_size } else { left };
        let by = if self.dy > 0.0 { bottom + self.cell_size } else { bottom };
        let wx = (bx - self.px).abs();
        let wy = (by - self.py).abs();

        // Division-free comparison of the crossing parameters
        // wx / |dx| vs wy / |dy|. A zero direction component never wins,
        // so axis-aligned segments always advance along the other axis.
        let step_x = if self.dx == 0.0 {
            false
        } else if self.dy == 0.0 {
            true
        } else {
            wx * self.dy.abs() <= wy * self.dx.abs()
        };

        if step_x {
            let t = (bx - self.x1) / self.dx;
            self.px = bx;
            self.py = self.y1 + t * self.dy;
            self.cell.x += if self.dx > 0.0 { 1 } else { -1 };
        } else {
            let t = (by - self.y1) / self.dy;
            self.py = by;
            self.px = self.x1 + t * self.dx;
            self.cell.y += if self.dy > 0.0 { 1 } else { -1 };
        }
    }
}

impl Iterator for SegmentCells {
    type Item = CellCoord;

    fn next(&mut self) -> Option<CellCoord> {
        loop {
            if let Some(coord) = self.pending.pop_front() {
                return Some(coord);
            }
            match self.state {
                WalkState::Walking => {
                    if self.cell == self.target || self.steps_left == 0 {
                        self.state = WalkState::EndpointEmit;
                    } else {
                        let (cell, px, py) = (self.cell, self.px, self.py);
                        self.emit_around(cell, px, py);
                        self.advance();
                        self.steps_left -= 1;
                    }
                }
                WalkState::EndpointEmit => {
                    // The walk checks thickness where each step starts, so
                    // the end cell is measured against the true endpoint.
                    let (target, x2, y2) = (self.target, self.x2, self.y2);
                    self.emit_around(target, x2, y2);
                    self.state = WalkState::Done;
                }
                WalkState::Done => return None,
            }
        }
    }
}
