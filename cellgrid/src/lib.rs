//! # Cellgrid - Uniform-Grid Spatial Indexing for 2D Points and Segments
//!
//! This crate provides a sparse uniform-grid spatial index over 2D
//! geometry. Shapes are bucketed by the integer grid cells they occupy, so
//! exact lookups, radius queries and pairwise intersection queries scan
//! only a handful of cells instead of every stored shape.
//!
//! ## Features
//!
//! - **Point index**: exact lookup, removal, radius queries and
//!   segment-proximity queries over stored points
//! - **Segment index**: exact lookup, atomic removal and intersection
//!   queries over stored segments
//! - **Thick segment traversal**: a thickness-aware grid walk that
//!   enumerates exactly the cells within a tolerance of a segment,
//!   including corner-grazing neighbors
//! - **Lazy queries**: all range and intersection results are iterators
//!   that compute the next match on demand
//! - **Sparse storage**: only occupied cells exist in memory, and emptied
//!   cells are dropped immediately
//!
//! ## Quick Start
//!
//! ```rust
//! use cellgrid::{PointIndex, SegmentIndex};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut points = PointIndex::new(10.0)?;
//! points.add(12.0, 14.0, "foo");
//! points.add(20.0, 16.0, "charlie");
//!
//! // Radius query: each match comes with its squared distance.
//! for (entry, dist_sq) in points.nearby(20.0, 18.0, 4.0) {
//!     println!("{} at {:.1}", entry.value, dist_sq.sqrt());
//! }
//!
//! let mut segments = SegmentIndex::new(10.0)?;
//! segments.add(16.0, 9.0, 15.0, 26.0, "bar");
//!
//! // Intersection query against all stored segments.
//! let hits: Vec<_> = segments
//!     .intersecting_default(11.0, 19.0, 25.0, 16.0)
//!     .map(|e| e.value)
//!     .collect();
//! assert_eq!(hits, vec!["bar"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! An index is single-threaded by design: mutation takes `&mut self` and
//! query iterators borrow the index, so the borrow checker rejects
//! mutation while results are still being consumed. There is no interior
//! mutability and no locking.

// Storage and traversal
pub mod cell;
pub mod grid;

// Geometry primitives
pub mod geometry;

// Indexes
pub mod point_index;
pub mod segment_index;

// Errors
pub mod error;

// Re-export storage and traversal types
pub use cell::CellCoord;
pub use grid::{CellMap, ExtentCells, SegmentCells};

// Re-export geometry primitives
pub use geometry::{dist_sq, point_segment_dist_sq, segments_intersect};

// Re-export index types
pub use point_index::{NearbyPoints, PointEntry, PointIndex, PointsNearSegment};
pub use segment_index::{Intersections, SegmentEntry, SegmentIndex};

// Re-export error types
pub use error::{GridError, GridResult};
