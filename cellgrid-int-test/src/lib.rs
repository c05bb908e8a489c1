//! Shared utilities for the cellgrid integration test-suite.
//!
//! The tests in this crate exercise the indexes only through their public
//! operations (plus the occupancy diagnostics), and cross-check every
//! query result against brute-force enumeration over the same shapes.

pub mod sample;

#[ctor::ctor]
fn init_logger() {
    colog::init();
}
