//! Panning module - maps head rotation to per-ear gain
//!
//! This module provides:
//! - `HeadOrientation` for angle normalization
//! - `GainPair` for the left/right channel volumes
//! - `compute_gains`, the cosine-squared gain law

mod law;

pub use law::{compute_gains, GainPair, HeadOrientation};
