//! Gain law - head angle to per-ear volume
//!
//! The virtual source sits dead ahead of the listener's starting position.
//! Turning the head right (positive angle) attenuates the left ear, turning
//! left attenuates the right ear:
//!
//! ```text
//! n     = normalize(angle)               // (-180, 180]
//! left  = cos(max(0,  n) in radians)^2
//! right = cos(max(0, -n) in radians)^2
//! ```
//!
//! Past ±90° the cosine goes negative and squaring makes the gain rise again
//! towards ±180°. That behaviour is kept as-is.

use std::f64::consts::PI;

/// Listener head rotation in degrees, as received from the UI
///
/// Any value is accepted. Use [`HeadOrientation::normalized`] before doing
/// math with it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeadOrientation {
    degrees: f64,
}

impl HeadOrientation {
    /// Wrap a raw angle. Non-finite input is treated as facing forward.
    pub fn new(degrees: f64) -> Self {
        let degrees = if degrees.is_finite() { degrees } else { 0.0 };
        Self { degrees }
    }

    /// The angle exactly as it was supplied
    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    /// Canonical angle in (-180, 180]
    pub fn normalized(&self) -> f64 {
        let n = (((self.degrees % 360.0) + 540.0) % 360.0) - 180.0;
        if n <= -180.0 {
            180.0
        } else {
            n
        }
    }
}

/// Linear gains for the two ears, each in [0, 1]
///
/// Only built through `GainPair::new`, which clamps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GainPair {
    left: f32,
    right: f32,
}

impl GainPair {
    /// Full gain on both ears (source dead ahead)
    pub const NEUTRAL: GainPair = GainPair {
        left: 1.0,
        right: 1.0,
    };

    /// Create a pair, clamping both values into [0, 1]
    pub fn new(left: f32, right: f32) -> Self {
        Self {
            left: clamp_unit(left),
            right: clamp_unit(right),
        }
    }

    pub fn left(&self) -> f32 {
        self.left
    }

    pub fn right(&self) -> f32 {
        self.right
    }

    /// Whole-percent readings for display, rounded half up
    pub fn percentages(&self) -> (u8, u8) {
        let pct = |g: f32| (g * 100.0).round() as u8;
        (pct(self.left), pct(self.right))
    }
}

impl Default for GainPair {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Compute the per-ear gains for a head angle in degrees
///
/// Pure and deterministic: the same angle always yields the same pair.
pub fn compute_gains(degrees: f64) -> GainPair {
    HeadOrientation::new(degrees).gains()
}

impl HeadOrientation {
    /// Apply the gain law to this orientation
    pub fn gains(&self) -> GainPair {
        let n = self.normalized();

        let left_raw = (n.max(0.0) * PI / 180.0).cos();
        let right_raw = ((-n).max(0.0) * PI / 180.0).cos();

        GainPair::new((left_raw * left_raw) as f32, (right_raw * right_raw) as f32)
    }
}
