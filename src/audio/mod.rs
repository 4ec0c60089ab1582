//! Audio module - signal graph and output lifecycle
//!
//! This module provides:
//! - Tone source, channel gains and stereo merge wired into a signal graph
//! - Rendering clock for scheduling gain changes
//! - Output device abstraction with a cpal implementation
//! - `AudioSession`, the start/stop state machine

mod clock;
mod gain;
mod graph;
mod merge;
mod output;
mod session;
mod tone;

#[cfg(test)]
pub(crate) mod offline;

// Re-export public types
#[allow(unused_imports)]
pub use clock::RenderClock;
#[allow(unused_imports)]
pub use gain::{Automation, GainControl, GainSchedule, ScheduleReader};
#[allow(unused_imports)]
pub use graph::{GraphHandles, SessionConfig, SignalGraph, StreamFormat};
pub use merge::StereoMerge;
pub use output::{CpalOutput, OutputDevice, OutputStream};
pub use session::{AudioSession, PlaybackState};
pub use tone::ToneSource;
