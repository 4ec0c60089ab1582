//! Rendering clock
//!
//! Counts frames handed to the output device. The control side reads it to
//! timestamp parameter changes; the render callback advances it after every
//! buffer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared audio-clock position, in frames
#[derive(Clone, Debug, Default)]
pub struct RenderClock {
    frames: Arc<AtomicU64>,
}

impl RenderClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame index of the next sample to be rendered
    pub fn now(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    /// Called by the render path once a buffer has been written
    pub(crate) fn advance(&self, frames: u64) {
        self.frames.fetch_add(frames, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_position() {
        let clock = RenderClock::new();
        let render_side = clock.clone();

        render_side.advance(480);
        render_side.advance(480);

        assert_eq!(clock.now(), 960);
    }
}
