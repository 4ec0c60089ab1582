//! Channel gain control with time-scheduled parameter changes
//!
//! Split in two halves:
//! - `GainSchedule` lives on the control side. `set_pair_at_time()` records
//!   the newest left/right target together with the audio-clock frame it
//!   should start at, in a single write.
//! - `GainControl` is one channel's gain stage inside the signal graph. The
//!   graph reads the schedule once per block and hands each channel its half
//!   of the pair with the same start frame, so both ears move together.
//!
//! The shared state is one slot holding the whole pair; only the latest pair
//! matters. The audio thread never waits for the lock.

use std::sync::{Arc, RwLock};

use crate::panning::GainPair;

/// A scheduled gain pair
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Automation {
    pub gains: GainPair,
    /// Audio-clock frame at which the change begins
    pub at_frame: u64,
    /// Bumped on every write so the render side can spot new values
    serial: u64,
}

/// Control-side handle to the two channel gains
#[derive(Clone, Debug)]
pub struct GainSchedule {
    shared: Arc<RwLock<Automation>>,
}

impl GainSchedule {
    pub fn new(initial: GainPair) -> Self {
        Self {
            shared: Arc::new(RwLock::new(Automation {
                gains: initial,
                at_frame: 0,
                serial: 0,
            })),
        }
    }

    /// Schedule `gains` to take effect at audio-clock frame `at_frame`
    ///
    /// Replaces any pair that has not been picked up yet.
    pub fn set_pair_at_time(&self, gains: GainPair, at_frame: u64) {
        let mut slot = match self.shared.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        slot.gains = gains;
        slot.at_frame = at_frame;
        slot.serial = slot.serial.wrapping_add(1);
    }

    /// Most recently scheduled pair and its start frame
    #[cfg(test)]
    pub fn latest(&self) -> Automation {
        self.snapshot()
    }

    fn snapshot(&self) -> Automation {
        match self.shared.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Render-side reader starting from the current pair
    pub fn reader(&self) -> ScheduleReader {
        let initial = self.snapshot();
        ScheduleReader {
            schedule: self.clone(),
            seen_serial: initial.serial,
        }
    }
}

/// Audio-thread view of a `GainSchedule`
pub struct ScheduleReader {
    schedule: GainSchedule,
    seen_serial: u64,
}

impl ScheduleReader {
    /// Pair written since the last poll, if any. Never blocks.
    pub fn poll(&mut self) -> Option<Automation> {
        // On contention report nothing and retry next block
        let latest = self.schedule.shared.try_read().ok().map(|guard| *guard)?;
        if latest.serial == self.seen_serial {
            return None;
        }
        self.seen_serial = latest.serial;
        Some(latest)
    }
}

/// Linear ramp between gain values
#[derive(Debug, Clone)]
struct Ramp {
    current: f32,
    target: f32,
    step: f32,
    samples_remaining: u32,
    ramp_samples: u32,
}

impl Ramp {
    fn new(initial: f32, ramp_samples: u32) -> Self {
        Self {
            current: initial,
            target: initial,
            step: 0.0,
            samples_remaining: 0,
            ramp_samples: ramp_samples.max(1),
        }
    }

    fn set_target(&mut self, target: f32) {
        if (target - self.target).abs() < f32::EPSILON {
            return;
        }
        self.target = target;
        self.samples_remaining = self.ramp_samples;
        self.step = (self.target - self.current) / self.samples_remaining as f32;
    }

    #[inline]
    fn next(&mut self) -> f32 {
        if self.samples_remaining > 0 {
            self.current += self.step;
            self.samples_remaining -= 1;

            // Snap to avoid float drift
            if self.samples_remaining == 0 {
                self.current = self.target;
            }
        }
        self.current
    }
}

/// Render-side gain stage for one channel
pub struct GainControl {
    ramp: Ramp,
    /// (value, at_frame) handed over but not yet due
    pending: Option<(f32, u64)>,
}

impl GainControl {
    /// Create a gain stage
    ///
    /// # Arguments
    /// * `initial` - Gain applied from the first sample, without a ramp
    /// * `ramp_samples` - Length of the ramp applied to every change
    pub fn new(initial: f32, ramp_samples: u32) -> Self {
        Self {
            ramp: Ramp::new(initial, ramp_samples),
            pending: None,
        }
    }

    /// Queue a change starting at clock frame `at_frame`, replacing any earlier one
    pub fn schedule(&mut self, value: f32, at_frame: u64) {
        self.pending = Some((value, at_frame));
    }

    /// Apply the gain to one input sample rendered at clock frame `frame`
    #[inline]
    pub fn process(&mut self, input: f32, frame: u64) -> f32 {
        if let Some((value, at_frame)) = self.pending {
            if frame >= at_frame {
                self.ramp.set_target(value);
                self.pending = None;
            }
        }
        input * self.ramp.next()
    }
}
