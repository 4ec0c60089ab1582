//! Signal graph - tone source → two channel gains → stereo merge
//!
//! The graph is built on the control thread, then moved into the output
//! stream's callback where it renders every buffer. Dropping the stream drops
//! the graph, which releases the tone source and both gain stages together.

use cpal::{FromSample, Sample};

use super::clock::RenderClock;
use super::gain::{GainControl, GainSchedule, ScheduleReader};
use super::merge::StereoMerge;
use super::tone::ToneSource;
use crate::panning::GainPair;

/// Stream parameters agreed with the output device
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Audio engine configuration
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Sine tone frequency (Hz)
    pub frequency: f32,
    /// Output volume (0.0 to 1.0)
    pub volume: f32,
    /// Length of the ramp applied to every gain change (seconds)
    pub smoothing_secs: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frequency: 440.0,
            volume: 1.0,
            smoothing_secs: 0.005,
        }
    }
}

/// Control-side handles into a live graph
pub struct GraphHandles {
    pub gains: GainSchedule,
    pub clock: RenderClock,
}

/// The wired audio graph, owned by the render callback
pub struct SignalGraph {
    tone: ToneSource,
    schedule: ScheduleReader,
    left: GainControl,
    right: GainControl,
    merge: StereoMerge,
    clock: RenderClock,
}

impl SignalGraph {
    /// Build and wire a graph whose channel gains start at `gains`
    pub fn build(config: &SessionConfig, format: StreamFormat, gains: GainPair) -> (Self, GraphHandles) {
        let ramp_samples = (config.smoothing_secs * format.sample_rate as f32).max(1.0) as u32;

        let schedule = GainSchedule::new(gains);
        let clock = RenderClock::new();

        let graph = Self {
            tone: ToneSource::new(config.frequency, config.volume, format.sample_rate),
            schedule: schedule.reader(),
            left: GainControl::new(gains.left(), ramp_samples),
            right: GainControl::new(gains.right(), ramp_samples),
            merge: StereoMerge::new(format.channels as usize),
            clock: clock.clone(),
        };

        let handles = GraphHandles {
            gains: schedule,
            clock,
        };

        (graph, handles)
    }

    /// Render one interleaved output buffer
    pub fn render<T: Sample + FromSample<f32>>(&mut self, data: &mut [T]) {
        let channels = self.merge.channels();
        let start = self.clock.now();

        // One read per block: both channels get the same pair and start frame
        if let Some(change) = self.schedule.poll() {
            self.left.schedule(change.gains.left(), change.at_frame);
            self.right.schedule(change.gains.right(), change.at_frame);
        }

        let mut frames = 0u64;
        for frame in data.chunks_mut(channels) {
            let at = start + frames;
            let source = self.tone.next_sample();
            let l = self.left.process(source, at);
            let r = self.right.process(source, at);

            if frame.len() == channels {
                self.merge.write_frame(frame, l, r);
            } else {
                // Trailing partial frame
                for sample in frame.iter_mut() {
                    *sample = T::EQUILIBRIUM;
                }
            }
            frames += 1;
        }

        self.clock.advance(frames);
    }
}
