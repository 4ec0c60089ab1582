//! Stereo merge - combines two mono signals into one output frame
//!
//! Input 0 always lands on output channel 0 (left) and input 1 on output
//! channel 1 (right). Devices with more channels get silence on the extras;
//! a mono device gets the average of both inputs.

use cpal::{FromSample, Sample};

/// Two-input channel merger
#[derive(Clone, Copy, Debug)]
pub struct StereoMerge {
    channels: usize,
}

impl StereoMerge {
    /// Number of inputs the merger accepts
    pub const INPUTS: usize = 2;

    pub fn new(channels: usize) -> Self {
        Self {
            channels: channels.max(1),
        }
    }

    /// Output channel count
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Write one interleaved frame
    #[inline]
    pub fn write_frame<T: Sample + FromSample<f32>>(&self, frame: &mut [T], left: f32, right: f32) {
        if self.channels >= Self::INPUTS {
            frame[0] = T::from_sample(left);
            frame[1] = T::from_sample(right);
            for ch in frame.iter_mut().skip(Self::INPUTS) {
                *ch = T::EQUILIBRIUM;
            }
        } else {
            frame[0] = T::from_sample((left + right) / 2.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_map_to_fixed_channels() {
        let merge = StereoMerge::new(4);
        let mut frame = [9.0f32; 4];

        merge.write_frame(&mut frame, 0.25, -0.5);

        assert_eq!(frame, [0.25, -0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_mono_device_gets_average() {
        let merge = StereoMerge::new(1);
        let mut frame = [0.0f32; 1];

        merge.write_frame(&mut frame, 1.0, 0.0);

        assert_eq!(frame[0], 0.5);
    }

    #[test]
    fn test_integer_output() {
        let merge = StereoMerge::new(2);
        let mut frame = [0i16; 2];

        merge.write_frame(&mut frame, 0.0, 1.0);

        assert_eq!(frame[0], 0);
        assert!(frame[1] > 32_000);
    }
}
