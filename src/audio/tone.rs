//! Tone source - a continuous single-frequency sine oscillator
//!
//! Feeds both channel gain controls of the signal graph.

use std::f32::consts::TAU;

/// Fixed-frequency sine oscillator
pub struct ToneSource {
    amplitude: f32,
    /// Current phase (0.0 to 1.0)
    phase: f32,
    /// Phase advance per sample
    increment: f32,
}

impl ToneSource {
    /// Create a tone source
    ///
    /// # Arguments
    /// * `frequency` - Tone frequency in Hz
    /// * `amplitude` - Peak level (0.0 to 1.0)
    /// * `sample_rate` - Output sample rate in Hz
    pub fn new(frequency: f32, amplitude: f32, sample_rate: u32) -> Self {
        Self {
            amplitude: amplitude.clamp(0.0, 1.0),
            phase: 0.0,
            increment: frequency.max(0.0) / sample_rate.max(1) as f32,
        }
    }

    /// Produce the next sample and advance the phase
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let value = (self.phase * TAU).sin() * self.amplitude;
        self.phase = (self.phase + self.increment).fract();
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_starts_at_zero_and_peaks() {
        let mut tone = ToneSource::new(1.0, 1.0, 4);

        assert!(tone.next_sample().abs() < 1e-6);
        assert!((tone.next_sample() - 1.0).abs() < 1e-6);
        assert!(tone.next_sample().abs() < 1e-6);
        assert!((tone.next_sample() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_frequency_from_zero_crossings() {
        let sample_rate = 48_000;
        let mut tone = ToneSource::new(440.0, 1.0, sample_rate);

        let samples: Vec<f32> = (0..sample_rate).map(|_| tone.next_sample()).collect();
        let rising = samples
            .windows(2)
            .filter(|w| w[0] < 0.0 && w[1] >= 0.0)
            .count();

        assert!((439..=441).contains(&rising), "got {} cycles", rising);
    }

    #[test]
    fn test_amplitude_scales_output() {
        let mut tone = ToneSource::new(100.0, 0.25, 48_000);

        let peak = (0..4800).map(|_| tone.next_sample().abs()).fold(0.0f32, f32::max);

        assert!((peak - 0.25).abs() < 1e-3);
    }
}
