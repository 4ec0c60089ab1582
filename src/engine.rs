//! Pan engine - the surface the UI talks to
//!
//! Inputs are an angle and a play/pause intent. Outputs are the live stereo
//! mix (through the session) and the gain pair and angle for display.
//!
//! Every angle update runs straight through: recompute the gains, then hand
//! them to the session, which schedules them on the audio clock if playing.

use crate::audio::{AudioSession, OutputDevice, PlaybackState, SessionConfig};
use crate::error::EngineError;
use crate::panning::{GainPair, HeadOrientation};

pub struct PanEngine {
    session: AudioSession,
    orientation: HeadOrientation,
    gains: GainPair,
    /// Status message
    status: String,
}

impl PanEngine {
    pub fn new(output: Box<dyn OutputDevice>, config: SessionConfig) -> Self {
        let orientation = HeadOrientation::default();
        let gains = orientation.gains();

        let mut session = AudioSession::new(output, config);
        session.set_gains(gains);

        Self {
            session,
            orientation,
            gains,
            status: "Ready".to_string(),
        }
    }

    /// Slider moved
    pub fn on_angle_changed(&mut self, degrees: f64) {
        self.orientation = HeadOrientation::new(degrees);
        self.gains = self.orientation.gains();
        self.session.set_gains(self.gains);
    }

    /// Play/pause pressed. Asking for the state we are already in does nothing.
    pub fn on_play_toggled(&mut self, want_playing: bool) -> Result<(), EngineError> {
        let result = match (want_playing, self.session.state()) {
            (true, PlaybackState::Stopped) => self.session.start(),
            (false, PlaybackState::Playing) => self.session.stop(),
            _ => Ok(()),
        };

        match &result {
            Ok(()) => self.update_status(),
            Err(e) => {
                log::error!("Playback toggle failed: {}", e);
                self.status = format!("Cannot play: {}", e);
            }
        }
        result
    }

    /// Reset pressed: stop and face forward again
    pub fn on_reset(&mut self) {
        self.session.reset();
        self.orientation = HeadOrientation::default();
        self.gains = self.session.gains();
        self.update_status();
        log::info!("Engine reset");
    }

    /// Call regularly from the UI loop to pick up device failures
    pub fn poll(&mut self) -> Result<(), EngineError> {
        self.session.check_stream().map_err(|e| {
            self.status = format!("Stopped: {}", e);
            e
        })
    }

    /// Angle exactly as last received, for drawing head rotation
    pub fn angle(&self) -> f64 {
        self.orientation.degrees()
    }

    /// Angle in (-180, 180]
    pub fn normalized_angle(&self) -> f64 {
        self.orientation.normalized()
    }

    pub fn gains(&self) -> GainPair {
        self.gains
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_playing()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    fn update_status(&mut self) {
        self.status = match self.session.state() {
            PlaybackState::Playing => {
                let config = self.session.config();
                format!("Playing: {} Hz tone", config.frequency)
            }
            PlaybackState::Stopped => "Stopped".to_string(),
        };
    }
}
