//! Audio session - owns the live signal graph and its start/stop lifecycle
//!
//! ```text
//!            start()
//!   Stopped ─────────▶ Playing
//!      ▲                  │
//!      └──────────────────┘
//!            stop()
//! ```
//!
//! The graph exists exactly while the session is `Playing`. It is built in
//! full before the state changes, and `stop()` releases it unconditionally.
//! Starting while playing or stopping while stopped is rejected with
//! `EngineError::InvalidStateTransition` and leaves the session untouched.

use std::fmt;

use super::graph::{GraphHandles, SessionConfig, SignalGraph};
use super::output::{OutputDevice, OutputStream};
use crate::error::EngineError;
use crate::panning::{GainPair, HeadOrientation};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Stopped => write!(f, "stopped"),
            PlaybackState::Playing => write!(f, "playing"),
        }
    }
}

/// Everything that exists only while playing
struct LiveGraph {
    stream: Box<dyn OutputStream>,
    handles: GraphHandles,
}

/// Stateful owner of the tone → gains → merge → output graph
pub struct AudioSession {
    output: Box<dyn OutputDevice>,
    config: SessionConfig,
    /// Most recent gains, applied on the next `start()` when stopped
    gains: GainPair,
    live: Option<LiveGraph>,
}

impl AudioSession {
    pub fn new(output: Box<dyn OutputDevice>, config: SessionConfig) -> Self {
        Self {
            output,
            config,
            gains: GainPair::NEUTRAL,
            live: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        if self.live.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Stopped
        }
    }

    pub fn is_playing(&self) -> bool {
        self.live.is_some()
    }

    /// Gains currently applied (or to be applied on the next start)
    pub fn gains(&self) -> GainPair {
        self.gains
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Build the graph with the current gains and start emitting audio
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.live.is_some() {
            return Err(EngineError::InvalidStateTransition {
                action: "start",
                state: PlaybackState::Playing,
            });
        }

        log::info!("Starting audio session...");

        let format = self.output.negotiate()?;
        let (graph, handles) = SignalGraph::build(&self.config, format, self.gains);

        // On failure the graph was moved into `play` and dropped there
        let stream = self.output.play(graph)?;

        self.live = Some(LiveGraph { stream, handles });
        log::info!(
            "Audio session playing: {} Hz tone at {} Hz, {} channels",
            self.config.frequency,
            format.sample_rate,
            format.channels
        );
        Ok(())
    }

    /// Halt the stream and release the tone source and channel gains
    pub fn stop(&mut self) -> Result<(), EngineError> {
        match self.live.take() {
            Some(live) => {
                Self::release(live);
                log::info!("Audio session stopped");
                Ok(())
            }
            None => Err(EngineError::InvalidStateTransition {
                action: "stop",
                state: PlaybackState::Stopped,
            }),
        }
    }

    fn release(mut live: LiveGraph) {
        if let Err(e) = live.stream.halt() {
            log::warn!("Failed to halt stream cleanly: {}", e);
        }
        // Dropping the stream drops the graph with it
        drop(live);
    }

    /// Record new gains and, if playing, schedule them at the current clock
    pub fn set_gains(&mut self, gains: GainPair) {
        self.gains = gains;

        if let Some(live) = &self.live {
            let now = live.handles.clock.now();
            live.handles.gains.set_pair_at_time(gains, now);
            log::debug!(
                "Scheduled gains L={:.3} R={:.3} at frame {}",
                gains.left(),
                gains.right(),
                now
            );
        }
    }

    /// Stop if playing, then return to the forward-facing gains
    pub fn reset(&mut self) {
        if let Some(live) = self.live.take() {
            Self::release(live);
            log::info!("Audio session stopped by reset");
        }
        self.set_gains(HeadOrientation::default().gains());
    }

    /// Tear the session down if the device reported an error
    ///
    /// The output forgets its device so the next `start()` looks it up again.
    pub fn check_stream(&mut self) -> Result<(), EngineError> {
        let fault = self.live.as_ref().and_then(|live| live.stream.take_fault());

        match fault {
            Some(message) => {
                if let Some(live) = self.live.take() {
                    Self::release(live);
                }
                self.output.invalidate();
                log::error!("Audio session ended by stream error: {}", message);
                Err(EngineError::StreamFailed(message))
            }
            None => Ok(()),
        }
    }

    /// Current audio-clock position in frames, when playing
    #[cfg(test)]
    pub fn clock_frames(&self) -> Option<u64> {
        self.live.as_ref().map(|live| live.handles.clock.now())
    }
}

impl Drop for AudioSession {
    fn drop(&mut self) {
        if let Some(live) = self.live.take() {
            Self::release(live);
        }
    }
}
