//! Engine errors

use thiserror::Error;

use crate::audio::PlaybackState;

/// Errors surfaced by the audio session and output device
#[derive(Error, Debug)]
pub enum EngineError {
    /// No output device, or the device refused to open. Fatal for the session.
    #[error("Audio device unavailable: {0}")]
    AudioDeviceUnavailable(String),

    #[error("Cannot {action} while {state}")]
    InvalidStateTransition {
        action: &'static str,
        state: PlaybackState,
    },

    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// The device reported an error after the stream started
    #[error("Audio stream failed: {0}")]
    StreamFailed(String),
}
