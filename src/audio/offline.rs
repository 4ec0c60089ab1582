//! Offline output - renders the graph on demand instead of on a device
//!
//! Lets the session lifecycle and the audible mix be checked without a
//! sound card.

use std::sync::{Arc, Mutex};

use super::graph::{SignalGraph, StreamFormat};
use super::output::{OutputDevice, OutputStream, StreamFault};
use crate::error::EngineError;

type GraphSlot = Arc<Mutex<Option<SignalGraph>>>;

pub struct OfflineOutput {
    format: StreamFormat,
    available: bool,
    resolved: bool,
    slot: GraphSlot,
    fault: StreamFault,
    opened: Arc<Mutex<u32>>,
    resolutions: Arc<Mutex<u32>>,
}

/// Test-side view of whatever the session is currently playing
#[derive(Clone)]
pub struct OfflineHandle {
    channels: usize,
    slot: GraphSlot,
    fault: StreamFault,
    opened: Arc<Mutex<u32>>,
    resolutions: Arc<Mutex<u32>>,
}

impl OfflineOutput {
    pub fn new(sample_rate: u32, channels: u16) -> (Self, OfflineHandle) {
        let slot: GraphSlot = Arc::new(Mutex::new(None));
        let fault = StreamFault::default();
        let opened = Arc::new(Mutex::new(0));
        let resolutions = Arc::new(Mutex::new(0));

        let output = Self {
            format: StreamFormat { sample_rate, channels },
            available: true,
            resolved: false,
            slot: slot.clone(),
            fault: fault.clone(),
            opened: opened.clone(),
            resolutions: resolutions.clone(),
        };
        let handle = OfflineHandle {
            channels: channels as usize,
            slot,
            fault,
            opened,
            resolutions,
        };
        (output, handle)
    }

    /// An output whose device can never be opened
    pub fn unavailable() -> Self {
        let (mut output, _) = Self::new(48_000, 2);
        output.available = false;
        output
    }
}

impl OutputDevice for OfflineOutput {
    fn negotiate(&mut self) -> Result<StreamFormat, EngineError> {
        if !self.available {
            return Err(EngineError::AudioDeviceUnavailable("offline device disabled".to_string()));
        }
        if !self.resolved {
            self.resolved = true;
            *self.resolutions.lock().unwrap() += 1;
        }
        Ok(self.format)
    }

    fn play(&mut self, graph: SignalGraph) -> Result<Box<dyn OutputStream>, EngineError> {
        self.negotiate()?;
        *self.slot.lock().unwrap() = Some(graph);
        *self.opened.lock().unwrap() += 1;
        Ok(Box::new(OfflineStream {
            slot: self.slot.clone(),
            fault: self.fault.clone(),
        }))
    }

    fn invalidate(&mut self) {
        self.resolved = false;
    }
}

struct OfflineStream {
    slot: GraphSlot,
    fault: StreamFault,
}

impl OutputStream for OfflineStream {
    fn take_fault(&self) -> Option<String> {
        self.fault.take()
    }
}

impl Drop for OfflineStream {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

impl OfflineHandle {
    /// Render `frames` frames, or silence if nothing is playing
    pub fn render(&self, frames: usize) -> Vec<f32> {
        let mut data = vec![0.0f32; frames * self.channels];
        if let Some(graph) = self.slot.lock().unwrap().as_mut() {
            graph.render(&mut data);
        }
        data
    }

    /// Whether a graph is currently alive in the output
    pub fn is_live(&self) -> bool {
        self.slot.lock().unwrap().is_some()
    }

    /// Number of streams opened so far
    pub fn streams_opened(&self) -> u32 {
        *self.opened.lock().unwrap()
    }

    /// Number of times the device was looked up
    pub fn resolutions(&self) -> u32 {
        *self.resolutions.lock().unwrap()
    }

    /// Simulate the device reporting an error
    pub fn inject_fault(&self, message: &str) {
        self.fault.report(message.to_string());
    }
}
