//! Output device - where the signal graph gets rendered
//!
//! `OutputDevice` abstracts the platform capability the session consumes:
//! agree on a stream format, then run a graph until the returned stream is
//! dropped. `CpalOutput` is the real implementation.

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};

use super::graph::{SignalGraph, StreamFormat};
use crate::error::EngineError;

/// A platform audio output
pub trait OutputDevice {
    /// Resolve the device and report the format the graph must render in
    fn negotiate(&mut self) -> Result<StreamFormat, EngineError>;

    /// Start rendering `graph`. The graph is dropped if this fails.
    fn play(&mut self, graph: SignalGraph) -> Result<Box<dyn OutputStream>, EngineError>;

    /// Forget the resolved device after it failed
    fn invalidate(&mut self) {}
}

/// A running output stream
///
/// Dropping it stops the callback and releases the graph it owns.
pub trait OutputStream {
    /// Stop pulling audio before the stream is dropped
    fn halt(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    /// Error reported by the device since the stream started, if any
    fn take_fault(&self) -> Option<String>;
}

/// First error reported by a stream's error callback
#[derive(Clone, Default)]
pub(crate) struct StreamFault {
    message: Arc<Mutex<Option<String>>>,
}

impl StreamFault {
    pub(crate) fn report(&self, message: String) {
        if let Ok(mut slot) = self.message.lock() {
            slot.get_or_insert(message);
        }
    }

    pub(crate) fn take(&self) -> Option<String> {
        self.message.lock().ok().and_then(|mut slot| slot.take())
    }
}

/// Default output device of the default cpal host
///
/// The device is resolved once and reused across play/pause cycles. A failure,
/// including one reported while the stream runs, forgets it so the next
/// attempt looks it up again.
#[derive(Default)]
pub struct CpalOutput {
    resolved: Option<(cpal::Device, cpal::SupportedStreamConfig)>,
}

impl CpalOutput {
    pub fn new() -> Self {
        Self::default()
    }

    fn resolve(&mut self) -> Result<&(cpal::Device, cpal::SupportedStreamConfig), EngineError> {
        if self.resolved.is_none() {
            let host = cpal::default_host();

            let device = host.default_output_device().ok_or_else(|| {
                log::error!("No output device found");
                EngineError::AudioDeviceUnavailable("no output device found".to_string())
            })?;

            let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
            log::info!("Using output device: {}", device_name);

            let config = device.default_output_config().map_err(|e| {
                log::error!("Failed to get default output config: {}", e);
                EngineError::AudioDeviceUnavailable(e.to_string())
            })?;
            log::info!("Audio config: {:?}", config);

            self.resolved = Some((device, config));
        }

        self.resolved
            .as_ref()
            .ok_or_else(|| EngineError::AudioDeviceUnavailable("device lookup failed".to_string()))
    }
}

impl OutputDevice for CpalOutput {
    fn negotiate(&mut self) -> Result<StreamFormat, EngineError> {
        let (_, config) = self.resolve()?;
        Ok(StreamFormat {
            sample_rate: config.sample_rate().0,
            channels: config.channels(),
        })
    }

    fn play(&mut self, graph: SignalGraph) -> Result<Box<dyn OutputStream>, EngineError> {
        let (device, config) = self.resolve()?;
        let sample_format = config.sample_format();
        let stream_config: cpal::StreamConfig = config.clone().into();
        log::info!("Sample format: {:?}", sample_format);

        let fault = StreamFault::default();

        let built = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(device, &stream_config, graph, fault.clone()),
            cpal::SampleFormat::I16 => build_stream::<i16>(device, &stream_config, graph, fault.clone()),
            cpal::SampleFormat::U16 => build_stream::<u16>(device, &stream_config, graph, fault.clone()),
            format => {
                log::error!("Unsupported sample format: {:?}", format);
                return Err(EngineError::UnsupportedFormat(format!("{:?}", format)));
            }
        };

        let stream = match built {
            Ok(s) => s,
            Err(e) => {
                log::error!("Failed to build stream: {}", e);
                self.resolved = None;
                return Err(EngineError::AudioDeviceUnavailable(e.to_string()));
            }
        };

        if let Err(e) = stream.play() {
            log::error!("Failed to start stream: {}", e);
            self.resolved = None;
            return Err(EngineError::AudioDeviceUnavailable(e.to_string()));
        }

        Ok(Box::new(CpalStream { stream, fault }))
    }

    fn invalidate(&mut self) {
        if self.resolved.take().is_some() {
            log::info!("Dropped cached output device");
        }
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut graph: SignalGraph,
    fault: StreamFault,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample + FromSample<f32>,
{
    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| graph.render(data),
        move |err| {
            log::error!("Audio stream error: {}", err);
            fault.report(err.to_string());
        },
        None,
    )
}

/// Live cpal stream. The graph lives inside its callback.
struct CpalStream {
    stream: cpal::Stream,
    fault: StreamFault,
}

impl OutputStream for CpalStream {
    fn halt(&mut self) -> Result<(), EngineError> {
        self.stream
            .pause()
            .map_err(|e| EngineError::StreamFailed(e.to_string()))
    }

    fn take_fault(&self) -> Option<String> {
        self.fault.take()
    }
}
