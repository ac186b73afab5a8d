//! Audio input acquisition using cpal
//!
//! Opens the default microphone and owns the live stream until released

use super::buffer::{AudioConsumer, AudioProducer, AudioRingBuffer};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionError {
    #[error("Microphone permission denied: {0}")]
    PermissionDenied(String),

    #[error("No audio input device found")]
    NoInputDevice,

    #[error("Input device does not support a usable stream config: {0}")]
    UnsupportedConfig(String),

    #[error("Audio backend error: {0}")]
    Backend(String),
}

impl AcquisitionError {
    /// Classify a backend-specific failure message
    fn from_backend(description: String) -> Self {
        let lower = description.to_lowercase();
        if lower.contains("permission") || lower.contains("denied") || lower.contains("not authorized") {
            AcquisitionError::PermissionDenied(description)
        } else {
            AcquisitionError::Backend(description)
        }
    }
}

impl From<cpal::DefaultStreamConfigError> for AcquisitionError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        match err {
            cpal::DefaultStreamConfigError::DeviceNotAvailable => AcquisitionError::NoInputDevice,
            cpal::DefaultStreamConfigError::StreamTypeNotSupported => {
                AcquisitionError::UnsupportedConfig(err.to_string())
            }
            cpal::DefaultStreamConfigError::BackendSpecific { err } => {
                AcquisitionError::from_backend(err.description)
            }
        }
    }
}

impl From<cpal::BuildStreamError> for AcquisitionError {
    fn from(err: cpal::BuildStreamError) -> Self {
        match err {
            cpal::BuildStreamError::DeviceNotAvailable => AcquisitionError::NoInputDevice,
            cpal::BuildStreamError::StreamConfigNotSupported => {
                AcquisitionError::UnsupportedConfig(err.to_string())
            }
            cpal::BuildStreamError::BackendSpecific { err } => {
                AcquisitionError::from_backend(err.description)
            }
            other => AcquisitionError::Backend(other.to_string()),
        }
    }
}

impl From<cpal::PlayStreamError> for AcquisitionError {
    fn from(err: cpal::PlayStreamError) -> Self {
        match err {
            cpal::PlayStreamError::DeviceNotAvailable => AcquisitionError::NoInputDevice,
            cpal::PlayStreamError::BackendSpecific { err } => {
                AcquisitionError::from_backend(err.description)
            }
        }
    }
}

/// A live connection to an input device
///
/// Releasing stops the device. Release is idempotent and must also happen
/// when the handle is dropped.
pub trait StreamHandle {
    /// Sample rate fixed when the stream was opened (Hz)
    fn sample_rate(&self) -> f64;

    /// Move captured mono samples into `buffer`
    ///
    /// Returns the number of samples written; 0 when nothing new is pending
    /// or the handle has been released.
    fn read(&mut self, buffer: &mut [f32]) -> usize;

    /// Stop the underlying device. Calling again is a no-op.
    fn release(&mut self);

    /// Whether `release` has already run
    fn is_released(&self) -> bool;
}

/// Source of stream handles
pub trait Acquirer {
    type Handle: StreamHandle;

    /// Request microphone access; activates the device on success
    fn acquire(&mut self) -> Result<Self::Handle, AcquisitionError>;

    /// Release a handle obtained from `acquire`
    fn release(&mut self, handle: &mut Self::Handle) {
        handle.release();
    }
}

/// Input device information
#[derive(Debug, Clone)]
pub struct AudioDeviceInfo {
    pub name: String,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Acquirer backed by the host's default input device
#[derive(Debug, Clone)]
pub struct CpalAcquirer {
    /// Seconds of audio the capture ring buffer can hold
    buffer_seconds: f64,
}

impl Default for CpalAcquirer {
    fn default() -> Self {
        Self { buffer_seconds: 1.0 }
    }
}

impl CpalAcquirer {
    pub fn new() -> Self {
        Self::default()
    }

    fn open(&self, device: Device) -> Result<CpalStream, AcquisitionError> {
        let name = device.name().unwrap_or_else(|_| "unknown device".to_string());

        let config = device.default_input_config()?;
        let sample_format = config.sample_format();
        let info = AudioDeviceInfo {
            name,
            sample_rate: config.sample_rate().0,
            channels: config.channels(),
        };
        let stream_config: StreamConfig = config.into();

        let capacity = ((info.sample_rate as f64 * self.buffer_seconds) as usize).max(1);
        let (producer, consumer) = AudioRingBuffer::new(capacity).split();

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, producer)?,
            SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, producer)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, producer)?,
            other => {
                return Err(AcquisitionError::UnsupportedConfig(format!(
                    "sample format {other:?}"
                )))
            }
        };

        stream.play()?;

        log::info!(
            "Opened input device '{}' ({} Hz, {} ch)",
            info.name,
            info.sample_rate,
            info.channels
        );

        Ok(CpalStream {
            stream: Some(stream),
            consumer,
            info,
        })
    }
}

impl Acquirer for CpalAcquirer {
    type Handle = CpalStream;

    fn acquire(&mut self) -> Result<CpalStream, AcquisitionError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(AcquisitionError::NoInputDevice)?;

        self.open(device)
    }
}

/// Build an input stream that downmixes each frame to mono into the ring buffer
fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    mut producer: AudioProducer,
) -> Result<Stream, AcquisitionError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = usize::from(config.channels.max(1));

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            for frame in data.chunks(channels) {
                let sum: f32 = frame.iter().map(|&s| s.to_sample::<f32>()).sum();
                // Full buffer: drop, the analysis window only needs recent data
                producer.write_one(sum / frame.len() as f32);
            }
        },
        move |err| {
            log::warn!("Audio input stream error: {}", err);
        },
        None,
    )?;

    Ok(stream)
}

/// Live cpal input stream
pub struct CpalStream {
    stream: Option<Stream>,
    consumer: AudioConsumer,
    info: AudioDeviceInfo,
}

impl StreamHandle for CpalStream {
    fn sample_rate(&self) -> f64 {
        f64::from(self.info.sample_rate)
    }

    fn read(&mut self, buffer: &mut [f32]) -> usize {
        if self.stream.is_none() {
            return 0;
        }
        self.consumer.read(buffer)
    }

    fn release(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                log::debug!("Pausing input stream before release failed: {}", e);
            }
            drop(stream);
            log::info!("Released input device '{}'", self.info.name);
        }
    }

    fn is_released(&self) -> bool {
        self.stream.is_none()
    }
}

impl Drop for CpalStream {
    fn drop(&mut self) {
        self.release();
    }
}
