//! Default input device capture via cpal.

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream, StreamConfig};

use crate::source::{AudioError, SampleSource};

/// Most samples buffered between two frames before the oldest are dropped.
const MAX_BUFFERED: usize = 16_384;

/// Mono samples captured from the default input device.
pub struct MicSource {
    /// Keeps the capture running; dropped with the source.
    _stream: Stream,
    buffer: Arc<Mutex<Vec<f32>>>,
    sample_rate: u32,
}

impl std::fmt::Debug for MicSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MicSource")
            .field("sample_rate", &self.sample_rate)
            .finish_non_exhaustive()
    }
}

impl MicSource {
    /// Open and start the host's default input device.
    pub fn open_default() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(AudioError::NoDevice)?;

        let supported = device
            .default_input_config()
            .map_err(|e| AudioError::Config(e.to_string()))?;
        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.config();
        if config.channels == 0 {
            return Err(AudioError::Config("device reported 0 channels".into()));
        }

        let buffer = Arc::new(Mutex::new(Vec::with_capacity(MAX_BUFFERED)));
        let stream = build_stream(&device, &config, sample_format, Arc::clone(&buffer))?;
        stream
            .play()
            .map_err(|e| AudioError::Stream(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            buffer,
            sample_rate: config.sample_rate.0,
        })
    }
}

impl SampleSource for MicSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn drain_into(&mut self, out: &mut Vec<f32>) {
        if let Ok(mut buffer) = self.buffer.lock() {
            out.append(&mut buffer);
        }
    }
}

fn build_stream(
    device: &cpal::Device,
    config: &StreamConfig,
    format: SampleFormat,
    buffer: Arc<Mutex<Vec<f32>>>,
) -> Result<Stream, AudioError> {
    let channels = config.channels as usize;
    let on_error = |err: cpal::StreamError| tracing::warn!(error = %err, "audio input stream error");

    let stream = match format {
        SampleFormat::F32 => device.build_input_stream(
            config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                push_frames(&buffer, data, channels, |s| s);
            },
            on_error,
            None,
        ),
        SampleFormat::I16 => device.build_input_stream(
            config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                push_frames(&buffer, data, channels, |s| s as f32 / i16::MAX as f32);
            },
            on_error,
            None,
        ),
        SampleFormat::U16 => device.build_input_stream(
            config,
            move |data: &[u16], _: &cpal::InputCallbackInfo| {
                push_frames(&buffer, data, channels, |s| (s as f32 - 32768.0) / 32768.0);
            },
            on_error,
            None,
        ),
        other => {
            return Err(AudioError::Config(format!(
                "unsupported sample format {other:?}"
            )));
        }
    };

    stream.map_err(|e| AudioError::Stream(e.to_string()))
}

/// Downmix interleaved frames to mono and append them to the shared buffer.
fn push_frames<T: Copy>(
    buffer: &Mutex<Vec<f32>>,
    data: &[T],
    channels: usize,
    to_f32: impl Fn(T) -> f32,
) {
    let Ok(mut buffer) = buffer.lock() else {
        return;
    };
    for frame in data.chunks(channels) {
        let sum: f32 = frame.iter().map(|&s| to_f32(s)).sum();
        buffer.push(sum / frame.len() as f32);
    }
    let excess = buffer.len().saturating_sub(MAX_BUFFERED);
    if excess > 0 {
        buffer.drain(..excess);
    }
}
