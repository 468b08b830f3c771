//! Where samples come from.

use std::fmt;

/// Sample rate assumed when no device reports one.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// A mono stream of samples polled once per frame.
pub trait SampleSource {
    /// Samples per second.
    fn sample_rate(&self) -> u32;

    /// Move every sample captured since the last call into `out`.
    fn drain_into(&mut self, out: &mut Vec<f32>);
}

/// A source that never produces samples.
#[derive(Debug, Clone, Copy)]
pub struct Silence {
    sample_rate: u32,
}

impl Default for Silence {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl SampleSource for Silence {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn drain_into(&mut self, _out: &mut Vec<f32>) {}
}

/// Failure to open an audio input.
#[derive(Debug)]
pub enum AudioError {
    /// The host has no default input device.
    NoDevice,
    /// The device refused to report or accept a configuration.
    Config(String),
    /// The input stream could not be built or started.
    Stream(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::NoDevice => write!(f, "no audio input device found"),
            AudioError::Config(msg) => write!(f, "unsupported input config: {msg}"),
            AudioError::Stream(msg) => write!(f, "audio stream error: {msg}"),
        }
    }
}

impl std::error::Error for AudioError {}
