//! Audio level analysis for audio-reactive rain.
//!
//! Samples flow from a [`SampleSource`] through a [`BandPass`] filter into a
//! [`Spectrum`]; the energy of a frequency band is smoothed by an
//! [`AudioMeter`] into a single level in `[0, 1]`. The animation only sees
//! the [`LevelSource`] trait, so a missing microphone degrades to [`Muted`]
//! or [`Silence`].

mod analyzer;
mod filter;
mod meter;
#[cfg(feature = "mic")]
mod mic;
mod source;
mod spectrum;

pub use analyzer::AudioAnalyzer;
pub use filter::BandPass;
pub use meter::AudioMeter;
#[cfg(feature = "mic")]
pub use mic::MicSource;
pub use source::{AudioError, Silence, SampleSource};
pub use spectrum::Spectrum;

use sonagi_core::AudioParams;

/// Something that yields a smoothed audio level once per frame.
pub trait LevelSource {
    /// Advance the analysis by one frame and return the level in `[0, 1]`.
    fn poll_level(&mut self) -> f32;

    /// Drop any accumulated level, e.g. while audio reactivity is off.
    fn reset(&mut self) {}
}

/// A level source that never hears anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Muted;

impl LevelSource for Muted {
    fn poll_level(&mut self) -> f32 {
        0.0
    }
}

impl<T: LevelSource + ?Sized> LevelSource for Box<T> {
    fn poll_level(&mut self) -> f32 {
        (**self).poll_level()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Open the best available level source for `params`.
///
/// With the `mic` feature the default input device is used; if it cannot be
/// opened the analyzer runs on silence instead. Without the feature the
/// result is [`Muted`].
pub fn open_level_source(params: &AudioParams) -> Box<dyn LevelSource> {
    #[cfg(feature = "mic")]
    {
        match MicSource::open_default() {
            Ok(mic) => {
                tracing::info!(sample_rate = mic.sample_rate(), "microphone opened");
                return Box::new(AudioAnalyzer::new(mic, params));
            }
            Err(err) => {
                tracing::warn!(error = %err, "microphone unavailable, audio effects disabled");
                return Box::new(AudioAnalyzer::new(Silence::default(), params));
            }
        }
    }

    #[cfg(not(feature = "mic"))]
    {
        let _ = params;
        tracing::debug!("built without microphone support");
        Box::new(Muted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muted_is_silent() {
        let mut muted = Muted;
        assert_eq!(muted.poll_level(), 0.0);
        muted.reset();
        assert_eq!(muted.poll_level(), 0.0);
    }

    #[test]
    fn test_boxed_source_delegates() {
        let mut boxed: Box<dyn LevelSource> = Box::new(Muted);
        assert_eq!(boxed.poll_level(), 0.0);
    }
}
