//! The full chain from captured samples to a smoothed level.

use sonagi_core::{AudioParams, FloatRange};

use crate::LevelSource;
use crate::filter::BandPass;
use crate::meter::AudioMeter;
use crate::source::SampleSource;
use crate::spectrum::{FFT_SIZE, Spectrum};

/// Band-pass filters a sample source and measures the energy of one band.
#[derive(Debug)]
pub struct AudioAnalyzer<S> {
    source: S,
    filter: BandPass,
    spectrum: Spectrum,
    meter: AudioMeter,
    band: FloatRange,
    /// Most recent filtered samples, always [`FFT_SIZE`] long.
    window: Vec<f32>,
    /// Raw samples drained from the source this frame.
    incoming: Vec<f32>,
}

impl<S: SampleSource> AudioAnalyzer<S> {
    /// Build the chain described by `params` around `source`.
    pub fn new(source: S, params: &AudioParams) -> Self {
        let sample_rate = source.sample_rate();
        Self {
            filter: BandPass::new(params.filter_freq, params.filter_width, sample_rate),
            spectrum: Spectrum::new(sample_rate),
            meter: AudioMeter::new(params.smoothing),
            band: params.frequency_range,
            window: vec![0.0; FFT_SIZE],
            incoming: Vec::with_capacity(FFT_SIZE),
            source,
        }
    }

    /// Pull new samples, analyze them and update the smoothed level.
    pub fn analyze(&mut self) -> f32 {
        self.incoming.clear();
        self.source.drain_into(&mut self.incoming);

        for &sample in &self.incoming {
            self.window.push(self.filter.process(sample));
        }
        let excess = self.window.len().saturating_sub(FFT_SIZE);
        if excess > 0 {
            self.window.drain(..excess);
        }

        self.spectrum.process(&self.window);
        let energy = self.spectrum.energy(self.band.min, self.band.max);
        self.meter.update(energy)
    }

    /// Current smoothed level without advancing the analysis.
    pub fn level(&self) -> f32 {
        self.meter.level()
    }

    /// The wrapped source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: SampleSource> LevelSource for AudioAnalyzer<S> {
    fn poll_level(&mut self) -> f32 {
        self.analyze()
    }

    fn reset(&mut self) {
        // Discard whatever the source buffered meanwhile.
        self.incoming.clear();
        self.source.drain_into(&mut self.incoming);
        self.incoming.clear();

        self.filter.reset();
        self.spectrum.reset();
        self.meter.reset();
        self.window.fill(0.0);
    }
}
