//! Windowed FFT magnitudes in an 8-bit decibel scale.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{Fft, FftPlanner, num_complex::Complex};

/// Samples per analysis window.
pub const FFT_SIZE: usize = 2048;

/// Weight of the previous magnitude when smoothing bins over time.
const TIME_SMOOTHING: f32 = 0.8;

/// Decibel level mapped to 0.
const MIN_DECIBELS: f32 = -100.0;

/// Decibel level mapped to 255.
const MAX_DECIBELS: f32 = -30.0;

/// Frequency-domain view of the most recent window of samples.
///
/// Each bin holds a byte-scaled level: magnitudes are smoothed over time,
/// converted to decibels and mapped from `[-100 dB, -30 dB]` to `[0, 255]`.
pub struct Spectrum {
    fft: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    bins: Vec<f32>,
    sample_rate: u32,
}

impl std::fmt::Debug for Spectrum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spectrum")
            .field("bins", &self.bins.len())
            .field("sample_rate", &self.sample_rate)
            .finish()
    }
}

impl Spectrum {
    /// Create an analyzer for samples at `sample_rate`.
    pub fn new(sample_rate: u32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);
        Self {
            fft,
            buffer: vec![Complex::new(0.0, 0.0); FFT_SIZE],
            smoothed: vec![0.0; FFT_SIZE / 2],
            bins: vec![0.0; FFT_SIZE / 2],
            sample_rate: sample_rate.max(1),
        }
    }

    /// Analyze the last [`FFT_SIZE`] samples of `window`.
    ///
    /// Shorter windows are zero-padded at the front.
    pub fn process(&mut self, window: &[f32]) {
        let window = &window[window.len().saturating_sub(FFT_SIZE)..];
        let pad = FFT_SIZE - window.len();

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = if i < pad { 0.0 } else { window[i - pad] };
            *slot = Complex::new(sample * hann_window(i, FFT_SIZE), 0.0);
        }

        self.fft.process(&mut self.buffer);

        let norm = 1.0 / FFT_SIZE as f32;
        for (k, bin) in self.bins.iter_mut().enumerate() {
            let magnitude = self.buffer[k].norm() * norm;
            let smoothed =
                TIME_SMOOTHING * self.smoothed[k] + (1.0 - TIME_SMOOTHING) * magnitude;
            self.smoothed[k] = smoothed;
            *bin = to_byte_level(smoothed);
        }
    }

    /// Average byte level of the bins covering `low_hz..=high_hz`.
    pub fn energy(&self, low_hz: f32, high_hz: f32) -> f32 {
        let (low, high) = if low_hz <= high_hz {
            (low_hz, high_hz)
        } else {
            (high_hz, low_hz)
        };
        let low_idx = self.bin_index(low);
        let high_idx = self.bin_index(high);

        if low_idx == high_idx {
            return self.bins[low_idx];
        }
        let span = &self.bins[low_idx..=high_idx];
        span.iter().sum::<f32>() / span.len() as f32
    }

    /// Byte levels of every bin, lowest frequency first.
    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    /// Clear the time smoothing history.
    pub fn reset(&mut self) {
        self.smoothed.fill(0.0);
        self.bins.fill(0.0);
    }

    fn bin_index(&self, freq: f32) -> usize {
        let nyquist = self.sample_rate as f32 / 2.0;
        let idx = (freq / nyquist * self.bins.len() as f32).round();
        (idx.max(0.0) as usize).min(self.bins.len() - 1)
    }
}

/// Hann window function for FFT analysis.
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

fn to_byte_level(magnitude: f32) -> f32 {
    if magnitude <= 0.0 {
        return 0.0;
    }
    let db = 20.0 * magnitude.log10();
    (255.0 * (db - MIN_DECIBELS) / (MAX_DECIBELS - MIN_DECIBELS)).clamp(0.0, 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: u32 = 8_000;

    fn tone(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f32 / SAMPLE_RATE as f32).sin())
            .collect()
    }

    #[test]
    fn test_hann_window() {
        let size = 1024;
        assert!((hann_window(0, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size - 1, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_silence_has_no_energy() {
        let mut spectrum = Spectrum::new(SAMPLE_RATE);
        spectrum.process(&vec![0.0; FFT_SIZE]);
        assert_eq!(spectrum.energy(30.0, 40.0), 0.0);
        assert!(spectrum.bins().iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_tone_lands_in_its_band() {
        let mut spectrum = Spectrum::new(SAMPLE_RATE);
        let samples = tone(35.0, FFT_SIZE);
        for _ in 0..10 {
            spectrum.process(&samples);
        }
        let in_band = spectrum.energy(30.0, 40.0);
        let off_band = spectrum.energy(1_500.0, 1_600.0);
        assert!(in_band > 200.0, "in-band energy {in_band}");
        assert!(off_band < 50.0, "off-band energy {off_band}");
    }

    #[test]
    fn test_short_window_is_padded() {
        let mut spectrum = Spectrum::new(SAMPLE_RATE);
        spectrum.process(&tone(35.0, 100));
        assert_eq!(spectrum.bins().len(), FFT_SIZE / 2);
    }

    #[test]
    fn test_reversed_band_is_accepted() {
        let mut spectrum = Spectrum::new(SAMPLE_RATE);
        let samples = tone(35.0, FFT_SIZE);
        spectrum.process(&samples);
        assert_eq!(spectrum.energy(40.0, 30.0), spectrum.energy(30.0, 40.0));
    }

    #[test]
    fn test_byte_level_scale() {
        assert_eq!(to_byte_level(0.0), 0.0);
        assert_eq!(to_byte_level(1.0), 255.0);
        assert!((to_byte_level(10f32.powf(-65.0 / 20.0)) - 127.5).abs() < 0.01);
    }
}
