//! Biquad band-pass filter.

use std::f32::consts::PI;

/// Second-order band-pass with 0 dB gain at the center frequency.
///
/// Coefficients follow the RBJ audio EQ cookbook; the quality factor is
/// `center / width`.
#[derive(Debug, Clone)]
pub struct BandPass {
    b0: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl BandPass {
    /// Build a filter centered on `center` Hz passing roughly `width` Hz.
    pub fn new(center: f32, width: f32, sample_rate: u32) -> Self {
        let q = (center / width.max(f32::EPSILON)).max(0.01);
        let w0 = 2.0 * PI * center / sample_rate.max(1) as f32;
        let alpha = w0.sin() / (2.0 * q);
        let a0 = 1.0 + alpha;

        Self {
            b0: alpha / a0,
            b2: -alpha / a0,
            a1: -2.0 * w0.cos() / a0,
            a2: (1.0 - alpha) / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Filter one sample.
    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b2 * self.x2 - self.a1 * self.y1 - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }

    /// Clear the filter history.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}
