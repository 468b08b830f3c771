//! Exponential smoothing of the raw band energy.

use sonagi_core::lerp;

/// Full-scale band energy, as reported by [`crate::Spectrum::energy`].
const ENERGY_MAX: f32 = 255.0;

/// Smooths band energy readings into a level in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioMeter {
    level: f32,
    smoothing: f32,
}

impl AudioMeter {
    /// `smoothing` is the weight kept from the previous level each update.
    pub fn new(smoothing: f32) -> Self {
        Self {
            level: 0.0,
            smoothing: smoothing.clamp(0.0, 1.0),
        }
    }

    /// Feed one energy reading (0-255) and return the new level.
    pub fn update(&mut self, energy: f32) -> f32 {
        let target = (energy / ENERGY_MAX).clamp(0.0, 1.0);
        self.level = lerp(self.level, target, 1.0 - self.smoothing);
        self.level
    }

    /// Current level.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Drop the level back to silence.
    pub fn reset(&mut self) {
        self.level = 0.0;
    }
}
