//! RGB color with fractional channels.

use serde::{Deserialize, Serialize};

use crate::math::lerp;

/// Maximum value of a color channel.
pub const CHANNEL_MAX: f32 = 255.0;

/// An RGB color with channels in `0.0..=255.0`.
///
/// Channels stay fractional while colors are blended and are only rounded
/// when handed to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(255.0, 255.0, 255.0);

    /// Construct a color from its channels.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Interpolate towards `other`. `t` is clamped to `[0, 1]` first.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 {
            return self;
        }
        if t == 1.0 {
            return other;
        }
        Rgb::new(
            lerp(self.r, other.r, t),
            lerp(self.g, other.g, t),
            lerp(self.b, other.b, t),
        )
    }

    /// Add `amount` to every channel, saturating at the channel maximum.
    pub fn brighten(self, amount: f32) -> Rgb {
        Rgb::new(
            (self.r + amount).min(CHANNEL_MAX),
            (self.g + amount).min(CHANNEL_MAX),
            (self.b + amount).min(CHANNEL_MAX),
        )
    }

    /// Multiply every channel by `factor`.
    pub fn scale(self, factor: f32) -> Rgb {
        Rgb::new(self.r * factor, self.g * factor, self.b * factor)
    }

    /// Largest channel value.
    pub fn max_channel(self) -> f32 {
        self.r.max(self.g).max(self.b)
    }

    /// Round to 8-bit channels.
    pub fn to_u8(self) -> (u8, u8, u8) {
        let channel = |v: f32| v.round().clamp(0.0, CHANNEL_MAX) as u8;
        (channel(self.r), channel(self.g), channel(self.b))
    }
}
