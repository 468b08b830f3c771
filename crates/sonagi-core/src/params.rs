//! The parameter table driving every part of the rain.
//!
//! Distances and speeds are in surface pixels; a terminal cell covers
//! [`CellSize`] surface pixels. Durations are in frames.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Inclusive integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: u32,
    pub max: u32,
}

/// Half-open float range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
}

/// Size of one terminal cell in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellSize {
    pub width: f32,
    pub height: f32,
}

impl Default for CellSize {
    fn default() -> Self {
        Self {
            width: 9.0,
            height: 18.0,
        }
    }
}

/// Falling stream layout and shading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamParams {
    /// Shortest stream, in symbols.
    pub min_length: u32,
    /// Longest stream, in symbols.
    pub max_length: u32,
    /// Slowest fall speed, pixels per frame.
    pub min_speed: f32,
    /// Fastest fall speed, pixels per frame.
    pub max_speed: f32,
    /// Frames between character changes, chosen per symbol.
    pub switch_interval: IntRange,
    /// Starting height of a stream's first symbol.
    pub initial_y: FloatRange,
    /// Opacity of the trailing symbol (0-255).
    pub opacity_min: f32,
    /// Opacity of the leading symbol (0-255).
    pub opacity_max: f32,
    /// Rank at which the color reaches the trailing color.
    pub leading_gradient_length: u32,
    /// How close the second symbol stays to the leading color (0-1).
    pub second_character_brightness: f32,
}

impl Default for StreamParams {
    fn default() -> Self {
        Self {
            min_length: 20,
            max_length: 50,
            min_speed: 2.0,
            max_speed: 5.0,
            switch_interval: IntRange { min: 2, max: 20 },
            initial_y: FloatRange {
                min: -1000.0,
                max: 0.0,
            },
            opacity_min: 50.0,
            opacity_max: 200.0,
            leading_gradient_length: 2,
            second_character_brightness: 1.0,
        }
    }
}

/// Leading and trailing colors of a gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub leading: Rgb,
    pub trailing: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            leading: Rgb::new(180.0, 255.0, 100.0),
            trailing: Rgb::new(0.0, 154.0, 30.0),
        }
    }
}

/// Shockwave growth and the strength of what it does to symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShockwaveParams {
    /// Radius gained per frame.
    pub speed: f32,
    /// Width of the ring in which symbols are affected.
    pub width: f32,
    /// Radius past which the shockwave is dropped.
    pub max_radius: f32,
    /// Brightness added to a symbol sitting exactly on the ring.
    pub brightness_increase: f32,
    /// Outline color.
    pub color: Rgb,
    /// Draw the ring outline.
    pub show_circle: bool,
    /// Glyph scale reached on the ring.
    pub max_size_increase: f32,
    /// Largest vertical displacement, pixels.
    pub wave_amplitude: f32,
    /// Phase advance per pixel of distance behind the ring.
    pub wave_frequency: f32,
}

impl Default for ShockwaveParams {
    fn default() -> Self {
        Self {
            speed: 5.0,
            width: 10.0,
            max_radius: 1000.0,
            brightness_increase: 200.0,
            color: Rgb::WHITE,
            show_circle: false,
            max_size_increase: 10.0,
            wave_amplitude: 200.0,
            wave_frequency: 0.1,
        }
    }
}

/// Independent switches for what a shockwave does to the symbols it crosses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Effects {
    pub brightness: bool,
    pub size_increase: bool,
    pub wave: bool,
    pub particles: bool,
    pub fly_out: bool,
}

impl Default for Effects {
    fn default() -> Self {
        Self {
            brightness: true,
            size_increase: false,
            wave: false,
            particles: true,
            fly_out: true,
        }
    }
}

impl Effects {
    /// Every effect switched off.
    pub const fn none() -> Self {
        Self {
            brightness: false,
            size_increase: false,
            wave: false,
            particles: false,
            fly_out: false,
        }
    }

    /// Every effect switched on.
    pub const fn all() -> Self {
        Self {
            brightness: true,
            size_increase: true,
            wave: true,
            particles: true,
            fly_out: true,
        }
    }
}

/// Particle bursts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleParams {
    /// Particles per struck symbol at full strength.
    pub count: u32,
    /// Maximum speed per axis.
    pub speed: f32,
    /// Dot diameter in pixels.
    pub size: f32,
    /// Lifetime in frames.
    pub duration: u32,
    /// No new bursts while this many particles are alive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_live: Option<usize>,
    pub color_start: Rgb,
    pub color_end: Rgb,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            count: 2,
            speed: 8.0,
            size: 1.0,
            duration: 1,
            max_live: Some(20),
            color_start: Rgb::new(180.0, 255.0, 100.0),
            color_end: Rgb::new(100.0, 100.0, 100.0),
        }
    }
}

/// Characters knocked out of their stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyOutParams {
    /// Maximum speed per axis.
    pub speed: f32,
    /// Lifetime in frames.
    pub duration: u32,
    pub color_start: Rgb,
    pub color_end: Rgb,
}

impl Default for FlyOutParams {
    fn default() -> Self {
        Self {
            speed: 1.0,
            duration: 40,
            color_start: Rgb::new(180.0, 255.0, 100.0),
            color_end: Rgb::new(0.0, 154.0, 30.0),
        }
    }
}

/// Audio-reactive flashing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioParams {
    /// Whether the level drives symbol colors. Toggled at runtime.
    pub enabled: bool,
    /// Level above which symbols flash.
    pub threshold: f32,
    /// Band-pass center frequency, Hz.
    pub filter_freq: f32,
    /// Band-pass width, Hz.
    pub filter_width: f32,
    /// Weight of the previous level when smoothing (0-1).
    pub smoothing: f32,
    /// Flash amount at the threshold (0-255).
    pub min_flash_brightness: f32,
    /// Flash amount at full level (0-255).
    pub max_flash_brightness: f32,
    /// Band whose energy is measured, Hz.
    pub frequency_range: FloatRange,
    /// Period of the per-symbol flash gradient, frames.
    pub effect_length: u32,
    pub colors: Palette,
}

impl Default for AudioParams {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.1,
            filter_freq: 55.0,
            filter_width: 10.0,
            smoothing: 0.8,
            min_flash_brightness: 0.0,
            max_flash_brightness: 255.0,
            frequency_range: FloatRange {
                min: 30.0,
                max: 40.0,
            },
            effect_length: 5,
            colors: Palette {
                leading: Rgb::WHITE,
                trailing: Rgb::new(180.0, 255.0, 100.0),
            },
        }
    }
}

/// Every tunable of the animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainConfig {
    /// Frames per second.
    pub fps: u32,
    /// Grid step between streams and between symbols of a stream, pixels.
    pub symbol_size: f32,
    /// Opacity of the black wash laid over the previous frame (0-255).
    pub background_alpha: f32,
    pub cell: CellSize,
    pub colors: Palette,
    pub stream: StreamParams,
    pub shockwave: ShockwaveParams,
    pub effects: Effects,
    pub particles: ParticleParams,
    pub fly_out: FlyOutParams,
    pub audio: AudioParams,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            symbol_size: 18.0,
            background_alpha: 150.0,
            cell: CellSize::default(),
            colors: Palette::default(),
            stream: StreamParams::default(),
            shockwave: ShockwaveParams::default(),
            effects: Effects::default(),
            particles: ParticleParams::default(),
            fly_out: FlyOutParams::default(),
            audio: AudioParams::default(),
        }
    }
}

impl RainConfig {
    /// Check the table for values the animation cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if let Some((name, value)) = self.scalars().into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("{name} must be a finite number, got {value}"));
        }
        if self.fps == 0 {
            return Err("fps must be at least 1".into());
        }
        if self.symbol_size <= 0.0 {
            return Err(format!("symbol_size must be positive, got {}", self.symbol_size));
        }
        if self.cell.width <= 0.0 || self.cell.height <= 0.0 {
            return Err("cell width and height must be positive".into());
        }
        if !(0.0..=255.0).contains(&self.background_alpha) {
            return Err("background_alpha must be within 0-255".into());
        }

        let stream = &self.stream;
        if stream.min_length == 0 || stream.min_length > stream.max_length {
            return Err(format!(
                "stream length range {}..={} is invalid",
                stream.min_length, stream.max_length
            ));
        }
        if stream.min_speed < 0.0 || stream.min_speed > stream.max_speed {
            return Err(format!(
                "stream speed range {}..{} is invalid",
                stream.min_speed, stream.max_speed
            ));
        }
        if stream.switch_interval.min == 0 || stream.switch_interval.min > stream.switch_interval.max
        {
            return Err("switch_interval must be a non-empty range starting at 1 or more".into());
        }
        if stream.initial_y.min > stream.initial_y.max {
            return Err("initial_y range is inverted".into());
        }

        if self.shockwave.speed <= 0.0 {
            return Err("shockwave speed must be positive".into());
        }
        if self.shockwave.width < 0.0 {
            return Err("shockwave width must not be negative".into());
        }

        let audio = &self.audio;
        if !(0.0..=1.0).contains(&audio.smoothing) {
            return Err("audio smoothing must be within 0-1".into());
        }
        if audio.frequency_range.min > audio.frequency_range.max {
            return Err("audio frequency_range is inverted".into());
        }
        if audio.filter_freq <= 0.0 || audio.filter_width <= 0.0 {
            return Err("audio filter frequency and width must be positive".into());
        }
        if audio.effect_length == 0 {
            return Err("audio effect_length must be at least 1".into());
        }

        Ok(())
    }

    /// Every float in the table, by its TOML path.
    fn scalars(&self) -> Vec<(&'static str, f32)> {
        let stream = &self.stream;
        let shockwave = &self.shockwave;
        let particles = &self.particles;
        let audio = &self.audio;
        vec![
            ("symbol_size", self.symbol_size),
            ("background_alpha", self.background_alpha),
            ("cell.width", self.cell.width),
            ("cell.height", self.cell.height),
            ("stream.min_speed", stream.min_speed),
            ("stream.max_speed", stream.max_speed),
            ("stream.initial_y.min", stream.initial_y.min),
            ("stream.initial_y.max", stream.initial_y.max),
            ("stream.opacity_min", stream.opacity_min),
            ("stream.opacity_max", stream.opacity_max),
            ("stream.second_character_brightness", stream.second_character_brightness),
            ("shockwave.speed", shockwave.speed),
            ("shockwave.width", shockwave.width),
            ("shockwave.max_radius", shockwave.max_radius),
            ("shockwave.brightness_increase", shockwave.brightness_increase),
            ("shockwave.max_size_increase", shockwave.max_size_increase),
            ("shockwave.wave_amplitude", shockwave.wave_amplitude),
            ("shockwave.wave_frequency", shockwave.wave_frequency),
            ("particles.speed", particles.speed),
            ("particles.size", particles.size),
            ("fly_out.speed", self.fly_out.speed),
            ("audio.threshold", audio.threshold),
            ("audio.filter_freq", audio.filter_freq),
            ("audio.filter_width", audio.filter_width),
            ("audio.smoothing", audio.smoothing),
            ("audio.min_flash_brightness", audio.min_flash_brightness),
            ("audio.max_flash_brightness", audio.max_flash_brightness),
            ("audio.frequency_range.min", audio.frequency_range.min),
            ("audio.frequency_range.max", audio.frequency_range.max),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(RainConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_inverted_lengths() {
        let mut config = RainConfig::default();
        config.stream.min_length = 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_switch_interval() {
        let mut config = RainConfig::default();
        config.stream.switch_interval.min = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_smoothing() {
        let mut config = RainConfig::default();
        config.audio.smoothing = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_values() {
        let parsed: RainConfig =
            toml::from_str("[shockwave]\nwidth = nan\nmax_radius = nan\n").unwrap();
        let err = parsed.validate().unwrap_err();
        assert!(err.contains("shockwave.width"), "{err}");

        let parsed: RainConfig = toml::from_str("[stream]\nmax_speed = inf\n").unwrap();
        assert!(parsed.validate().unwrap_err().contains("stream.max_speed"));

        let mut config = RainConfig::default();
        config.cell.height = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = RainConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: RainConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let parsed: RainConfig = toml::from_str(
            r#"
            fps = 30

            [effects]
            size_increase = true

            [shockwave]
            max_radius = 400.0
            "#,
        )
        .unwrap();
        assert_eq!(parsed.fps, 30);
        assert!(parsed.effects.size_increase);
        assert!(parsed.effects.fly_out);
        assert_eq!(parsed.shockwave.max_radius, 400.0);
        assert_eq!(parsed.shockwave.speed, 5.0);
        assert_eq!(parsed.stream, StreamParams::default());
    }
}
