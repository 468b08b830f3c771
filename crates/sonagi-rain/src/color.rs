//! Color and opacity rules for rain symbols and debris.

use ratatui::style::Color;
use sonagi_core::{AudioParams, RainConfig, Rgb, StreamParams, map_range, map_range_clamped};

/// Opacity (0-255) of the symbol at `index` in a stream of `len` symbols.
///
/// The ramp runs from `opacity_max` at `index == len` down to `opacity_min`
/// at index 0, so the leading (last) symbol is the most opaque.
pub fn stream_opacity(index: usize, len: usize, params: &StreamParams) -> f32 {
    map_range(
        index as f32,
        len as f32,
        0.0,
        params.opacity_max,
        params.opacity_min,
    )
}

/// Blend factor between the leading and trailing colors for a symbol
/// `rank` places behind the head of its stream.
pub fn gradient_t(rank: usize, params: &StreamParams) -> f32 {
    let second = 1.0 - params.second_character_brightness;
    match rank {
        0 => 0.0,
        1 => second,
        _ => {
            let end = params.leading_gradient_length as f32;
            if end <= 2.0 {
                1.0
            } else {
                map_range_clamped(rank as f32, 2.0, end, second, 1.0)
            }
        }
    }
}

/// Weight of the audio colors for this frame, or `None` when not flashing.
pub fn flash_weight(level: f32, params: &AudioParams) -> Option<f32> {
    if !params.enabled || level <= params.threshold {
        return None;
    }
    let flash = map_range(
        level,
        params.threshold,
        1.0,
        params.min_flash_brightness,
        params.max_flash_brightness,
    );
    Some(flash / 255.0)
}

/// Audio color at a symbol's position in its flash cycle.
pub fn audio_color(phase: u32, params: &AudioParams) -> Rgb {
    let t = map_range_clamped(phase as f32, 0.0, params.effect_length as f32, 0.0, 1.0);
    params.colors.leading.lerp(params.colors.trailing, t)
}

/// Final color of a rain symbol.
pub fn symbol_color(
    rank: usize,
    audio_phase: u32,
    flash: Option<f32>,
    brightness: f32,
    config: &RainConfig,
) -> Rgb {
    let t = gradient_t(rank, &config.stream);
    let mut color = config.colors.leading.lerp(config.colors.trailing, t);

    if let Some(weight) = flash {
        color = color.lerp(audio_color(audio_phase, &config.audio), weight);
    }
    if config.effects.brightness {
        color = color.brighten(brightness);
    }
    color
}

/// Color of a fading particle or flying character.
///
/// `remaining` is the fraction of life left, so a fresh entity has the start
/// color and an expired one the end color.
pub fn fade_color(start: Rgb, end: Rgb, remaining: f32) -> Rgb {
    start.lerp(end, 1.0 - remaining)
}

/// Convert to a terminal color.
pub fn to_terminal(color: Rgb) -> Color {
    let (r, g, b) = color.to_u8();
    Color::Rgb(r, g, b)
}
