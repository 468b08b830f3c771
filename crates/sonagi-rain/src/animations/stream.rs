//! Falling symbol streams (stateful).

use rand::Rng;
use sonagi_core::{RainConfig, StreamParams};

use crate::canvas::Canvas;
use crate::chars::random_char;
use crate::color::{stream_opacity, symbol_color};

/// What a shockwave did to a symbol this frame.
///
/// Consumed when the symbol is drawn, so it never outlives the frame it was
/// set in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Effect {
    /// Added to every color channel.
    pub brightness: f32,
    /// Glyph scale, 1.0 for normal size.
    pub size: f32,
    /// Vertical displacement in pixels.
    pub wave_offset: f32,
}

impl Effect {
    pub const NONE: Effect = Effect {
        brightness: 0.0,
        size: 1.0,
        wave_offset: 0.0,
    };
}

impl Default for Effect {
    fn default() -> Self {
        Self::NONE
    }
}

/// One glyph cell of a stream.
#[derive(Debug, Clone)]
pub struct Symbol {
    /// Column position in pixels.
    pub x: f32,
    /// Baseline position in pixels.
    pub y: f32,
    /// Character currently shown.
    pub glyph: char,
    /// Frames between character changes.
    pub switch_interval: u32,
    /// Shockwave effect for the current frame.
    pub effect: Effect,
    /// Position in the audio flash gradient.
    pub audio_phase: u32,
}

impl Symbol {
    /// Create a symbol with a random character and switch interval.
    pub fn new<R: Rng + ?Sized>(x: f32, y: f32, params: &StreamParams, rng: &mut R) -> Self {
        let interval = params.switch_interval;
        Self {
            x,
            y,
            glyph: random_char(rng),
            switch_interval: rng.gen_range(interval.min..=interval.max).max(1),
            effect: Effect::NONE,
            audio_phase: 0,
        }
    }

    /// Replace the character with a random one.
    pub fn reroll<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.glyph = random_char(rng);
    }

    /// Move down by `speed`, wrapping to the top once `height` is reached.
    ///
    /// Returns true when the symbol wrapped.
    pub fn fall<R: Rng + ?Sized>(&mut self, speed: f32, height: f32, rng: &mut R) -> bool {
        self.y += speed;
        self.wrap(height, rng)
    }

    /// Send the symbol back to the top if it is at or below `height`.
    pub fn wrap<R: Rng + ?Sized>(&mut self, height: f32, rng: &mut R) -> bool {
        if self.y >= height {
            self.y = 0.0;
            self.reroll(rng);
            return true;
        }
        false
    }
}

/// A vertical column of symbols falling at a shared speed.
#[derive(Debug, Clone)]
pub struct Stream {
    /// Column position in pixels.
    pub x: f32,
    /// Pixels fallen per frame.
    pub speed: f32,
    /// Symbols from the top of the stream to its leading symbol.
    pub symbols: Vec<Symbol>,
}

impl Stream {
    /// Create a stream at `x` with a random length, speed and start height.
    pub fn new<R: Rng + ?Sized>(x: f32, config: &RainConfig, rng: &mut R) -> Self {
        let params = &config.stream;
        let length = random_length(params, rng);
        let speed = random_in(rng, params.min_speed, params.max_speed);
        let first_y = random_in(rng, params.initial_y.min, params.initial_y.max);

        let symbols = (0..length)
            .map(|i| Symbol::new(x, first_y + i as f32 * config.symbol_size, params, rng))
            .collect();

        Self { x, speed, symbols }
    }

    /// Number of symbols in the stream.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the stream has no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Draw every symbol, then let the stream fall one frame.
    ///
    /// `flash` is the audio flash weight for this frame, if any.
    pub fn render<R: Rng + ?Sized>(
        &mut self,
        canvas: &mut Canvas,
        config: &RainConfig,
        flash: Option<f32>,
        frame_count: u64,
        rng: &mut R,
    ) {
        let len = self.symbols.len();
        for (index, symbol) in self.symbols.iter_mut().enumerate() {
            let effect = std::mem::take(&mut symbol.effect);
            let rank = len - index - 1;
            let opacity = stream_opacity(index, len, &config.stream);
            let color = symbol_color(rank, symbol.audio_phase, flash, effect.brightness, config);

            canvas.draw_glyph(
                symbol.x,
                symbol.y + effect.wave_offset,
                symbol.glyph,
                color,
                opacity,
                effect.size,
            );

            if frame_count % u64::from(symbol.switch_interval) == 0 {
                symbol.reroll(rng);
            }

            symbol.audio_phase = if flash.is_some() {
                (symbol.audio_phase + 1) % config.audio.effect_length.max(1)
            } else {
                0
            };
        }

        self.rain(canvas.height(), rng);
    }

    /// Advance every symbol by the stream speed.
    pub fn rain<R: Rng + ?Sized>(&mut self, height: f32, rng: &mut R) {
        for symbol in &mut self.symbols {
            symbol.fall(self.speed, height, rng);
        }
    }
}

/// Create one stream per `symbol_size` slot across `width` pixels.
pub fn init_streams<R: Rng + ?Sized>(width: f32, config: &RainConfig, rng: &mut R) -> Vec<Stream> {
    let count = (width / config.symbol_size).floor().max(0.0) as usize;
    (0..count)
        .map(|i| Stream::new(i as f32 * config.symbol_size, config, rng))
        .collect()
}

/// Stream length: a uniform draw from the length range, rounded.
fn random_length<R: Rng + ?Sized>(params: &StreamParams, rng: &mut R) -> usize {
    random_in(rng, params.min_length as f32, params.max_length as f32)
        .round()
        .max(1.0) as usize
}

/// Uniform draw from `[min, max)`, or `min` for an empty range.
pub(crate) fn random_in<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}
