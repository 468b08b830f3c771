//! Short-lived particles and flying characters knocked loose by shockwaves.

use rand::Rng;
use sonagi_core::{FlyOutParams, ParticleParams, RainConfig, Rgb};

use crate::animations::stream::random_in;
use crate::canvas::Canvas;
use crate::chars::particle_char;
use crate::color::fade_color;

/// Alpha of a freshly spawned entity.
const FULL_ALPHA: f32 = 255.0;

/// Position, drift and remaining life shared by every kind of debris.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mote {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Frames left to live.
    pub remaining: u32,
    /// Frames the entity was spawned with.
    pub total: u32,
    /// Current opacity (0-255).
    pub alpha: f32,
}

impl Mote {
    /// Spawn at `(x, y)` with a random velocity of at most `speed` per axis.
    pub fn launch<R: Rng + ?Sized>(x: f32, y: f32, speed: f32, duration: u32, rng: &mut R) -> Self {
        let speed = speed.abs();
        Self {
            x,
            y,
            vx: random_in(rng, -speed, speed),
            vy: random_in(rng, -speed, speed),
            remaining: duration,
            total: duration,
            alpha: FULL_ALPHA,
        }
    }

    /// Drift one frame and lose one frame of life.
    pub fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.remaining = self.remaining.saturating_sub(1);
        self.alpha = FULL_ALPHA * self.life_fraction();
    }

    /// Fraction of life left, 1.0 when fresh and 0.0 when expired.
    pub fn life_fraction(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.remaining as f32 / self.total as f32
    }

    /// Whether the entity should be removed.
    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// Color between `start` (fresh) and `end` (expired).
    pub fn color(&self, start: Rgb, end: Rgb) -> Rgb {
        fade_color(start, end, self.life_fraction())
    }
}

/// A colored dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub mote: Mote,
    /// Diameter in pixels.
    pub size: f32,
}

impl Particle {
    pub fn new<R: Rng + ?Sized>(x: f32, y: f32, params: &ParticleParams, rng: &mut R) -> Self {
        Self {
            mote: Mote::launch(x, y, params.speed, params.duration, rng),
            size: params.size,
        }
    }

    pub fn render(&self, canvas: &mut Canvas, params: &ParticleParams) {
        let color = self.mote.color(params.color_start, params.color_end);
        canvas.draw_dot(
            self.mote.x,
            self.mote.y,
            particle_char(self.size),
            color,
            self.mote.alpha,
        );
    }
}

/// A copy of a struck symbol drifting away from its stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyingChar {
    pub mote: Mote,
    pub glyph: char,
}

impl FlyingChar {
    pub fn new<R: Rng + ?Sized>(
        x: f32,
        y: f32,
        glyph: char,
        params: &FlyOutParams,
        rng: &mut R,
    ) -> Self {
        Self {
            mote: Mote::launch(x, y, params.speed, params.duration, rng),
            glyph,
        }
    }

    pub fn render(&self, canvas: &mut Canvas, params: &FlyOutParams) {
        let color = self.mote.color(params.color_start, params.color_end);
        canvas.draw_glyph(
            self.mote.x,
            self.mote.y,
            self.glyph,
            color,
            self.mote.alpha,
            1.0,
        );
    }
}

/// Every live particle and flying character.
#[derive(Debug, Default, Clone)]
pub struct Debris {
    pub particles: Vec<Particle>,
    pub flying: Vec<FlyingChar>,
}

impl Debris {
    /// Spawn `count` particles at a struck symbol.
    pub fn burst<R: Rng + ?Sized>(
        &mut self,
        x: f32,
        y: f32,
        count: usize,
        params: &ParticleParams,
        rng: &mut R,
    ) {
        self.particles
            .extend((0..count).map(|_| Particle::new(x, y, params, rng)));
    }

    /// Spawn one flying copy of `glyph`.
    pub fn fly_out<R: Rng + ?Sized>(
        &mut self,
        x: f32,
        y: f32,
        glyph: char,
        params: &FlyOutParams,
        rng: &mut R,
    ) {
        self.flying.push(FlyingChar::new(x, y, glyph, params, rng));
    }

    /// Advance, draw and cull particles, then flying characters.
    pub fn update(&mut self, canvas: &mut Canvas, config: &RainConfig) {
        // Back to front so swap_remove only moves already visited entries.
        for i in (0..self.particles.len()).rev() {
            let particle = &mut self.particles[i];
            particle.mote.update();
            particle.render(canvas, &config.particles);
            if particle.mote.is_finished() {
                self.particles.swap_remove(i);
            }
        }

        for i in (0..self.flying.len()).rev() {
            let flying = &mut self.flying[i];
            flying.mote.update();
            flying.render(canvas, &config.fly_out);
            if flying.mote.is_finished() {
                self.flying.swap_remove(i);
            }
        }
    }

    /// Whether nothing is alive.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty() && self.flying.is_empty()
    }
}
