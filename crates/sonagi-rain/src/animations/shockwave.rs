//! Expanding rings that disturb the symbols they pass over.

use rand::Rng;
use sonagi_core::{RainConfig, ShockwaveParams, map_range};

use crate::animations::debris::Debris;
use crate::animations::stream::Symbol;
use crate::canvas::Canvas;
use crate::chars::RING_CHAR;

/// Opacity of the ring outline (0-255).
const OUTLINE_ALPHA: f32 = 50.0;

/// A ring growing from the point that was clicked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shockwave {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl Shockwave {
    /// Start a shockwave with zero radius at `(x, y)`.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, radius: 0.0 }
    }

    /// Grow by one frame.
    pub fn update(&mut self, params: &ShockwaveParams) {
        self.radius += params.speed;
    }

    /// Whether the ring has grown past its maximum radius.
    pub fn is_finished(&self, params: &ShockwaveParams) -> bool {
        self.radius > params.max_radius
    }

    /// Effect strength at distance `d` from the origin, `None` outside the ring.
    pub fn strength_at(&self, d: f32, params: &ShockwaveParams) -> Option<f32> {
        effect_strength(d, self.radius, params.width)
    }

    /// Apply this frame's effect to `symbol`, spawning debris as enabled.
    ///
    /// Returns whether the symbol lies inside the ring.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        symbol: &mut Symbol,
        config: &RainConfig,
        debris: &mut Debris,
        rng: &mut R,
    ) -> bool {
        let d = (symbol.x - self.x).hypot(symbol.y - self.y);
        let Some(strength) = self.strength_at(d, &config.shockwave) else {
            return false;
        };

        let params = &config.shockwave;
        let effects = config.effects;

        if effects.brightness {
            symbol.effect.brightness = params.brightness_increase * strength;
        }
        if effects.size_increase {
            symbol.effect.size = 1.0 + (params.max_size_increase - 1.0) * strength;
        }
        if effects.wave {
            let angle = (self.radius - d) * params.wave_frequency;
            symbol.effect.wave_offset = angle.sin() * params.wave_amplitude * strength;
        }
        if effects.particles && has_particle_room(debris, config) {
            let count = (config.particles.count as f32 * strength).ceil() as usize;
            debris.burst(symbol.x, symbol.y, count, &config.particles, rng);
        }
        if effects.fly_out {
            debris.fly_out(symbol.x, symbol.y, symbol.glyph, &config.fly_out, rng);
        }

        true
    }

    /// Draw the ring outline.
    pub fn render(&self, canvas: &mut Canvas, params: &ShockwaveParams) {
        canvas.stroke_circle(self.x, self.y, self.radius, RING_CHAR, params.color, OUTLINE_ALPHA);
    }
}

/// Triangular falloff across a ring of `width` centered on `radius`.
///
/// Zero at both edges, one exactly on the radius, `None` outside.
pub fn effect_strength(d: f32, radius: f32, width: f32) -> Option<f32> {
    let half = width / 2.0;
    let inner = radius - half;
    let outer = radius + half;
    if d < inner || d > outer {
        return None;
    }
    let strength = if d < radius {
        map_range(d, inner, radius, 0.0, 1.0)
    } else {
        map_range(d, radius, outer, 1.0, 0.0)
    };
    Some(strength)
}

fn has_particle_room(debris: &Debris, config: &RainConfig) -> bool {
    config
        .particles
        .max_live
        .is_none_or(|max| debris.particles.len() < max)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use sonagi_core::{Effects, StreamParams};

    use super::*;
    use crate::animations::stream::Effect;

    fn symbol_at(x: f32, y: f32, rng: &mut StdRng) -> Symbol {
        Symbol::new(x, y, &StreamParams::default(), rng)
    }

    fn config_with(effects: Effects) -> RainConfig {
        RainConfig {
            effects,
            ..RainConfig::default()
        }
    }

    #[test]
    fn test_strength_is_triangular() {
        assert_eq!(effect_strength(95.0, 100.0, 10.0), Some(0.0));
        assert_eq!(effect_strength(97.5, 100.0, 10.0), Some(0.5));
        assert_eq!(effect_strength(100.0, 100.0, 10.0), Some(1.0));
        assert_eq!(effect_strength(102.5, 100.0, 10.0), Some(0.5));
        assert_eq!(effect_strength(105.0, 100.0, 10.0), Some(0.0));
        assert_eq!(effect_strength(94.9, 100.0, 10.0), None);
        assert_eq!(effect_strength(105.1, 100.0, 10.0), None);
    }

    #[test]
    fn test_zero_width_ring_hits_only_the_radius() {
        assert_eq!(effect_strength(50.0, 50.0, 0.0), Some(1.0));
        assert_eq!(effect_strength(50.5, 50.0, 0.0), None);
    }

    #[test]
    fn test_finishes_strictly_past_max_radius() {
        let params = ShockwaveParams {
            speed: 1.0,
            max_radius: 3.0,
            ..ShockwaveParams::default()
        };
        let mut wave = Shockwave::new(0.0, 0.0);
        let mut radii = Vec::new();
        while !wave.is_finished(&params) {
            wave.update(&params);
            radii.push(wave.radius);
        }
        assert_eq!(radii, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_symbol_on_radius_gets_full_boost() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = config_with(Effects {
            brightness: true,
            ..Effects::none()
        });
        let wave = Shockwave {
            x: 0.0,
            y: 0.0,
            radius: 50.0,
        };
        let mut symbol = symbol_at(0.0, 50.0, &mut rng);
        let mut debris = Debris::default();

        assert!(wave.apply(&mut symbol, &config, &mut debris, &mut rng));
        assert_eq!(symbol.effect.brightness, 200.0);
        assert_eq!(symbol.effect.size, 1.0);
        assert_eq!(symbol.effect.wave_offset, 0.0);
        assert!(debris.is_empty());
    }

    #[test]
    fn test_symbol_outside_ring_is_untouched() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = config_with(Effects::all());
        let wave = Shockwave {
            x: 0.0,
            y: 0.0,
            radius: 10.0,
        };
        let mut symbol = symbol_at(300.0, 0.0, &mut rng);
        let mut debris = Debris::default();

        assert!(!wave.apply(&mut symbol, &config, &mut debris, &mut rng));
        assert_eq!(symbol.effect, Effect::NONE);
        assert!(debris.is_empty());
    }

    #[test]
    fn test_size_and_wave_scale_with_strength() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = config_with(Effects {
            size_increase: true,
            wave: true,
            ..Effects::none()
        });
        let wave = Shockwave {
            x: 0.0,
            y: 0.0,
            radius: 100.0,
        };
        // Halfway between the inner edge and the radius
        let mut symbol = symbol_at(97.5, 0.0, &mut rng);
        let mut debris = Debris::default();
        wave.apply(&mut symbol, &config, &mut debris, &mut rng);

        assert_eq!(symbol.effect.size, 1.0 + 9.0 * 0.5);
        let expected = (2.5f32 * 0.1).sin() * 200.0 * 0.5;
        assert!((symbol.effect.wave_offset - expected).abs() < 1e-4);
    }

    #[test]
    fn test_particles_scale_with_strength() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut config = config_with(Effects {
            particles: true,
            ..Effects::none()
        });
        config.particles.count = 4;
        config.particles.max_live = None;
        let wave = Shockwave {
            x: 0.0,
            y: 0.0,
            radius: 100.0,
        };
        let mut debris = Debris::default();

        let mut peak = symbol_at(100.0, 0.0, &mut rng);
        wave.apply(&mut peak, &config, &mut debris, &mut rng);
        assert_eq!(debris.particles.len(), 4);

        let mut half = symbol_at(102.5, 0.0, &mut rng);
        wave.apply(&mut half, &config, &mut debris, &mut rng);
        assert_eq!(debris.particles.len(), 6);

        let mut edge = symbol_at(105.0, 0.0, &mut rng);
        wave.apply(&mut edge, &config, &mut debris, &mut rng);
        assert_eq!(debris.particles.len(), 6);
    }

    #[test]
    fn test_particle_cap_blocks_new_bursts() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut config = config_with(Effects {
            particles: true,
            ..Effects::none()
        });
        config.particles.max_live = Some(3);
        let wave = Shockwave {
            x: 0.0,
            y: 0.0,
            radius: 100.0,
        };
        let mut debris = Debris::default();
        for _ in 0..5 {
            let mut symbol = symbol_at(100.0, 0.0, &mut rng);
            wave.apply(&mut symbol, &config, &mut debris, &mut rng);
        }
        // Bursts of two are admitted while fewer than three are alive
        assert_eq!(debris.particles.len(), 4);
    }

    #[test]
    fn test_fly_out_copies_glyph_even_at_edge() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = config_with(Effects {
            fly_out: true,
            ..Effects::none()
        });
        let wave = Shockwave {
            x: 0.0,
            y: 0.0,
            radius: 100.0,
        };
        let mut symbol = symbol_at(0.0, 95.0, &mut rng);
        symbol.glyph = 'ヲ';
        let mut debris = Debris::default();
        wave.apply(&mut symbol, &config, &mut debris, &mut rng);

        assert_eq!(debris.flying.len(), 1);
        let flying = debris.flying[0];
        assert_eq!(flying.glyph, 'ヲ');
        assert_eq!((flying.mote.x, flying.mote.y), (0.0, 95.0));
    }
}
