//! Core types shared by the sonagi crates.
//!
//! Holds the color type, the small numeric helpers used by every animation
//! stage and the full parameter table ([`RainConfig`]).

mod color;
mod math;
mod params;

pub use color::Rgb;
pub use math::{lerp, map_range, map_range_clamped};
pub use params::{
    AudioParams, CellSize, Effects, FloatRange, FlyOutParams, IntRange, Palette, ParticleParams,
    RainConfig, ShockwaveParams, StreamParams,
};
