//! Digital rain simulation for the sonagi terminal animation.
//!
//! Streams of glyphs fall down a [`Canvas`] addressed in surface pixels.
//! Clicks start [`Shockwave`]s that brighten, enlarge or displace the symbols
//! they cross and knock loose particles and flying characters. An audio
//! level from `sonagi-audio` tints the rain while it is loud enough.
//!
//! [`RainState`] owns everything and runs the frame in a fixed order.

mod animations;
mod canvas;
mod chars;
mod color;
mod state;

pub use animations::debris::{Debris, FlyingChar, Mote, Particle};
pub use animations::shockwave::{Shockwave, effect_strength};
pub use animations::stream::{Effect, Stream, Symbol, init_streams};
pub use canvas::Canvas;
pub use chars::{RAIN_CHARS, random_char};
pub use color::{flash_weight, symbol_color};
pub use state::RainState;
