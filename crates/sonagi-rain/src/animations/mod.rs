//! The animated entities of the rain.

pub mod debris;
pub mod shockwave;
pub mod stream;
