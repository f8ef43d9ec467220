// extensions/mod.rs
//
// Optional helper modules for beamfall.
// Pure math, decoupled from beams and bursts.

pub mod easing;

pub use easing::{Easing, lerp, lerp_vec2, ease, ease_vec2};
