use glam::Vec2;

use crate::api::types::BeamId;
use crate::components::beam::PhaseKind;

/// Where a beam is drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamSample {
    pub beam: BeamId,
    /// Top-left of the unrotated beam box, relative to the surface origin.
    pub position: Vec2,
    /// Degrees, about the box centre.
    pub rotation: f32,
    /// Visual length in surface units.
    pub length: f32,
    pub cycle: u64,
    pub phase: PhaseKind,
}

/// One particle of a live burst.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSample {
    /// Relative to the surface origin.
    pub position: Vec2,
    pub opacity: f32,
}

/// A live burst: its glow and every particle.
#[derive(Debug, Clone, PartialEq)]
pub struct BurstSample {
    pub beam: BeamId,
    pub cycle: u64,
    pub anchor: Vec2,
    pub glow_opacity: f32,
    pub particles: Vec<ParticleSample>,
}

/// Everything the renderer needs for one frame.
/// Beams are always listed in registry order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub beams: Vec<BeamSample>,
    pub bursts: Vec<BurstSample>,
}
