use std::fmt;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::core::time::Millis;

/// Identifier of a beam: its index in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BeamId(pub u32);

impl fmt::Display for BeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "beam#{}", self.0)
    }
}

/// A beam's leading edge reached the surface's lower boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub beam: BeamId,
    /// Collision point relative to the surface origin.
    pub point: Vec2,
    /// Cycle identity at the time of detection.
    pub cycle: u64,
    /// Engine time of the poll that observed the crossing.
    pub at: Millis,
}

/// An event communicated to the host via the shared frame buffer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct EngineEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl EngineEvent {
    pub const FLOATS: usize = 4;

    pub const KIND_COLLISION: f32 = 1.0;
    pub const KIND_CYCLE_STARTED: f32 = 2.0;

    /// `a` = x, `b` = y, `c` = beam index.
    pub fn collision(event: &CollisionEvent) -> Self {
        Self {
            kind: Self::KIND_COLLISION,
            a: event.point.x,
            b: event.point.y,
            c: event.beam.0 as f32,
        }
    }

    /// `a` = beam index, `b` = new cycle identity.
    pub fn cycle_started(beam: BeamId, cycle: u64) -> Self {
        Self {
            kind: Self::KIND_CYCLE_STARTED,
            a: beam.0 as f32,
            b: cycle as f32,
            c: 0.0,
        }
    }
}
