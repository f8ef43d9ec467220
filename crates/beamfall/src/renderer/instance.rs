use bytemuck::{Pod, Zeroable};

/// What a render instance depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InstanceKind {
    Beam = 0,
    Glow = 1,
    Particle = 2,
}

impl InstanceKind {
    pub fn as_f32(self) -> f32 {
        self as u8 as f32
    }
}

/// Per-instance render data written to the shared frame buffer.
/// Must match the TypeScript protocol: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// X position relative to the surface origin.
    pub x: f32,
    /// Y position relative to the surface origin.
    pub y: f32,
    /// Rotation in degrees.
    pub rotation: f32,
    /// Beam length, glow width or particle size, in surface units.
    pub size: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
    /// `InstanceKind` as a float.
    pub kind: f32,
    /// Index of the beam this instance belongs to.
    pub owner: f32,
    /// Cycle identity of the owner when the instance was produced.
    pub cycle: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 8;
}

/// Render buffer containing all instances for one frame.
pub struct RenderBuffer {
    /// Beams first, then glows and particles.
    pub instances: Vec<RenderInstance>,
    /// Index where beam instances end and burst instances begin.
    pub beam_split: u32,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            beam_split: 0,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.beam_split = 0;
    }

    pub fn push(&mut self, instance: RenderInstance) {
        self.instances.push(instance);
    }

    pub fn set_beam_split(&mut self, split: u32) {
        self.beam_split = split;
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
