use crate::api::frame::Frame;
use crate::renderer::instance::{InstanceKind, RenderBuffer, RenderInstance};

/// Width of the glow streak under a burst.
pub const GLOW_WIDTH: f32 = 40.0;
/// Edge length of a particle dot.
pub const PARTICLE_SIZE: f32 = 4.0;

/// Build the render buffer from a frame.
/// Beams first (in registry order), then each burst's glow followed by its
/// particles. Sets `beam_split` at the boundary.
pub fn build_render_buffer(frame: &Frame, buffer: &mut RenderBuffer) {
    buffer.clear();

    for beam in &frame.beams {
        buffer.push(RenderInstance {
            x: beam.position.x,
            y: beam.position.y,
            rotation: beam.rotation,
            size: beam.length,
            alpha: 1.0,
            kind: InstanceKind::Beam.as_f32(),
            owner: beam.beam.0 as f32,
            cycle: beam.cycle as f32,
        });
    }
    buffer.set_beam_split(frame.beams.len() as u32);

    for burst in &frame.bursts {
        let owner = burst.beam.0 as f32;
        let cycle = burst.cycle as f32;
        buffer.push(RenderInstance {
            x: burst.anchor.x,
            y: burst.anchor.y,
            rotation: 0.0,
            size: GLOW_WIDTH,
            alpha: burst.glow_opacity,
            kind: InstanceKind::Glow.as_f32(),
            owner,
            cycle,
        });
        for particle in &burst.particles {
            buffer.push(RenderInstance {
                x: particle.position.x,
                y: particle.position.y,
                rotation: 0.0,
                size: PARTICLE_SIZE,
                alpha: particle.opacity,
                kind: InstanceKind::Particle.as_f32(),
                owner,
                cycle,
            });
        }
    }
}
