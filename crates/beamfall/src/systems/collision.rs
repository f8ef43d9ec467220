//! Collision detector: compares a falling beam's bounds with the surface's
//! lower boundary on each poll. Read-only; the caller applies the result.

use glam::Vec2;

use crate::api::config::EngineConfig;
use crate::api::error::{EngineError, EngineResult};
use crate::api::types::CollisionEvent;
use crate::components::beam::{BeamConfig, BeamPhase, LiveBeam};
use crate::core::geometry::{Rect, Surface};
use crate::core::time::Millis;
use crate::systems::animator;

/// Top-left of an unrotated beam box, relative to the surface origin.
pub fn beam_origin(offset: Vec2, config: &EngineConfig) -> Vec2 {
    Vec2::new(offset.x, config.anchor_top + offset.y)
}

/// Host-space bounding box of a beam at `offset`, rotation included.
pub fn beam_bounds(
    beam: &BeamConfig,
    offset: Vec2,
    surface: &Surface,
    config: &EngineConfig,
) -> EngineResult<Rect> {
    let origin = surface.origin() + beam_origin(offset, config);
    let size = Vec2::new(config.beam_width, beam.length.pixels());
    let rect = Rect::rotated(origin, size, beam.rotation);
    if !rect.is_finite() {
        return Err(EngineError::BeamGeometryUnavailable(beam.id));
    }
    Ok(rect)
}

/// Poll one beam at `now`.
///
/// Returns `Ok(None)` when the beam is not falling, already collided this
/// cycle, or has not reached the boundary yet. Geometry errors mean "try
/// again next poll".
///
/// A beam still waiting out its start delay counts as falling and is tested
/// at its initial offset, so one that starts past the boundary collides on
/// the first poll.
pub fn detect(
    beam: &BeamConfig,
    live: &LiveBeam,
    now: Millis,
    surface: Option<&Surface>,
    config: &EngineConfig,
) -> EngineResult<Option<CollisionEvent>> {
    if !live.runtime.armed || !matches!(live.phase, BeamPhase::Falling { .. }) {
        return Ok(None);
    }
    let surface = match surface {
        Some(s) if s.is_measurable() => s,
        _ => return Err(EngineError::SurfaceUnavailable),
    };

    let offset = animator::offset_at(beam, live, now);
    let bounds = beam_bounds(beam, offset, surface, config)?;
    let boundary = surface.lower_boundary();
    if bounds.bottom() < boundary {
        return Ok(None);
    }

    let point = Vec2::new(
        bounds.left() - surface.left + bounds.width() / 2.0,
        boundary - surface.top,
    );
    Ok(Some(CollisionEvent {
        beam: beam.id,
        point,
        cycle: live.runtime.cycle,
        at: now,
    }))
}
