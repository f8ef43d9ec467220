//! Cycle scheduler: the cooldown timer started by a collision.
//!
//! One timer per collision, equal to the burst window. When it fires the
//! burst is dropped and the beam starts its next cycle. The timer is an
//! absolute deadline, so the poll cadence never shifts it.

use glam::Vec2;

use crate::api::types::CollisionEvent;
use crate::components::beam::{BeamPhase, LiveBeam};
use crate::components::explosion::Explosion;
use crate::core::time::Millis;
use crate::systems::animator;

/// A one-shot deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTimer {
    pub fires_at: Millis,
}

impl CycleTimer {
    pub fn start(now: Millis, window: Millis) -> Self {
        Self {
            fires_at: now.saturating_add(window),
        }
    }

    pub fn is_due(&self, now: Millis) -> bool {
        now >= self.fires_at
    }
}

/// FALLING → COOLDOWN. Freezes the beam where the collision was observed and
/// parks the burst until the timer fires.
pub fn enter_cooldown(
    live: &mut LiveBeam,
    event: &CollisionEvent,
    frozen: Vec2,
    burst: Option<Explosion>,
    window: Millis,
) {
    live.runtime.disarm();
    live.phase = BeamPhase::Cooldown {
        frozen,
        timer: CycleTimer::start(event.at, window),
        burst,
    };
}

/// Fire the cooldown timer if it is due at `now`: drop the burst and begin
/// the next cycle at the timer's deadline. Returns the new cycle identity.
pub fn expire(live: &mut LiveBeam, now: Millis) -> Option<u64> {
    let fires_at = match &live.phase {
        BeamPhase::Cooldown { timer, .. } if timer.is_due(now) => timer.fires_at,
        _ => return None,
    };
    // Replacing the phase drops the burst and all of its particles at once
    Some(animator::begin_cycle(live, fires_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BeamId;
    use crate::components::beam::{BeamConfig, PhaseKind};

    fn collision(at: Millis) -> CollisionEvent {
        CollisionEvent {
            beam: BeamId(0),
            point: Vec2::new(0.5, 600.0),
            cycle: 0,
            at,
        }
    }

    fn burst(at: Millis) -> Explosion {
        Explosion {
            beam: BeamId(0),
            cycle: 0,
            anchor: Vec2::new(0.5, 600.0),
            born_at: at,
            expires_at: at + 2000,
            particles: Vec::new(),
        }
    }

    #[test]
    fn cooldown_disarms_and_freezes() {
        let config = BeamConfig::new(BeamId(0));
        let mut live = animator::activate(&config, 0);
        enter_cooldown(&mut live, &collision(500), Vec2::new(0.0, 470.0), Some(burst(500)), 2000);

        assert!(!live.runtime.armed);
        assert_eq!(live.phase.kind(), PhaseKind::Cooldown);
        assert_eq!(animator::offset_at(&config, &live, 1200), Vec2::new(0.0, 470.0));
        assert_eq!(animator::next_deadline(&config, &live), 2500);
    }

    #[test]
    fn expire_waits_for_deadline() {
        let config = BeamConfig::new(BeamId(0));
        let mut live = animator::activate(&config, 0);
        enter_cooldown(&mut live, &collision(500), Vec2::ZERO, Some(burst(500)), 2000);

        assert_eq!(expire(&mut live, 2499), None);
        assert_eq!(live.runtime.cycle, 0);

        assert_eq!(expire(&mut live, 2600), Some(1));
        assert!(live.runtime.armed);
        // The new cycle starts at the deadline, not at the late observation
        assert!(matches!(live.phase, BeamPhase::Falling { started_at: 2500 }));
    }

    #[test]
    fn expire_ignores_other_phases() {
        let config = BeamConfig::new(BeamId(0));
        let mut live = animator::activate(&config, 0);
        assert_eq!(expire(&mut live, 100_000), None);
    }
}
