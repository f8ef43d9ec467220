//! Beam animator: the FALLING / COOLDOWN / IDLE-GAP state machine.
//!
//! Positions are pure functions of the config and the time elapsed since the
//! current cycle started. Nothing is integrated frame by frame.

use glam::Vec2;

use crate::components::beam::{BeamConfig, BeamPhase, BeamRuntimeState, LiveBeam};
use crate::core::time::Millis;
use crate::extensions::easing::{ease_vec2, Easing};

/// Falls move at constant speed.
pub const FALL_EASING: Easing = Easing::Linear;

/// Offset along the fall after `elapsed` milliseconds. Clamped to the path.
pub fn fall_offset(config: &BeamConfig, elapsed: Millis) -> Vec2 {
    let t = if config.duration == 0 {
        1.0
    } else {
        (elapsed as f64 / config.duration as f64).clamp(0.0, 1.0) as f32
    };
    ease_vec2(config.initial, config.target, t, FALL_EASING)
}

/// Bring a beam to life at `now`. The first fall waits out the start delay.
pub fn activate(config: &BeamConfig, now: Millis) -> LiveBeam {
    LiveBeam {
        runtime: BeamRuntimeState::first(),
        phase: BeamPhase::Falling {
            started_at: now + config.delay,
        },
    }
}

/// Offset of a live beam at `now`.
pub fn offset_at(config: &BeamConfig, live: &LiveBeam, now: Millis) -> Vec2 {
    match &live.phase {
        BeamPhase::Falling { started_at } => fall_offset(config, now.saturating_sub(*started_at)),
        BeamPhase::Cooldown { frozen, .. } => *frozen,
        BeamPhase::IdleGap { .. } => config.target,
    }
}

/// When the current phase ends on its own.
pub fn next_deadline(config: &BeamConfig, live: &LiveBeam) -> Millis {
    match &live.phase {
        BeamPhase::Falling { started_at } => started_at + config.duration,
        BeamPhase::Cooldown { timer, .. } => timer.fires_at,
        BeamPhase::IdleGap { until } => *until,
    }
}

/// FALLING → IDLE-GAP once the fall has run its full duration uncollided.
/// Returns false if the beam was not falling.
pub fn complete_fall(config: &BeamConfig, live: &mut LiveBeam) -> bool {
    let BeamPhase::Falling { started_at } = live.phase else {
        return false;
    };
    let ended_at = started_at + config.duration;
    live.phase = BeamPhase::IdleGap {
        until: ended_at + config.repeat_delay,
    };
    true
}

/// Start a fresh cycle at `at`: new runtime state, falling from the top.
/// Returns the new cycle identity.
pub fn begin_cycle(live: &mut LiveBeam, at: Millis) -> u64 {
    live.runtime = live.runtime.next_cycle();
    live.phase = BeamPhase::Falling { started_at: at };
    live.runtime.cycle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BeamId;

    fn beam() -> BeamConfig {
        BeamConfig::new(BeamId(0))
            .with_initial(Vec2::new(0.0, 0.0))
            .with_target(Vec2::new(20.0, 100.0))
            .with_duration(1.0)
            .with_repeat_delay(0.5)
            .with_delay(2.0)
    }

    #[test]
    fn fall_is_linear() {
        let c = beam();
        assert_eq!(fall_offset(&c, 0), Vec2::new(0.0, 0.0));
        assert_eq!(fall_offset(&c, 500), Vec2::new(10.0, 50.0));
        assert_eq!(fall_offset(&c, 1000), Vec2::new(20.0, 100.0));
        assert_eq!(fall_offset(&c, 5000), Vec2::new(20.0, 100.0));
    }

    #[test]
    fn start_delay_holds_initial_offset() {
        let c = beam();
        let live = activate(&c, 100);
        assert_eq!(next_deadline(&c, &live), 100 + 2000 + 1000);
        assert_eq!(offset_at(&c, &live, 1500), c.initial);
        assert_eq!(offset_at(&c, &live, 2600), Vec2::new(10.0, 50.0));
    }

    #[test]
    fn completed_fall_idles_at_target() {
        let c = beam();
        let mut live = activate(&c, 0);
        assert!(complete_fall(&c, &mut live));
        assert_eq!(next_deadline(&c, &live), 3000 + 500);
        assert_eq!(offset_at(&c, &live, 3200), c.target);
        // Already idle
        assert!(!complete_fall(&c, &mut live));
    }

    #[test]
    fn new_cycle_has_no_start_delay() {
        let c = beam();
        let mut live = activate(&c, 0);
        complete_fall(&c, &mut live);
        let cycle = begin_cycle(&mut live, 3500);
        assert_eq!(cycle, 1);
        assert!(live.runtime.armed);
        assert_eq!(next_deadline(&c, &live), 4500);
        assert_eq!(offset_at(&c, &live, 3500), c.initial);
    }
}
