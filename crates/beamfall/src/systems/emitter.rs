//! Explosion emitter: turns a collision into a burst and samples it over time.

use glam::Vec2;

use crate::api::config::EngineConfig;
use crate::api::frame::{BurstSample, ParticleSample};
use crate::api::types::CollisionEvent;
use crate::components::explosion::{Explosion, ExplosionParticle};
use crate::core::gate::ActivationGate;
use crate::core::time::{secs_to_ms, Millis};
use crate::extensions::easing::{ease, ease_vec2, Easing};
use crate::systems::rng::RandomSource;

/// Curve shared by particle travel, particle fade and glow fade-in.
pub const BURST_EASING: Easing = Easing::EaseOut;

/// Create the burst for `event`. Draws from `random` only if the gate is open.
pub fn spawn_burst(
    gate: &ActivationGate,
    random: &mut dyn RandomSource,
    config: &EngineConfig,
    event: &CollisionEvent,
) -> Option<Explosion> {
    if !gate.is_open() {
        log::warn!("{}: burst requested before activation, ignoring", event.beam);
        return None;
    }

    let [dx_lo, dx_hi] = config.particle_dx;
    let [dy_lo, dy_hi] = config.particle_dy;
    let [fade_lo, fade_hi] = config.particle_fade_secs;

    let particles = (0..config.particle_count)
        .map(|_| {
            let dx = random.range(dx_lo, dx_hi);
            let dy = random.range(dy_lo, dy_hi);
            let fade = secs_to_ms(random.range(fade_lo, fade_hi));
            ExplosionParticle {
                direction: Vec2::new(dx, dy),
                fade,
            }
        })
        .collect();

    Some(Explosion {
        beam: event.beam,
        cycle: event.cycle,
        anchor: event.point,
        born_at: event.at,
        expires_at: event.at + config.explosion_window_ms,
        particles,
    })
}

/// Linear progress through a fade of length `fade` after `age`.
fn fade_progress(age: Millis, fade: Millis) -> f32 {
    if fade == 0 {
        return 1.0;
    }
    age as f32 / fade as f32
}

/// Where a particle is and how visible it is, `age` after the collision.
pub fn sample_particle(anchor: Vec2, particle: &ExplosionParticle, age: Millis) -> ParticleSample {
    let t = fade_progress(age, particle.fade);
    ParticleSample {
        position: ease_vec2(anchor, anchor + particle.direction, t, BURST_EASING),
        opacity: ease(1.0, 0.0, t, BURST_EASING),
    }
}

/// Sample a burst at `now`. `None` once its window has closed.
pub fn sample_burst(burst: &Explosion, now: Millis, config: &EngineConfig) -> Option<BurstSample> {
    if !burst.is_live(now) {
        return None;
    }
    let age = burst.age(now);
    Some(BurstSample {
        beam: burst.beam,
        cycle: burst.cycle,
        anchor: burst.anchor,
        glow_opacity: ease(0.0, 1.0, fade_progress(age, config.glow_fade_ms()), BURST_EASING),
        particles: burst
            .particles
            .iter()
            .map(|p| sample_particle(burst.anchor, p, age))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BeamId;
    use crate::systems::rng::SeededRandom;

    /// Replays a fixed value for every draw and counts calls.
    struct Fixed {
        value: f32,
        calls: usize,
    }

    impl RandomSource for Fixed {
        fn range(&mut self, lo: f32, hi: f32) -> f32 {
            self.calls += 1;
            lo + (hi - lo) * self.value
        }
    }

    fn collision() -> CollisionEvent {
        CollisionEvent {
            beam: BeamId(1),
            point: Vec2::new(300.5, 720.0),
            cycle: 3,
            at: 10_000,
        }
    }

    fn open_gate() -> ActivationGate {
        let mut gate = ActivationGate::new();
        gate.open();
        gate
    }

    #[test]
    fn closed_gate_draws_nothing() {
        let mut random = Fixed { value: 0.5, calls: 0 };
        let burst = spawn_burst(&ActivationGate::new(), &mut random, &EngineConfig::default(), &collision());
        assert!(burst.is_none());
        assert_eq!(random.calls, 0);
    }

    #[test]
    fn burst_has_fixed_size_and_window() {
        let mut random = SeededRandom::new(42);
        let config = EngineConfig::default();
        let burst = spawn_burst(&open_gate(), &mut random, &config, &collision()).unwrap();
        assert_eq!(burst.particles.len(), 20);
        assert_eq!(burst.anchor, Vec2::new(300.5, 720.0));
        assert_eq!((burst.born_at, burst.expires_at), (10_000, 12_000));
        assert_eq!(burst.cycle, 3);
        for p in &burst.particles {
            assert!(p.direction.x >= -40.0 && p.direction.x <= 40.0);
            assert!(p.direction.y >= -60.0 && p.direction.y <= -10.0);
            assert!((500..=2000).contains(&p.fade), "fade {}", p.fade);
        }
    }

    #[test]
    fn injected_source_gives_exact_trajectories() {
        let mut random = Fixed { value: 0.25, calls: 0 };
        let burst = spawn_burst(&open_gate(), &mut random, &EngineConfig::default(), &collision()).unwrap();
        assert_eq!(random.calls, 60);
        let p = burst.particles[0];
        assert_eq!(p.direction, Vec2::new(-20.0, -47.5));
        assert_eq!(p.fade, 875);
    }

    #[test]
    fn particle_travels_then_fades_out() {
        let particle = ExplosionParticle {
            direction: Vec2::new(10.0, -20.0),
            fade: 1000,
        };
        let anchor = Vec2::new(5.0, 5.0);

        let start = sample_particle(anchor, &particle, 0);
        assert_eq!(start.position, anchor);
        assert_eq!(start.opacity, 1.0);

        let end = sample_particle(anchor, &particle, 1500);
        assert_eq!(end.position, Vec2::new(15.0, -15.0));
        assert_eq!(end.opacity, 0.0);
    }

    #[test]
    fn burst_sample_disappears_after_window() {
        let mut random = SeededRandom::new(9);
        let config = EngineConfig::default();
        let burst = spawn_burst(&open_gate(), &mut random, &config, &collision()).unwrap();

        let live = sample_burst(&burst, 11_999, &config).unwrap();
        assert_eq!(live.particles.len(), 20);
        assert!(live.glow_opacity > 0.9);

        assert!(sample_burst(&burst, 12_000, &config).is_none());
    }
}
