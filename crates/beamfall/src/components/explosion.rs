use glam::Vec2;

use crate::api::types::BeamId;
use crate::core::time::Millis;

/// One spark of a burst. Sampled once when the burst is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionParticle {
    /// Total travel from the anchor over the fade.
    pub direction: Vec2,
    /// Time to fade from fully opaque to invisible.
    pub fade: Millis,
}

/// A burst of particles plus a glow, pinned to a collision point.
/// Everything in it is discarded together when the window closes.
#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    pub beam: BeamId,
    pub cycle: u64,
    /// Collision point relative to the surface origin.
    pub anchor: Vec2,
    pub born_at: Millis,
    pub expires_at: Millis,
    pub particles: Vec<ExplosionParticle>,
}

impl Explosion {
    /// Whether the burst is still on screen at `now`.
    pub fn is_live(&self, now: Millis) -> bool {
        now >= self.born_at && now < self.expires_at
    }

    /// Time since the collision.
    pub fn age(&self, now: Millis) -> Millis {
        now.saturating_sub(self.born_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burst(born_at: Millis, expires_at: Millis) -> Explosion {
        Explosion {
            beam: BeamId(0),
            cycle: 0,
            anchor: Vec2::new(10.0, 600.0),
            born_at,
            expires_at,
            particles: Vec::new(),
        }
    }

    #[test]
    fn live_for_exactly_its_window() {
        let e = burst(500, 2500);
        assert!(!e.is_live(499));
        assert!(e.is_live(500));
        assert!(e.is_live(2499));
        assert!(!e.is_live(2500));
    }

    #[test]
    fn age_saturates_before_birth() {
        let e = burst(500, 2500);
        assert_eq!(e.age(100), 0);
        assert_eq!(e.age(700), 200);
    }
}
