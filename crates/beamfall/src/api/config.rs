use serde::Deserialize;

use crate::api::error::EngineResult;
use crate::core::time::{secs_to_ms, Millis};

/// Engine-wide tuning, shared by every beam.
/// Every field is optional in JSON; out-of-range values fall back to defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Collision polling cadence in milliseconds (default: 50).
    pub poll_interval_ms: Millis,
    /// How long a burst stays on screen, and how long the beam cools down (default: 2000).
    pub explosion_window_ms: Millis,
    /// Particles per burst (default: 20).
    pub particle_count: usize,
    /// Horizontal travel range of a particle, [min, max) (default: [-40, 40]).
    pub particle_dx: [f32; 2],
    /// Vertical travel range of a particle, [min, max) (default: [-60, -10]).
    pub particle_dy: [f32; 2],
    /// Per-particle fade duration range in seconds (default: [0.5, 2.0]).
    pub particle_fade_secs: [f32; 2],
    /// Glow fade-in duration in seconds (default: 1.5).
    pub glow_fade_secs: f32,
    /// Distance from the surface top to the line beams hang from (default: 80).
    pub anchor_top: f32,
    /// Beam thickness in surface units (default: 1).
    pub beam_width: f32,
    /// Largest frame delta the clock accepts, in milliseconds (default: 250).
    pub max_frame_ms: Millis,
    /// Seed for the default random source (default: 42).
    pub seed: u64,
    /// Render instance capacity of the shared frame buffer (default: 512).
    pub max_instances: usize,
    /// Event capacity of the shared frame buffer (default: 64).
    pub max_events: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            explosion_window_ms: 2000,
            particle_count: 20,
            particle_dx: [-40.0, 40.0],
            particle_dy: [-60.0, -10.0],
            particle_fade_secs: [0.5, 2.0],
            glow_fade_secs: 1.5,
            anchor_top: 80.0,
            beam_width: 1.0,
            max_frame_ms: 250,
            seed: 42,
            max_instances: 512,
            max_events: 64,
        }
    }
}

impl EngineConfig {
    /// Upper bound on particles per burst.
    pub const MAX_PARTICLE_COUNT: usize = 256;
    /// Upper bound on frame buffer instance capacity.
    pub const MAX_INSTANCES: usize = 65_536;
    /// Upper bound on frame buffer event capacity.
    pub const MAX_EVENTS: usize = 4096;

    /// Parse a config from a JSON string, then repair invalid fields.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Replace out-of-range fields with their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if self.poll_interval_ms == 0 {
            log::warn!("poll_interval_ms must be positive, using {}", defaults.poll_interval_ms);
            self.poll_interval_ms = defaults.poll_interval_ms;
        }
        if self.explosion_window_ms == 0 {
            log::warn!("explosion_window_ms must be positive, using {}", defaults.explosion_window_ms);
            self.explosion_window_ms = defaults.explosion_window_ms;
        }
        if self.max_frame_ms == 0 {
            self.max_frame_ms = defaults.max_frame_ms;
        }
        if self.particle_count > Self::MAX_PARTICLE_COUNT {
            log::warn!("particle_count {} too large, clamping to {}", self.particle_count, Self::MAX_PARTICLE_COUNT);
            self.particle_count = Self::MAX_PARTICLE_COUNT;
        }
        if self.max_instances > Self::MAX_INSTANCES {
            log::warn!("max_instances {} too large, clamping to {}", self.max_instances, Self::MAX_INSTANCES);
            self.max_instances = Self::MAX_INSTANCES;
        }
        if self.max_events > Self::MAX_EVENTS {
            log::warn!("max_events {} too large, clamping to {}", self.max_events, Self::MAX_EVENTS);
            self.max_events = Self::MAX_EVENTS;
        }

        self.particle_dx = sanitize_range("particle_dx", self.particle_dx, defaults.particle_dx);
        self.particle_dy = sanitize_range("particle_dy", self.particle_dy, defaults.particle_dy);
        self.particle_fade_secs =
            sanitize_range("particle_fade_secs", self.particle_fade_secs, defaults.particle_fade_secs);
        if self.particle_fade_secs[0] < 0.0 {
            log::warn!("particle_fade_secs must not be negative, using defaults");
            self.particle_fade_secs = defaults.particle_fade_secs;
        }

        if !self.glow_fade_secs.is_finite() || self.glow_fade_secs < 0.0 {
            log::warn!("glow_fade_secs invalid, using {}", defaults.glow_fade_secs);
            self.glow_fade_secs = defaults.glow_fade_secs;
        }
        if !self.anchor_top.is_finite() {
            self.anchor_top = defaults.anchor_top;
        }
        if !self.beam_width.is_finite() || self.beam_width < 0.0 {
            log::warn!("beam_width invalid, using {}", defaults.beam_width);
            self.beam_width = defaults.beam_width;
        }

        self
    }

    pub fn glow_fade_ms(&self) -> Millis {
        secs_to_ms(self.glow_fade_secs)
    }
}

/// Ranges must be finite; reversed bounds are swapped.
fn sanitize_range(name: &str, range: [f32; 2], fallback: [f32; 2]) -> [f32; 2] {
    let [lo, hi] = range;
    if !lo.is_finite() || !hi.is_finite() {
        log::warn!("{} contains a non-finite bound, using {:?}", name, fallback);
        return fallback;
    }
    if lo > hi {
        log::warn!("{} bounds reversed, swapping", name);
        return [hi, lo];
    }
    range
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_document_overrides_fields() {
        let config = EngineConfig::from_json(r#"{ "poll_interval_ms": 16, "seed": 7 }"#).unwrap();
        assert_eq!(config.poll_interval_ms, 16);
        assert_eq!(config.seed, 7);
        assert_eq!(config.particle_count, 20);
    }

    #[test]
    fn invalid_fields_fall_back() {
        let config = EngineConfig::from_json(
            r#"{ "poll_interval_ms": 0, "particle_dx": [40, -40], "glow_fade_secs": -1 }"#,
        )
        .unwrap();
        assert_eq!(config.poll_interval_ms, 50);
        assert_eq!(config.particle_dx, [-40.0, 40.0]);
        assert_eq!(config.glow_fade_secs, 1.5);
    }

    #[test]
    fn oversized_capacities_are_clamped() {
        let config = EngineConfig::from_json(
            r#"{ "particle_count": 1000000000, "max_instances": 99999999, "max_events": 99999999 }"#,
        )
        .unwrap();
        assert_eq!(config.particle_count, EngineConfig::MAX_PARTICLE_COUNT);
        assert_eq!(config.max_instances, EngineConfig::MAX_INSTANCES);
        assert_eq!(config.max_events, EngineConfig::MAX_EVENTS);

        // In-range values are kept
        let config = EngineConfig::from_json(r#"{ "particle_count": 40 }"#).unwrap();
        assert_eq!(config.particle_count, 40);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(EngineConfig::from_json("not json").is_err());
    }
}
