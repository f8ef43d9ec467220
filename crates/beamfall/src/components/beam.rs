use glam::Vec2;

use crate::api::types::BeamId;
use crate::components::explosion::Explosion;
use crate::core::time::{secs_to_ms, Millis};
use crate::systems::scheduler::CycleTimer;

/// Visual length of a beam, named after the utility classes the backdrop was
/// designed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LengthClass {
    H4,
    H6,
    H8,
    H10,
    H12,
    #[default]
    H14,
    H16,
    H20,
}

impl LengthClass {
    pub const ALL: [LengthClass; 8] = [
        LengthClass::H4,
        LengthClass::H6,
        LengthClass::H8,
        LengthClass::H10,
        LengthClass::H12,
        LengthClass::H14,
        LengthClass::H16,
        LengthClass::H20,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LengthClass::H4 => "h-4",
            LengthClass::H6 => "h-6",
            LengthClass::H8 => "h-8",
            LengthClass::H10 => "h-10",
            LengthClass::H12 => "h-12",
            LengthClass::H14 => "h-14",
            LengthClass::H16 => "h-16",
            LengthClass::H20 => "h-20",
        }
    }

    /// Parse a single class name such as `"h-8"`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Find the first length class in a whitespace-separated class list.
    pub fn from_class_list(classes: &str) -> Option<Self> {
        classes.split_whitespace().find_map(Self::from_name)
    }

    /// Length in surface units.
    pub fn pixels(&self) -> f32 {
        match self {
            LengthClass::H4 => 16.0,
            LengthClass::H6 => 24.0,
            LengthClass::H8 => 32.0,
            LengthClass::H10 => 40.0,
            LengthClass::H12 => 48.0,
            LengthClass::H14 => 56.0,
            LengthClass::H16 => 64.0,
            LengthClass::H20 => 80.0,
        }
    }
}

/// Immutable parameters of one beam.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamConfig {
    pub id: BeamId,
    /// Offset at the start of every fall.
    pub initial: Vec2,
    /// Offset at the end of every fall.
    pub target: Vec2,
    /// Constant rotation in degrees.
    pub rotation: f32,
    pub length: LengthClass,
    /// Fall duration. Always positive.
    pub duration: Millis,
    /// Pause after a fall that ended without a collision.
    pub repeat_delay: Millis,
    /// One-time wait before the first fall.
    pub delay: Millis,
}

impl BeamConfig {
    pub const DEFAULT_INITIAL_Y: f32 = -200.0;
    pub const DEFAULT_TARGET_Y: f32 = 1800.0;
    pub const DEFAULT_DURATION_SECS: f32 = 8.0;

    /// A vertical beam at x = 0 with every other field at its default.
    pub fn new(id: BeamId) -> Self {
        Self {
            id,
            initial: Vec2::new(0.0, Self::DEFAULT_INITIAL_Y),
            target: Vec2::new(0.0, Self::DEFAULT_TARGET_Y),
            rotation: 0.0,
            length: LengthClass::default(),
            duration: secs_to_ms(Self::DEFAULT_DURATION_SECS),
            repeat_delay: 0,
            delay: 0,
        }
    }

    /// A beam falling straight down at `x`.
    pub fn vertical(id: BeamId, x: f32) -> Self {
        Self::new(id).with_x(x)
    }

    // -- Builder pattern --

    /// Set both the initial and target x (vertical fall).
    pub fn with_x(mut self, x: f32) -> Self {
        self.initial.x = x;
        self.target.x = x;
        self
    }

    pub fn with_initial(mut self, initial: Vec2) -> Self {
        self.initial = initial;
        self
    }

    pub fn with_target(mut self, target: Vec2) -> Self {
        self.target = target;
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_length(mut self, length: LengthClass) -> Self {
        self.length = length;
        self
    }

    /// Non-positive durations are ignored.
    pub fn with_duration(mut self, secs: f32) -> Self {
        let ms = secs_to_ms(secs);
        if ms > 0 {
            self.duration = ms;
        }
        self
    }

    pub fn with_repeat_delay(mut self, secs: f32) -> Self {
        self.repeat_delay = secs_to_ms(secs);
        self
    }

    pub fn with_delay(mut self, secs: f32) -> Self {
        self.delay = secs_to_ms(secs);
        self
    }
}

/// Per-cycle bookkeeping. Replaced wholesale when a new cycle begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeamRuntimeState {
    /// Monotonic cycle identity.
    pub cycle: u64,
    /// True until this cycle's collision has been raised.
    pub armed: bool,
}

impl BeamRuntimeState {
    pub fn first() -> Self {
        Self { cycle: 0, armed: true }
    }

    /// Fresh state for the following cycle, re-armed.
    pub fn next_cycle(&self) -> Self {
        Self { cycle: self.cycle + 1, armed: true }
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }
}

/// Animator state of a live beam.
#[derive(Debug, Clone)]
pub enum BeamPhase {
    /// Interpolating from initial to target. `started_at` may lie in the
    /// future while the one-time start delay runs.
    Falling { started_at: Millis },
    /// Frozen where the collision was observed until the timer fires.
    /// The burst lives exactly as long as this phase.
    Cooldown {
        frozen: Vec2,
        timer: CycleTimer,
        burst: Option<Explosion>,
    },
    /// Frozen at the target after a fall with no collision.
    IdleGap { until: Millis },
}

/// Which animator state a sample was taken in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    /// Gate still closed.
    Placeholder,
    Falling,
    Cooldown,
    IdleGap,
}

impl BeamPhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            BeamPhase::Falling { .. } => PhaseKind::Falling,
            BeamPhase::Cooldown { .. } => PhaseKind::Cooldown,
            BeamPhase::IdleGap { .. } => PhaseKind::IdleGap,
        }
    }
}

/// Runtime half of a beam, created when the gate opens.
#[derive(Debug, Clone)]
pub struct LiveBeam {
    pub runtime: BeamRuntimeState,
    pub phase: BeamPhase,
}

/// A configured beam and, once activated, its live state.
#[derive(Debug, Clone)]
pub struct Beam {
    pub config: BeamConfig,
    pub live: Option<LiveBeam>,
}

impl Beam {
    pub fn new(config: BeamConfig) -> Self {
        Self { config, live: None }
    }

    pub fn id(&self) -> BeamId {
        self.config.id
    }

    /// Current cycle identity (0 before activation).
    pub fn cycle(&self) -> u64 {
        self.live.as_ref().map_or(0, |l| l.runtime.cycle)
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.live.as_ref().map_or(PhaseKind::Placeholder, |l| l.phase.kind())
    }

    /// The pending burst, if this beam is cooling down after a collision.
    pub fn burst(&self) -> Option<&Explosion> {
        match self.live.as_ref().map(|l| &l.phase) {
            Some(BeamPhase::Cooldown { burst, .. }) => burst.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fall_vertically() {
        let c = BeamConfig::new(BeamId(0));
        assert_eq!(c.initial, Vec2::new(0.0, -200.0));
        assert_eq!(c.target, Vec2::new(0.0, 1800.0));
        assert_eq!(c.duration, 8000);
        assert_eq!(c.length, LengthClass::H14);
    }

    #[test]
    fn builder_pattern() {
        let c = BeamConfig::vertical(BeamId(2), 600.0)
            .with_duration(3.0)
            .with_repeat_delay(3.0)
            .with_delay(4.0)
            .with_length(LengthClass::H6);
        assert_eq!(c.initial.x, 600.0);
        assert_eq!(c.target.x, 600.0);
        assert_eq!((c.duration, c.repeat_delay, c.delay), (3000, 3000, 4000));
        assert_eq!(c.length.pixels(), 24.0);
    }

    #[test]
    fn zero_duration_keeps_default() {
        let c = BeamConfig::new(BeamId(0)).with_duration(0.0);
        assert_eq!(c.duration, 8000);
    }

    #[test]
    fn length_class_from_class_list() {
        assert_eq!(LengthClass::from_class_list("rounded h-20 w-px"), Some(LengthClass::H20));
        assert_eq!(LengthClass::from_class_list("h-7"), None);
    }

    #[test]
    fn next_cycle_rearms() {
        let mut state = BeamRuntimeState::first();
        state.disarm();
        let next = state.next_cycle();
        assert_eq!(next.cycle, 1);
        assert!(next.armed);
        // The old state is untouched
        assert!(!state.armed);
    }

    #[test]
    fn placeholder_beam_reports_cycle_zero() {
        let beam = Beam::new(BeamConfig::new(BeamId(0)));
        assert_eq!(beam.cycle(), 0);
        assert_eq!(beam.phase_kind(), PhaseKind::Placeholder);
        assert!(beam.burst().is_none());
    }
}
