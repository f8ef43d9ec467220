use crate::api::config::EngineConfig;
use crate::api::frame::{BeamSample, Frame};
use crate::api::types::{BeamId, CollisionEvent, EngineEvent};
use crate::assets::registry::BeamRegistry;
use crate::components::beam::{Beam, BeamConfig, BeamPhase};
use crate::core::gate::ActivationGate;
use crate::core::geometry::Surface;
use crate::core::time::{secs_to_ms, FrameClock, Millis};
use crate::input::queue::HostEvent;
use crate::systems::rng::{RandomSource, SeededRandom};
use crate::systems::{animator, collision, emitter, scheduler};

/// The backdrop engine.
///
/// Owns every beam and runs a single central loop over them: each tick walks
/// forward through all due deadlines and poll instants in time order, so
/// results do not depend on how the host slices frames. Beams never share
/// mutable state; the surface is only read.
pub struct Engine {
    config: EngineConfig,
    beams: Vec<Beam>,
    gate: ActivationGate,
    clock: FrameClock,
    random: Box<dyn RandomSource>,
    surface: Option<Surface>,
    /// Next collision poll. `None` until the gate opens and after shutdown.
    next_poll_at: Option<Millis>,
    collisions: Vec<CollisionEvent>,
    events: Vec<EngineEvent>,
    shut_down: bool,
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        registry: BeamRegistry,
        random: impl RandomSource + 'static,
    ) -> Self {
        let config = config.sanitized();
        let beams = registry
            .into_configs()
            .into_iter()
            .map(|c| Beam::new(repair_beam(c)))
            .collect();
        Self {
            clock: FrameClock::new(config.max_frame_ms),
            config,
            beams,
            gate: ActivationGate::new(),
            random: Box::new(random),
            surface: None,
            next_poll_at: None,
            collisions: Vec::new(),
            events: Vec::new(),
            shut_down: false,
        }
    }

    /// Create an engine with the default PCG source seeded from `config.seed`.
    pub fn with_seed(config: EngineConfig, registry: BeamRegistry) -> Self {
        let seed = config.seed;
        Self::new(config, registry, SeededRandom::new(seed))
    }

    // -- Host signals --

    /// Open the activation gate. All beams start their first cycle now (plus
    /// their start delay). Returns `false` if the gate was already open.
    pub fn signal_ready(&mut self) -> bool {
        if self.shut_down {
            log::debug!("ready signal after shutdown ignored");
            return false;
        }
        let now = self.clock.now();
        if !self.gate.open() {
            log::debug!("engine already active, ready signal ignored");
            return false;
        }
        for beam in &mut self.beams {
            beam.live = Some(animator::activate(&beam.config, now));
        }
        self.next_poll_at = Some(now + self.config.poll_interval_ms);
        log::info!("beamfall: activated {} beams at {}ms", self.beams.len(), now);
        true
    }

    /// Update the surface geometry the detector measures against.
    pub fn set_surface(&mut self, surface: Surface) {
        if !surface.is_measurable() {
            log::debug!("surface {:?} not measurable yet, polls will skip", surface);
        }
        self.surface = Some(surface);
    }

    pub fn clear_surface(&mut self) {
        self.surface = None;
    }

    pub fn apply_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::Ready => {
                self.signal_ready();
            }
            HostEvent::SurfaceChanged(surface) => self.set_surface(surface),
            HostEvent::SurfaceLost => self.clear_surface(),
            HostEvent::Shutdown => self.shutdown(),
        }
    }

    /// Cancel every pending deadline and burst. Later ticks and ready signals
    /// are no-ops and frames are empty.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        let timers = self.beams.iter().filter(|b| b.live.is_some()).count();
        let bursts = self.beams.iter().filter(|b| b.burst().is_some()).count();
        self.beams.clear();
        self.next_poll_at = None;
        self.clear_frame_data();
        self.shut_down = true;
        log::debug!("beamfall: shut down, cancelled {} beam timers and {} bursts", timers, bursts);
    }

    // -- Loop --

    /// Advance by a host frame delta in seconds.
    pub fn tick(&mut self, dt: f32) {
        if self.shut_down {
            return;
        }
        self.clear_frame_data();
        let now = self.clock.advance(dt);
        self.run_until(now);
    }

    /// Advance by an exact number of milliseconds.
    pub fn tick_ms(&mut self, ms: Millis) {
        if self.shut_down {
            return;
        }
        self.clear_frame_data();
        let now = self.clock.advance_ms(ms);
        self.run_until(now);
    }

    /// Clear per-frame transient data (collisions, events).
    pub fn clear_frame_data(&mut self) {
        self.collisions.clear();
        self.events.clear();
    }

    fn run_until(&mut self, now: Millis) {
        let Some(mut poll_at) = self.next_poll_at else {
            return;
        };

        loop {
            let t = match self.earliest_deadline() {
                Some(deadline) => deadline.min(poll_at),
                None => poll_at,
            };
            if t > now {
                break;
            }

            // Restarts first so a cycle beginning on a poll instant is polled.
            self.restart_due(t);
            if poll_at == t {
                self.poll_all(t);
                poll_at += self.config.poll_interval_ms;
            }
            // Falls end last so the final position still gets its poll.
            self.finish_falls(t);
        }

        self.next_poll_at = Some(poll_at);
    }

    fn earliest_deadline(&self) -> Option<Millis> {
        self.beams
            .iter()
            .filter_map(|b| b.live.as_ref().map(|live| animator::next_deadline(&b.config, live)))
            .min()
    }

    fn restart_due(&mut self, t: Millis) {
        for beam in &mut self.beams {
            let Some(live) = beam.live.as_mut() else {
                continue;
            };
            let restarted = match live.phase {
                BeamPhase::IdleGap { until } if until <= t => Some(animator::begin_cycle(live, until)),
                BeamPhase::Cooldown { .. } => scheduler::expire(live, t),
                _ => None,
            };
            if let Some(cycle) = restarted {
                log::trace!("{}: cycle {} starts at {}ms", beam.config.id, cycle, t);
                self.events.push(EngineEvent::cycle_started(beam.config.id, cycle));
            }
        }
    }

    fn poll_all(&mut self, t: Millis) {
        let surface = self.surface;
        for beam in &mut self.beams {
            let Some(live) = beam.live.as_mut() else {
                continue;
            };
            let event = match collision::detect(&beam.config, live, t, surface.as_ref(), &self.config) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(err) => {
                    log::trace!("{}: poll at {}ms skipped: {}", beam.config.id, t, err);
                    continue;
                }
            };

            let frozen = animator::offset_at(&beam.config, live, t);
            let burst = emitter::spawn_burst(&self.gate, self.random.as_mut(), &self.config, &event);
            scheduler::enter_cooldown(live, &event, frozen, burst, self.config.explosion_window_ms);

            log::debug!(
                "{}: collision at ({:.1}, {:.1}) in cycle {}",
                event.beam, event.point.x, event.point.y, event.cycle
            );
            self.collisions.push(event);
            self.events.push(EngineEvent::collision(&event));
        }
    }

    fn finish_falls(&mut self, t: Millis) {
        for beam in &mut self.beams {
            let Some(live) = beam.live.as_mut() else {
                continue;
            };
            if animator::next_deadline(&beam.config, live) <= t {
                animator::complete_fall(&beam.config, live);
            }
        }
    }

    // -- Output --

    /// Samples for every beam and live burst at the current time.
    /// Before activation this is the static placeholder frame.
    pub fn frame(&self) -> Frame {
        let now = self.clock.now();
        let beams = self
            .beams
            .iter()
            .map(|beam| {
                let offset = match &beam.live {
                    Some(live) => animator::offset_at(&beam.config, live, now),
                    None => beam.config.initial,
                };
                BeamSample {
                    beam: beam.id(),
                    position: collision::beam_origin(offset, &self.config),
                    rotation: beam.config.rotation,
                    length: beam.config.length.pixels(),
                    cycle: beam.cycle(),
                    phase: beam.phase_kind(),
                }
            })
            .collect();
        let bursts = self
            .beams
            .iter()
            .filter_map(Beam::burst)
            .filter_map(|burst| emitter::sample_burst(burst, now, &self.config))
            .collect();
        Frame { beams, bursts }
    }

    /// Collisions raised during the last tick.
    pub fn collisions(&self) -> &[CollisionEvent] {
        &self.collisions
    }

    /// Host events raised during the last tick.
    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    // -- Accessors --

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    pub fn is_active(&self) -> bool {
        self.gate.is_open() && !self.shut_down
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn beams(&self) -> &[Beam] {
        &self.beams
    }

    pub fn beam(&self, id: BeamId) -> Option<&Beam> {
        self.beams.get(id.0 as usize)
    }
}

/// The loop needs every fall to take time; a zero duration would never advance.
fn repair_beam(mut config: BeamConfig) -> BeamConfig {
    if config.duration == 0 {
        log::warn!("{}: zero duration, using default", config.id);
        config.duration = secs_to_ms(BeamConfig::DEFAULT_DURATION_SECS);
    }
    config
}
