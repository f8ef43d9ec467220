pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::config::EngineConfig;
pub use api::engine::Engine;
pub use api::error::{EngineError, EngineResult};
pub use api::frame::{BeamSample, BurstSample, Frame, ParticleSample};
pub use api::types::{BeamId, CollisionEvent, EngineEvent};
pub use components::beam::{Beam, BeamConfig, BeamPhase, BeamRuntimeState, LengthClass, PhaseKind};
pub use components::explosion::{Explosion, ExplosionParticle};
pub use crate::core::gate::ActivationGate;
pub use crate::core::geometry::{Rect, Surface};
pub use crate::core::time::{FrameClock, Millis};
pub use renderer::instance::{InstanceKind, RenderBuffer, RenderInstance};
pub use input::queue::{HostEvent, HostQueue};
pub use assets::registry::{BeamRegistry, BeamSpec};
pub use bridge::protocol::{pack_frame, FrameHeader, ProtocolLayout};
pub use systems::render::build_render_buffer;
pub use systems::rng::{RandomSource, SeededRandom};

// Extensions: pure math helpers
pub use extensions::{Easing, lerp, lerp_vec2, ease, ease_vec2};
