pub mod animator;
pub mod collision;
pub mod emitter;
pub mod render;
pub mod rng;
pub mod scheduler;
