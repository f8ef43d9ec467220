pub mod registry;

pub use registry::{BeamRegistry, BeamSpec};
