pub mod instance;

pub use instance::{InstanceKind, RenderBuffer, RenderInstance};
