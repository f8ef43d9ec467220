pub mod queue;

pub use queue::{HostEvent, HostQueue};
