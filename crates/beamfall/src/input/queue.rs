use crate::core::geometry::Surface;

/// Signals the host environment sends to the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// The host can animate now (first interactive frame).
    Ready,
    /// The surface was laid out or resized.
    SurfaceChanged(Surface),
    /// The surface is gone (unmounted, hidden). Polls skip until it returns.
    SurfaceLost,
    /// Tear the engine down.
    Shutdown,
}

/// A queue of host events.
/// JS writes events into the queue; Rust applies and drains them each frame.
pub struct HostQueue {
    events: Vec<HostEvent>,
}

impl HostQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(8),
        }
    }

    /// Push a new host event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: HostEvent) {
        self.events.push(event);
    }

    /// Drain all pending events in arrival order.
    pub fn drain(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for HostQueue {
    fn default() -> Self {
        Self::new()
    }
}
