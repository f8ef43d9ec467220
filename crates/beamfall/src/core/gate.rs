/// Lazy activation barrier.
///
/// Closed until the host reports it is ready to animate. While closed the
/// engine only produces the static placeholder frame and never touches its
/// random source. Opens exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivationGate {
    open: bool,
}

impl ActivationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the gate. Returns `true` only for the call that flipped it.
    pub fn open(&mut self) -> bool {
        !std::mem::replace(&mut self.open, true)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}
