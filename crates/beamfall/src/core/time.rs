/// Engine time in whole milliseconds since construction.
pub type Millis = u64;

/// Convert a duration in seconds to whole milliseconds.
/// Negative and non-finite inputs map to zero.
pub fn secs_to_ms(secs: f32) -> Millis {
    if !secs.is_finite() || secs <= 0.0 {
        return 0;
    }
    (secs as f64 * 1000.0).round() as Millis
}

/// Frame clock.
/// Turns variable host frame deltas into a monotonic millisecond clock,
/// carrying the sub-millisecond remainder so no time is lost between frames.
pub struct FrameClock {
    /// Current engine time.
    now: Millis,
    /// Fractional milliseconds not yet applied.
    remainder: f64,
    /// Largest delta a single frame may contribute.
    max_frame_ms: Millis,
}

impl FrameClock {
    pub fn new(max_frame_ms: Millis) -> Self {
        Self {
            now: 0,
            remainder: 0.0,
            max_frame_ms: max_frame_ms.max(1),
        }
    }

    /// Add a frame delta in seconds. Returns the new engine time.
    pub fn advance(&mut self, frame_dt: f32) -> Millis {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return self.now;
        }
        // Cap so a backgrounded host cannot force an unbounded catch-up
        let ms = (frame_dt as f64 * 1000.0).min(self.max_frame_ms as f64);
        self.remainder += ms;
        let whole = self.remainder.floor();
        self.remainder -= whole;
        self.now = self.now.saturating_add(whole as Millis);
        self.now
    }

    /// Add a whole number of milliseconds, bypassing the frame cap.
    pub fn advance_ms(&mut self, ms: Millis) -> Millis {
        self.now = self.now.saturating_add(ms);
        self.now
    }

    /// Current engine time.
    pub fn now(&self) -> Millis {
        self.now
    }
}
