/// Turns variable host frame time into whole simulation ticks. Movement is
/// expressed per tick, so the tick rate is the game speed.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        // A stalled tab resumes with at most ten ticks.
        self.accumulator = self.accumulator.min(self.dt * 10.0);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Monotonic millisecond clock advanced by the host.
/// Animation frames compare against it; physics never reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Clock {
    now_ms: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self { now_ms: 0.0 }
    }

    /// Advance by a frame delta in seconds.
    pub fn advance(&mut self, dt: f32) {
        self.now_ms += dt as f64 * 1000.0;
    }

    /// Milliseconds since the clock started.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }
}
