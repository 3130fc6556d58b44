//! Self-contained timers - each accumulates delta time and decides when to fire

/// Throttled timer - minimum interval between fires
#[derive(Debug, Clone, Copy)]
pub struct Throttled {
    min_interval: f32,
    time_since_last: f32,
}

impl Throttled {
    /// Create throttled timer with minimum interval
    pub fn new(min_interval: f32) -> Self {
        Self {
            min_interval,
            time_since_last: 0.0,
        }
    }

    /// Attempt to fire, returns the time covered since the last fire
    pub fn try_tick(&mut self, delta: f32) -> Option<f32> {
        self.time_since_last += delta;

        if self.time_since_last >= self.min_interval {
            let covered = self.time_since_last;
            self.time_since_last = 0.0;
            Some(covered)
        } else {
            None
        }
    }
}

/// Countdown timer - fires once after duration
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    duration: f32,
    elapsed: f32,
    active: bool,
}

impl Countdown {
    /// Create inactive countdown
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
            active: false,
        }
    }

    /// Start (or restart) the countdown
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.active = true;
    }

    /// Tick with delta, returns true if completed
    pub fn tick(&mut self, delta: f32) -> bool {
        if !self.active {
            return false;
        }

        self.elapsed += delta;

        if self.elapsed >= self.duration {
            self.active = false;
            true
        } else {
            false
        }
    }
}

/// Frame rate meter reporting once per interval
#[derive(Debug, Clone, Copy)]
pub struct FpsMeter {
    window: Throttled,
    frames: u32,
    fps: f32,
}

impl FpsMeter {
    pub fn new(interval: f32) -> Self {
        Self {
            window: Throttled::new(interval),
            frames: 0,
            fps: 0.0,
        }
    }

    /// Count a frame; returns the new reading when the interval closes
    pub fn frame(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        let covered = self.window.try_tick(delta)?;
        self.fps = self.frames as f32 / covered.max(f32::EPSILON);
        self.frames = 0;
        Some(self.fps)
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}
