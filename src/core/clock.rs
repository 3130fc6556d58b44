use std::time::Instant;

use super::frame::FrameInfo;

/// Longest delta handed to the animation in one tick.
/// A stalled window (drag, minimise) would otherwise teleport the train.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Frame clock - delta since last tick plus elapsed time since start
#[derive(Debug)]
pub struct Clock {
    start: Instant,
    last_tick: Instant,
    frame_number: u64,
}

impl Clock {
    /// Create new clock starting now
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            frame_number: 0,
        }
    }

    /// Advance the clock and describe the new frame
    pub fn tick(&mut self) -> FrameInfo {
        let now = Instant::now();
        let delta = now
            .duration_since(self.last_tick)
            .as_secs_f32()
            .min(MAX_FRAME_DELTA);
        let elapsed = now.duration_since(self.start).as_secs_f32();
        self.last_tick = now;

        let info = FrameInfo::new(self.frame_number, elapsed, delta);
        self.frame_number += 1;
        info
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn clock_measures_delta() {
        let mut clock = Clock::new();

        thread::sleep(Duration::from_millis(10));
        let frame = clock.tick();

        // Roughly 10ms
        assert!(frame.delta >= 0.009 && frame.delta <= 0.05);
        assert_eq!(frame.number, 0);
        assert_eq!(clock.tick().number, 1);
    }

    #[test]
    fn clock_clamps_long_stalls() {
        let mut clock = Clock::new();

        thread::sleep(Duration::from_millis(150));
        let frame = clock.tick();

        assert_eq!(frame.delta, MAX_FRAME_DELTA);
        assert!(frame.time >= 0.15);
    }
}
