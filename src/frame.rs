/// Longest step handed to animation callbacks, in seconds
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Seconds since the scene was activated
    pub time: f32,
    /// Seconds since the previous frame, clamped to [`MAX_FRAME_DELTA`]
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

/// Turns host timestamps (milliseconds) into per-frame timing.
/// The first tick after a reset has zero delta.
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    number: u64,
    start: Option<f64>,
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, timestamp_ms: f64) -> FrameInfo {
        let start = *self.start.get_or_insert(timestamp_ms);
        let delta = self
            .last
            .map_or(0.0, |last| ((timestamp_ms - last) / 1000.0) as f32)
            .clamp(0.0, MAX_FRAME_DELTA);
        let time = ((timestamp_ms - start) / 1000.0).max(0.0) as f32;

        let info = FrameInfo::new(self.number, time, delta);
        self.number += 1;
        self.last = Some(timestamp_ms);
        info
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn frame_number(&self) -> u64 {
        self.number
    }
}

/// Wall-clock milliseconds since the stopwatch was created
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: std::time::Instant,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_has_zero_delta() {
        let mut clock = FrameClock::new();
        let frame = clock.tick(5000.0);
        assert_eq!(frame.number, 0);
        assert_eq!(frame.delta, 0.0);
        assert_eq!(frame.time, 0.0);
    }

    #[test]
    fn test_delta_and_time_accumulate() {
        let mut clock = FrameClock::new();
        clock.tick(1000.0);
        let frame = clock.tick(1016.0);
        assert_eq!(frame.number, 1);
        assert!((frame.delta - 0.016).abs() < 1e-6);
        assert!((frame.time - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_delta_is_clamped_after_stall() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        let frame = clock.tick(3000.0);
        assert_eq!(frame.delta, MAX_FRAME_DELTA);
        assert!((frame.time - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_backwards_timestamp_gives_zero_delta() {
        let mut clock = FrameClock::new();
        clock.tick(100.0);
        assert_eq!(clock.tick(50.0).delta, 0.0);
    }

    #[test]
    fn test_reset_restarts_numbering() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        clock.tick(16.0);
        clock.reset();
        assert_eq!(clock.frame_number(), 0);
        assert_eq!(clock.tick(500.0).time, 0.0);
    }
}
