//! Frame clock for hosts.
//!
//! The engine only needs "seconds since the last frame" to advance playback.
//! [`FrameClock`] measures that from the wall clock, caps it so a stalled
//! frame (window drag, breakpoint) cannot skip most of the animation, and
//! keeps a rolling frames-per-second figure for logging. A fixed-step clock
//! replays the same delta every tick, for captures and tests.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//! loop {
//!     engine.update(clock.tick());
//! }
//! ```

use std::time::{Duration, Instant};

/// Longest delta a single tick may report, in seconds.
pub const MAX_DELTA: f32 = 0.1;

const FPS_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy)]
enum Source {
    Wall { last: Option<Instant> },
    Fixed(f32),
}

/// Per-frame delta source.
#[derive(Debug, Clone)]
pub struct FrameClock {
    source: Source,
    frames: u64,
    window_start: Option<Instant>,
    window_frames: u32,
    fps: f32,
}

impl FrameClock {
    /// Wall-clock deltas. The first tick reports 0.
    pub fn new() -> Self {
        Self::with_source(Source::Wall { last: None })
    }

    /// The same `step` seconds every tick. Negative steps count as 0.
    pub fn fixed(step: f32) -> Self {
        Self::with_source(Source::Fixed(step.max(0.0)))
    }

    fn with_source(source: Source) -> Self {
        Self {
            source,
            frames: 0,
            window_start: None,
            window_frames: 0,
            fps: 0.0,
        }
    }

    /// Seconds since the previous tick, capped at [`MAX_DELTA`].
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = match &mut self.source {
            Source::Fixed(step) => *step,
            Source::Wall { last } => {
                let delta = last.map_or(0.0, |prev| now.duration_since(prev).as_secs_f32());
                *last = Some(now);
                delta.min(MAX_DELTA)
            }
        };

        self.frames += 1;
        self.window_frames += 1;
        let start = *self.window_start.get_or_insert(now);
        let window = now.duration_since(start);
        if window >= FPS_WINDOW {
            self.fps = self.window_frames as f32 / window.as_secs_f32();
            self.window_start = Some(now);
            self.window_frames = 0;
        }

        delta
    }

    /// Forget the previous tick so the next one reports 0, e.g. after the
    /// window was hidden.
    pub fn reset(&mut self) {
        if let Source::Wall { last } = &mut self.source {
            *last = None;
        }
        self.window_start = None;
        self.window_frames = 0;
    }

    /// Ticks so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames per second over the last half second. 0 until measured.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(), 0.0);
        assert_eq!(clock.frames(), 1);
    }

    #[test]
    fn test_wall_delta() {
        let mut clock = FrameClock::new();
        clock.tick();
        thread::sleep(Duration::from_millis(10));
        let delta = clock.tick();
        assert!(delta >= 0.01 && delta <= MAX_DELTA);
    }

    #[test]
    fn test_delta_is_capped() {
        let mut clock = FrameClock::new();
        clock.tick();
        thread::sleep(Duration::from_millis(150));
        assert_eq!(clock.tick(), MAX_DELTA);
    }

    #[test]
    fn test_reset_skips_gap() {
        let mut clock = FrameClock::new();
        clock.tick();
        thread::sleep(Duration::from_millis(20));
        clock.reset();
        assert_eq!(clock.tick(), 0.0);
    }

    #[test]
    fn test_fixed_step() {
        let mut clock = FrameClock::fixed(1.0 / 60.0);
        assert_eq!(clock.tick(), 1.0 / 60.0);
        assert_eq!(clock.tick(), 1.0 / 60.0);
        assert_eq!(FrameClock::fixed(-1.0).tick(), 0.0);
    }
}
