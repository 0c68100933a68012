//! Frame scheduler
//!
//! Timestamps ticks for the update loop. Pacing is left to the platform
//! event loop; the clock only turns frame start instants into elapsed time.
//! Timestamps are passed in so headless runs can drive the clock with
//! synthetic time.

use std::time::{Duration, Instant};

/// Timing for one frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTick {
    /// Zero-based frame counter
    pub index: u64,
    /// Time since the clock started
    pub elapsed: Duration,
    /// Time since the previous frame
    pub dt: Duration,
}

/// Frame clock anchored at the start of a run
#[derive(Clone, Debug)]
pub struct FrameClock {
    started: Instant,
    last_frame: Option<Instant>,
    frames: u64,
}

impl FrameClock {
    pub fn new(now: Instant) -> Self {
        Self {
            started: now,
            last_frame: None,
            frames: 0,
        }
    }

    /// Start a frame at `now`
    ///
    /// Instants earlier than the previous frame count as no time passing.
    pub fn begin_frame(&mut self, now: Instant) -> FrameTick {
        let dt = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        let tick = FrameTick {
            index: self.frames,
            elapsed: now.saturating_duration_since(self.started),
            dt,
        };
        self.last_frame = Some(now);
        self.frames += 1;
        tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_frame_tracks_elapsed_and_dt() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start);

        let first = clock.begin_frame(start);
        assert_eq!(first.index, 0);
        assert_eq!(first.dt, Duration::ZERO);
        assert_eq!(first.elapsed, Duration::ZERO);

        let later = start + Duration::from_millis(20);
        let second = clock.begin_frame(later);
        assert_eq!(second.index, 1);
        assert_eq!(second.dt, Duration::from_millis(20));
        assert_eq!(second.elapsed, Duration::from_millis(20));
        assert_eq!(clock.begin_frame(later).index, 2);
    }

    #[test]
    fn test_out_of_order_instants_saturate() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start + Duration::from_millis(10));

        let tick = clock.begin_frame(start);
        assert_eq!(tick.elapsed, Duration::ZERO);

        let tick = clock.begin_frame(start);
        assert_eq!(tick.dt, Duration::ZERO);
        assert_eq!(tick.index, 1);
    }
}
