//! Target Source
//!
//! Synthetic targets stand in for additional pointing devices. Each one
//! wanders with a piecewise-constant random velocity that is redrawn on a
//! wall-clock cadence, independent of the frame rate.

use crate::layout::Viewport;
use cursors_core::Point;
use rand::Rng;
use std::time::Duration;

/// Tuning for synthetic target motion
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetConfig {
    /// Minimum time between velocity redraws
    pub velocity_refresh: Duration,
    /// Velocity components are drawn from `[-max_velocity, max_velocity]` px/frame
    pub max_velocity: f32,
    /// Initial positions keep this fraction of each dimension clear of the edges
    pub spawn_inset_ratio: f32,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            velocity_refresh: Duration::from_millis(100),
            max_velocity: 2.0,
            spawn_inset_ratio: 0.1,
        }
    }
}

/// A synthetic pointer
#[derive(Clone, Debug, PartialEq)]
pub struct SyntheticTarget {
    pub position: Point,
    pub velocity: Point,
    /// Timestamp of the last velocity draw; `None` until the first refresh
    pub last_velocity_update: Option<Duration>,
}

impl SyntheticTarget {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            velocity: Point::ZERO,
            last_velocity_update: None,
        }
    }

    fn velocity_due(&self, now: Duration, refresh: Duration) -> bool {
        match self.last_velocity_update {
            None => true,
            Some(last) => now.saturating_sub(last) > refresh,
        }
    }
}

/// Positions for every tracker: the real pointer plus N-1 synthetic targets
///
/// Tracker `0` is the real pointer and is never stored here. Tracker `i > 0`
/// maps to synthetic target `i - 1`.
#[derive(Clone, Debug)]
pub struct TargetSource {
    targets: Vec<SyntheticTarget>,
    viewport: Viewport,
    config: TargetConfig,
}

impl TargetSource {
    /// Spawn `count` synthetic targets at random positions inside the display
    pub fn spawn<R: Rng + ?Sized>(
        count: usize,
        viewport: Viewport,
        config: TargetConfig,
        rng: &mut R,
    ) -> Self {
        let inset = config.spawn_inset_ratio.clamp(0.0, 0.5);
        let targets = (0..count)
            .map(|_| {
                let x = sample_span(rng, viewport.width * inset, viewport.width * (1.0 - inset));
                let y = sample_span(
                    rng,
                    viewport.height * inset,
                    viewport.height * (1.0 - inset),
                );
                SyntheticTarget::new(Point::new(x, y))
            })
            .collect();

        Self::from_targets(targets, viewport, config)
    }

    /// Build a source from explicit targets
    pub fn from_targets(
        targets: Vec<SyntheticTarget>,
        viewport: Viewport,
        config: TargetConfig,
    ) -> Self {
        Self {
            targets,
            viewport,
            config,
        }
    }

    /// Advance every synthetic target by one frame
    ///
    /// Velocities older than the refresh interval are redrawn first; then
    /// every target integrates its velocity and is clamped into the display.
    pub fn refresh<R: Rng + ?Sized>(&mut self, now: Duration, rng: &mut R) {
        let max_velocity = self.config.max_velocity.abs();
        for target in &mut self.targets {
            if target.velocity_due(now, self.config.velocity_refresh) {
                target.velocity = Point::new(
                    sample_span(rng, -max_velocity, max_velocity),
                    sample_span(rng, -max_velocity, max_velocity),
                );
                target.last_velocity_update = Some(now);
            }
            target.position += target.velocity;
            target.position = self.viewport.clamp(target.position);
        }
    }

    /// Current position of a synthetic tracker, `None` for the real pointer or
    /// an id with no target
    pub fn target(&self, tracker_id: usize) -> Option<Point> {
        let index = tracker_id.checked_sub(1)?;
        self.targets.get(index).map(|t| t.position)
    }

    pub fn targets(&self) -> &[SyntheticTarget] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

/// Uniform sample in `[low, high]`, tolerating an empty span
fn sample_span<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..=high)
    } else {
        low
    }
}
