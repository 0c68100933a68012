//! Motion Update
//!
//! Moves every cursor one frame toward its target. Idle cursors only spin;
//! tracking cursors pick a target, apply their ring offset, smooth toward it
//! and stay clamped inside the display.

use crate::cursor::CursorSet;
use crate::layout::{slot_angle, Viewport};
use crate::smoothing::Smoothing;
use crate::targets::TargetSource;
use cursors_core::Point;
use tracing::trace;

/// Tuning for the motion update
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionConfig {
    /// Smoothing factor for the cursor bound to the real pointer
    pub real_smoothing: f32,
    /// Smoothing factor for cursors following synthetic targets
    pub synthetic_smoothing: f32,
    /// Base offset distance as a fraction of the display width
    pub offset_base_ratio: f32,
    /// Extra offset distance per tracker id, in pixels
    pub offset_step: f32,
    /// Clamp margin as a fraction of the display width
    pub margin_ratio: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            real_smoothing: 0.3,
            synthetic_smoothing: 0.15,
            offset_base_ratio: 0.02,
            offset_step: 3.0,
            margin_ratio: 0.01,
        }
    }
}

/// What happened during one motion step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MotionStats {
    /// Cursors whose position was updated
    pub moved: usize,
    /// Tracking cursors with no target this frame
    pub skipped: usize,
}

/// Per-frame motion step for a cursor set
#[derive(Clone, Copy, Debug)]
pub struct MotionUpdate {
    config: MotionConfig,
    real: Smoothing,
    synthetic: Smoothing,
}

impl MotionUpdate {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            real: Smoothing::new(config.real_smoothing),
            synthetic: Smoothing::new(config.synthetic_smoothing),
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Offset applied to a synthetic cursor's target
    pub fn offset(
        &self,
        viewport: Viewport,
        index: usize,
        count: usize,
        tracker_id: usize,
    ) -> Point {
        let distance = viewport.width_px(self.config.offset_base_ratio)
            + tracker_id as f32 * self.config.offset_step;
        Point::from_polar(distance, slot_angle(index, count))
    }

    /// Margin kept between cursor centers and the display edges
    pub fn margin(&self, viewport: Viewport) -> f32 {
        viewport.width_px(self.config.margin_ratio)
    }

    /// Advance every cursor by one frame
    pub fn step(
        &self,
        cursors: &mut CursorSet,
        targets: &TargetSource,
        pointer: Point,
        viewport: Viewport,
    ) -> MotionStats {
        let count = cursors.len();
        let margin = self.margin(viewport);
        let mut stats = MotionStats::default();

        for (index, cursor) in cursors.iter_mut().enumerate() {
            if !cursor.is_tracking {
                cursor.advance_rotation();
                continue;
            }

            let raw_target = if cursor.is_real_pointer {
                Some(pointer)
            } else {
                targets.target(cursor.tracker_id)
            };
            let Some(raw_target) = raw_target else {
                trace!(index, tracker_id = cursor.tracker_id, "no target for tracker");
                cursor.advance_rotation();
                stats.skipped += 1;
                continue;
            };

            let (target, smoothing) = if cursor.is_real_pointer {
                (raw_target, self.real)
            } else {
                (
                    raw_target + self.offset(viewport, index, count, cursor.tracker_id),
                    self.synthetic,
                )
            };

            cursor.advance_rotation();
            cursor.target_position = target;
            cursor.position =
                viewport.clamp_inset(smoothing.step_point(cursor.position, target), margin);
            stats.moved += 1;
        }

        stats
    }
}

impl Default for MotionUpdate {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{Cursor, SpawnConfig};
    use crate::targets::{SyntheticTarget, TargetConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn viewport() -> Viewport {
        Viewport::new(1000.0, 1000.0)
    }

    fn no_targets() -> TargetSource {
        TargetSource::from_targets(Vec::new(), viewport(), TargetConfig::default())
    }

    #[test]
    fn test_real_pointer_smoothing_scenario() {
        // Large display keeps the scenario away from the clamp margin
        let view = Viewport::new(10_000.0, 10_000.0);
        let pointer = Point::new(300.0, 200.0);
        let mut cursor = Cursor::new(Point::new(200.0, 200.0), 0);
        cursor.begin_tracking(pointer);
        let mut cursors = CursorSet::from_cursors(vec![cursor]);

        let motion = MotionUpdate::default();
        motion.step(&mut cursors, &no_targets(), pointer, view);
        assert!((cursors.as_slice()[0].position.x - 230.0).abs() < 1e-3);
        motion.step(&mut cursors, &no_targets(), pointer, view);
        assert!((cursors.as_slice()[0].position.x - 251.0).abs() < 1e-3);
        assert_eq!(cursors.as_slice()[0].target_position, pointer);
    }

    #[test]
    fn test_pointer_at_top_edge_is_followed_inside_margin() {
        let pointer = Point::new(100.0, 0.0);
        let mut cursor = Cursor::new(Point::ZERO, 0);
        cursor.begin_tracking(pointer);
        let mut cursors = CursorSet::from_cursors(vec![cursor]);

        let motion = MotionUpdate::default();
        let margin = motion.margin(viewport());
        assert_eq!(margin, 10.0);

        motion.step(&mut cursors, &no_targets(), pointer, viewport());
        let first = cursors.as_slice()[0].position;
        assert!((first.x - 30.0).abs() < 1e-3);
        assert_eq!(first.y, margin);

        motion.step(&mut cursors, &no_targets(), pointer, viewport());
        let second = cursors.as_slice()[0].position;
        assert!((second.x - 51.0).abs() < 1e-3);
        assert_eq!(second.y, margin);
    }

    #[test]
    fn test_idle_positions_are_frozen() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut cursors = CursorSet::spawn(10, viewport(), &SpawnConfig::default(), &mut rng);
        let before: Vec<Point> = cursors.iter().map(|c| c.position).collect();

        let motion = MotionUpdate::default();
        for _ in 0..120 {
            let stats = motion.step(
                &mut cursors,
                &no_targets(),
                Point::new(3.0, 3.0),
                viewport(),
            );
            assert_eq!(stats, MotionStats::default());
        }

        for (cursor, start) in cursors.iter().zip(before) {
            assert_eq!(cursor.position, start);
            assert!((0.0..360.0).contains(&cursor.rotation_angle));
        }
    }

    #[test]
    fn test_synthetic_cursor_targets_offset_position() {
        let targets = TargetSource::from_targets(
            vec![SyntheticTarget::new(Point::new(500.0, 500.0))],
            viewport(),
            TargetConfig::default(),
        );
        let mut real = Cursor::new(Point::new(500.0, 500.0), 0);
        let mut synthetic = Cursor::new(Point::new(500.0, 500.0), 1);
        real.is_tracking = true;
        synthetic.is_tracking = true;
        let mut cursors = CursorSet::from_cursors(vec![real, synthetic]);

        let motion = MotionUpdate::default();
        let stats = motion.step(&mut cursors, &targets, Point::new(500.0, 500.0), viewport());
        assert_eq!(stats.moved, 2);

        // Index 1 of 2 sits at angle π, distance trunc(0.02 * 1000) + 1 * 3 = 23
        let cursor = &cursors.as_slice()[1];
        assert!((cursor.target_position.x - 477.0).abs() < 1e-3);
        assert!((cursor.target_position.y - 500.0).abs() < 1e-3);
        assert!((cursor.position.x - (500.0 - 23.0 * 0.15)).abs() < 1e-3);
    }

    #[test]
    fn test_missing_target_skips_position_but_rotates() {
        let mut cursor = Cursor::new(Point::new(400.0, 400.0), 3);
        cursor.is_tracking = true;
        cursor.rotation_angle = 10.0;
        cursor.rotation_speed = 2.0;
        let mut cursors = CursorSet::from_cursors(vec![cursor]);

        let stats =
            MotionUpdate::default().step(&mut cursors, &no_targets(), Point::ZERO, viewport());

        assert_eq!(stats, MotionStats { moved: 0, skipped: 1 });
        let cursor = &cursors.as_slice()[0];
        assert_eq!(cursor.position, Point::new(400.0, 400.0));
        assert!((cursor.rotation_angle - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_positions_clamped_to_margin() {
        let mut cursor = Cursor::new(Point::new(5.0, 995.0), 0);
        cursor.is_tracking = true;
        let mut cursors = CursorSet::from_cursors(vec![cursor]);

        MotionUpdate::default().step(
            &mut cursors,
            &no_targets(),
            Point::new(-100.0, 2000.0),
            viewport(),
        );

        // Margin is trunc(0.01 * 1000) = 10 on both axes
        assert_eq!(cursors.as_slice()[0].position, Point::new(10.0, 990.0));
    }

    #[test]
    fn test_margin_and_offset_follow_width_only() {
        let motion = MotionUpdate::default();
        let wide = Viewport::new(1920.0, 1080.0);
        assert_eq!(motion.margin(wide), 19.0);
        let offset = motion.offset(wide, 0, 4, 2);
        assert!((offset.x - (38.0 + 6.0)).abs() < 1e-4);
        assert!(offset.y.abs() < 1e-4);
    }
}
