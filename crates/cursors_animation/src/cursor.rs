//! Cursor Entity Set
//!
//! Every sprite carries its own kinematic and visual state. The set is created
//! once with a fixed size and only mutated afterwards.

use crate::layout::{ring_positions, Viewport};
use crate::smoothing::wrap_degrees;
use cursors_core::{Color, Point};
use rand::Rng;

/// Randomization ranges used when the set is created
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnConfig {
    /// Idle ring radius as a fraction of the smaller display dimension
    pub ring_radius_ratio: f32,
    /// Rotation speeds are drawn from `[-max_rotation_speed, max_rotation_speed]` deg/frame
    pub max_rotation_speed: f32,
    /// Lowest value for each color channel
    pub min_channel: u8,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            ring_radius_ratio: 0.2,
            max_rotation_speed: 3.0,
            min_channel: 50,
        }
    }
}

/// One on-screen sprite
#[derive(Clone, Debug, PartialEq)]
pub struct Cursor {
    /// Sprite center in display coordinates
    pub position: Point,
    /// Last computed desired location
    pub target_position: Point,
    /// Degrees in `[0, 360)`
    pub rotation_angle: f32,
    /// Degrees per frame
    pub rotation_speed: f32,
    pub color: Color,
    /// Which target this cursor follows: `0` is the real pointer
    pub tracker_id: usize,
    pub is_real_pointer: bool,
    pub is_tracking: bool,
}

impl Cursor {
    pub fn new(position: Point, tracker_id: usize) -> Self {
        Self {
            position,
            target_position: position,
            rotation_angle: 0.0,
            rotation_speed: 0.0,
            color: Color::WHITE,
            tracker_id,
            is_real_pointer: tracker_id == 0,
            is_tracking: false,
        }
    }

    /// Advance rotation by one frame
    #[inline]
    pub fn advance_rotation(&mut self) {
        self.rotation_angle = wrap_degrees(self.rotation_angle + self.rotation_speed);
    }

    /// Start following `initial_target`
    pub fn begin_tracking(&mut self, initial_target: Point) {
        self.is_tracking = true;
        self.target_position = initial_target;
    }
}

/// The fixed set of cursors, index `0` bound to the real pointer
#[derive(Clone, Debug, Default)]
pub struct CursorSet {
    cursors: Vec<Cursor>,
}

impl CursorSet {
    /// Create `count` cursors on the idle ring with random colors, angles and
    /// rotation speeds
    pub fn spawn<R: Rng + ?Sized>(
        count: usize,
        viewport: Viewport,
        config: &SpawnConfig,
        rng: &mut R,
    ) -> Self {
        let max_speed = config.max_rotation_speed.abs();
        let cursors = ring_positions(viewport, count, config.ring_radius_ratio)
            .into_iter()
            .enumerate()
            .map(|(index, position)| {
                let mut cursor = Cursor::new(position, index);
                cursor.color = Color::from_rgb8(
                    rng.gen_range(config.min_channel..=u8::MAX),
                    rng.gen_range(config.min_channel..=u8::MAX),
                    rng.gen_range(config.min_channel..=u8::MAX),
                );
                cursor.rotation_angle = rng.gen_range(0.0..360.0);
                cursor.rotation_speed = if max_speed > 0.0 {
                    rng.gen_range(-max_speed..=max_speed)
                } else {
                    0.0
                };
                cursor
            })
            .collect();

        Self { cursors }
    }

    pub fn from_cursors(cursors: Vec<Cursor>) -> Self {
        Self { cursors }
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Cursor> {
        self.cursors.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cursor> {
        self.cursors.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Cursor> {
        self.cursors.iter_mut()
    }

    pub fn as_slice(&self) -> &[Cursor] {
        &self.cursors
    }

    /// Whether the set is tracking. Every cursor shares the flag.
    pub fn is_tracking(&self) -> bool {
        self.cursors.first().map_or(false, |c| c.is_tracking)
    }

    /// The cursor bound to the real pointer
    pub fn real_pointer(&self) -> Option<&Cursor> {
        self.cursors.iter().find(|c| c.is_real_pointer)
    }
}

impl<'a> IntoIterator for &'a CursorSet {
    type Item = &'a Cursor;
    type IntoIter = std::slice::Iter<'a, Cursor>;

    fn into_iter(self) -> Self::IntoIter {
        self.cursors.iter()
    }
}
