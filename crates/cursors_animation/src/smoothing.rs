//! Exponential smoothing and angle wrapping

use cursors_core::Point;

/// First-order low-pass filter toward a target
///
/// Each step closes `factor` of the remaining gap:
/// `value += (target - value) * factor`. For `factor` in `(0, 1)` the value
/// converges monotonically and never overshoots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Smoothing {
    factor: f32,
}

impl Smoothing {
    /// Create a filter. `factor` is clamped into `[0, 1]`.
    pub fn new(factor: f32) -> Self {
        Self {
            factor: factor.clamp(0.0, 1.0),
        }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Advance a scalar one step toward `target`
    #[inline]
    pub fn step(&self, value: f32, target: f32) -> f32 {
        value + (target - value) * self.factor
    }

    /// Advance a point one step toward `target`, per axis
    #[inline]
    pub fn step_point(&self, value: Point, target: Point) -> Point {
        Point::new(self.step(value.x, target.x), self.step(value.y, target.y))
    }

    /// Number of steps until a gap of `distance` shrinks below `epsilon`
    ///
    /// Returns `None` when the filter never gets there (factor 0).
    pub fn steps_to_settle(&self, distance: f32, epsilon: f32) -> Option<u32> {
        let distance = distance.abs();
        if distance <= epsilon {
            return Some(0);
        }
        if self.factor <= 0.0 {
            return None;
        }
        if self.factor >= 1.0 {
            return Some(1);
        }
        let retain = 1.0 - self.factor;
        let steps = ((epsilon / distance).ln() / retain.ln()).ceil();
        Some(steps.max(1.0) as u32)
    }
}

/// Wrap an angle that has moved at most one turn outside `[0, 360)` back into it
///
/// Rotation speeds are bounded well below a full turn per frame, so a single
/// correction is enough.
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = if angle >= 360.0 {
        angle - 360.0
    } else if angle < 0.0 {
        angle + 360.0
    } else {
        angle
    };
    // -1e-6 + 360 rounds to exactly 360.0 in f32
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
