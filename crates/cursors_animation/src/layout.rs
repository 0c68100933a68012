//! Display bounds and the idle ring layout

use cursors_core::{Point, Rect};
use std::f32::consts::TAU;

/// Display dimensions, read once at startup
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn min_dimension(&self) -> f32 {
        self.width.min(self.height)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Whole pixels in `ratio` of the display width
    ///
    /// Sprite size, margins and offsets all scale with the width only.
    pub fn width_px(&self, ratio: f32) -> f32 {
        (self.width * ratio).trunc()
    }

    /// Whole pixels in `ratio` of the display height
    pub fn height_px(&self, ratio: f32) -> f32 {
        (self.height * ratio).trunc()
    }

    /// Clamp a point into `[0, W] x [0, H]`
    pub fn clamp(&self, point: Point) -> Point {
        point.clamp(Point::ZERO, Point::new(self.width, self.height))
    }

    /// Clamp a point into the display shrunk by `margin` on every side
    pub fn clamp_inset(&self, point: Point, margin: f32) -> Point {
        point.clamp(
            Point::new(margin, margin),
            Point::new(self.width - margin, self.height - margin),
        )
    }
}

/// Angle of slot `index` when `count` slots are spread evenly around a circle
#[inline]
pub fn slot_angle(index: usize, count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    TAU * index as f32 / count as f32
}

/// Evenly spaced positions on a circle around the display center
///
/// Slot `i` sits at angle `2π·i/count` on a circle of radius
/// `min(W, H) * radius_ratio`.
pub fn ring_positions(viewport: Viewport, count: usize, radius_ratio: f32) -> Vec<Point> {
    let center = viewport.center();
    let radius = viewport.min_dimension() * radius_ratio;
    (0..count)
        .map(|i| center + Point::from_polar(radius, slot_angle(i, count)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_of_ten_on_square_display() {
        let viewport = Viewport::new(1000.0, 1000.0);
        let positions = ring_positions(viewport, 10, 0.2);

        assert_eq!(positions.len(), 10);
        for (i, p) in positions.iter().enumerate() {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / 10.0;
            let expected_x = 500.0 + 200.0 * angle.cos();
            let expected_y = 500.0 + 200.0 * angle.sin();
            assert!((p.x as f64 - expected_x).abs() < 1e-3, "slot {i} x");
            assert!((p.y as f64 - expected_y).abs() < 1e-3, "slot {i} y");
        }
    }

    #[test]
    fn test_ring_uses_smaller_dimension() {
        let viewport = Viewport::new(1920.0, 1080.0);
        let positions = ring_positions(viewport, 4, 0.2);
        let center = viewport.center();
        for p in &positions {
            assert!((p.distance(center) - 216.0).abs() < 1e-3);
        }
        // Slot 0 sits to the right of center
        assert!((positions[0].x - (960.0 + 216.0)).abs() < 1e-3);
        assert!((positions[0].y - 540.0).abs() < 1e-3);
    }

    #[test]
    fn test_empty_ring() {
        assert!(ring_positions(Viewport::new(100.0, 100.0), 0, 0.2).is_empty());
        assert_eq!(slot_angle(3, 0), 0.0);
    }

    #[test]
    fn test_width_px_truncates() {
        let viewport = Viewport::new(1366.0, 768.0);
        assert_eq!(viewport.width_px(0.01), 13.0);
        assert_eq!(viewport.width_px(0.02), 27.0);
        assert_eq!(viewport.height_px(0.04), 30.0);
    }

    #[test]
    fn test_clamp_inset_uses_same_margin_on_both_axes() {
        let viewport = Viewport::new(800.0, 400.0);
        let clamped = viewport.clamp_inset(Point::new(-50.0, 1000.0), 8.0);
        assert_eq!(clamped, Point::new(8.0, 392.0));
    }
}
