//! Geometry and color primitives
//!
//! All coordinates are display pixels with the origin at the top-left corner
//! and y growing downwards.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

/// A 2D point (or vector) in display pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point at `distance` from the origin in direction `angle` (radians)
    pub fn from_polar(distance: f32, angle: f32) -> Self {
        Self {
            x: distance * angle.cos(),
            y: distance * angle.sin(),
        }
    }

    pub fn distance(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Clamp each axis independently into `[min, max]`
    pub fn clamp(self, min: Point, max: Point) -> Self {
        Self {
            x: self.x.max(min.x).min(max.x),
            y: self.y.max(min.y).min(max.y),
        }
    }

    /// Rotate around the origin by `degrees`, counter-clockwise on screen
    ///
    /// Screen y points down, so a visually counter-clockwise turn is a
    /// negative mathematical angle.
    pub fn rotate_degrees(self, degrees: f32) -> Self {
        let (sin, cos) = (-degrees.to_radians()).sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;

    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

/// An axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A `width` x `height` rectangle centered on `center`
    pub fn centered(center: Point, width: f32, height: f32) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Hit test. The right and bottom edges are exclusive.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// RGBA color with f32 components (0.0 to 1.0)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create from u8 components (0-255), fully opaque
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Create from hex value (0xRRGGBB)
    pub fn from_hex(hex: u32) -> Self {
        Self::from_rgb8(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Convert to u8 array [r, g, b, a]
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        ]
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert!(rect.contains(Point::new(10.0, 20.0)));
        assert!(rect.contains(Point::new(39.9, 59.9)));
        assert!(!rect.contains(Point::new(40.0, 30.0)));
        assert!(!rect.contains(Point::new(20.0, 60.0)));
        assert!(!rect.contains(Point::new(9.9, 30.0)));
    }

    #[test]
    fn test_rect_centered() {
        let rect = Rect::centered(Point::new(500.0, 400.0), 200.0, 50.0);
        assert_eq!(rect, Rect::new(400.0, 375.0, 200.0, 50.0));
        assert_eq!(rect.center(), Point::new(500.0, 400.0));
    }

    #[test]
    fn test_rotate_degrees_is_counter_clockwise_on_screen() {
        // Pointing right, a quarter turn counter-clockwise points up (negative y)
        let rotated = Point::new(1.0, 0.0).rotate_degrees(90.0);
        assert!(approx(rotated, Point::new(0.0, -1.0)));

        let full_turn = Point::new(3.0, 4.0).rotate_degrees(360.0);
        assert!(approx(full_turn, Point::new(3.0, 4.0)));
    }

    #[test]
    fn test_point_clamp_per_axis() {
        let p = Point::new(-5.0, 120.0).clamp(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        assert_eq!(p, Point::new(0.0, 100.0));
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex(0x00C800).to_rgba8(), [0, 200, 0, 255]);
        assert_eq!(Color::from_rgb8(50, 255, 128).to_rgba8(), [50, 255, 128, 255]);
    }
}
