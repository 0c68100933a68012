//! Assertion helpers for headless scenarios.

use crate::mode::Mode;
use crate::state::AnimationState;
use cursors_core::Point;
use serde::Serialize;

/// Snapshot of the observable swarm state used for assertions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwarmSnapshot {
    pub mode: Mode,
    pub width: f32,
    pub height: f32,
    /// Clamp margin tracking cursors are kept within
    pub margin: f32,
    pub cursors: Vec<CursorProbe>,
}

/// Minimal cursor representation for assertions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CursorProbe {
    pub position: Point,
    pub rotation_angle: f32,
    pub is_tracking: bool,
}

impl SwarmSnapshot {
    pub fn capture(state: &AnimationState) -> Self {
        let viewport = state.viewport();
        Self {
            mode: state.mode(),
            width: viewport.width,
            height: viewport.height,
            margin: state.clamp_margin(),
            cursors: state
                .cursors()
                .iter()
                .map(|c| CursorProbe {
                    position: c.position,
                    rotation_angle: c.rotation_angle,
                    is_tracking: c.is_tracking,
                })
                .collect(),
        }
    }
}

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

fn failed(code: &str, message: String) -> AssertionResult {
    AssertionResult::Failed {
        code: code.to_string(),
        message,
    }
}

pub fn evaluate_assert_mode(expected: Mode, snapshot: &SwarmSnapshot) -> AssertionResult {
    if snapshot.mode == expected {
        AssertionResult::Passed
    } else {
        failed(
            "mode_mismatch",
            format!("expected mode {expected:?}, got {:?}", snapshot.mode),
        )
    }
}

pub fn evaluate_assert_cursor_near(
    index: usize,
    expected: Point,
    tolerance: f32,
    snapshot: &SwarmSnapshot,
) -> AssertionResult {
    let Some(cursor) = snapshot.cursors.get(index) else {
        return failed(
            "missing_cursor",
            format!(
                "cursor {index} not found ({} cursors)",
                snapshot.cursors.len()
            ),
        );
    };
    let distance = cursor.position.distance(expected);
    if distance <= tolerance {
        AssertionResult::Passed
    } else {
        failed(
            "cursor_not_near",
            format!(
                "cursor {index}: expected ({}, {}) ± {tolerance}, got ({}, {}) at distance {distance}",
                expected.x, expected.y, cursor.position.x, cursor.position.y
            ),
        )
    }
}

/// Every cursor lies on the display and rotation angles are wrapped.
///
/// Tracking cursors must also respect the clamp margin.
pub fn evaluate_assert_in_bounds(snapshot: &SwarmSnapshot) -> AssertionResult {
    for (index, cursor) in snapshot.cursors.iter().enumerate() {
        let inset = if cursor.is_tracking { snapshot.margin } else { 0.0 };
        let p = cursor.position;
        let inside = p.is_finite()
            && (inset..=snapshot.width - inset).contains(&p.x)
            && (inset..=snapshot.height - inset).contains(&p.y);
        if !inside {
            return failed(
                "out_of_bounds",
                format!("cursor {index} at ({}, {}) is outside the display", p.x, p.y),
            );
        }
        if !(0.0..360.0).contains(&cursor.rotation_angle) {
            return failed(
                "rotation_out_of_range",
                format!(
                    "cursor {index} rotation {} outside [0, 360)",
                    cursor.rotation_angle
                ),
            );
        }
    }
    AssertionResult::Passed
}

/// All cursors share the expected tracking flag.
pub fn evaluate_assert_tracking(expected: bool, snapshot: &SwarmSnapshot) -> AssertionResult {
    match snapshot
        .cursors
        .iter()
        .position(|c| c.is_tracking != expected)
    {
        None => AssertionResult::Passed,
        Some(index) => failed(
            "tracking_mismatch",
            format!("cursor {index}: expected is_tracking={expected}"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(positions: &[(f32, f32)], tracking: bool) -> SwarmSnapshot {
        SwarmSnapshot {
            mode: if tracking { Mode::Tracking } else { Mode::Idle },
            width: 100.0,
            height: 50.0,
            margin: 1.0,
            cursors: positions
                .iter()
                .map(|&(x, y)| CursorProbe {
                    position: Point::new(x, y),
                    rotation_angle: 0.0,
                    is_tracking: tracking,
                })
                .collect(),
        }
    }

    #[test]
    fn mode_assertion() {
        let snap = snapshot(&[], false);
        assert_eq!(evaluate_assert_mode(Mode::Idle, &snap), AssertionResult::Passed);
        assert!(matches!(
            evaluate_assert_mode(Mode::Tracking, &snap),
            AssertionResult::Failed { code, .. } if code == "mode_mismatch"
        ));
    }

    #[test]
    fn cursor_near_assertion() {
        let snap = snapshot(&[(10.0, 10.0)], false);
        assert_eq!(
            evaluate_assert_cursor_near(0, Point::new(12.0, 10.0), 2.0, &snap),
            AssertionResult::Passed
        );
        assert!(matches!(
            evaluate_assert_cursor_near(0, Point::new(20.0, 10.0), 2.0, &snap),
            AssertionResult::Failed { code, .. } if code == "cursor_not_near"
        ));
        assert!(matches!(
            evaluate_assert_cursor_near(5, Point::ZERO, 2.0, &snap),
            AssertionResult::Failed { code, .. } if code == "missing_cursor"
        ));
    }

    #[test]
    fn bounds_respect_margin_only_while_tracking() {
        assert_eq!(
            evaluate_assert_in_bounds(&snapshot(&[(0.5, 25.0)], false)),
            AssertionResult::Passed
        );
        assert!(matches!(
            evaluate_assert_in_bounds(&snapshot(&[(0.5, 25.0)], true)),
            AssertionResult::Failed { code, .. } if code == "out_of_bounds"
        ));
    }

    #[test]
    fn tracking_assertion() {
        let mut snap = snapshot(&[(1.0, 1.0), (2.0, 2.0)], true);
        assert_eq!(evaluate_assert_tracking(true, &snap), AssertionResult::Passed);
        snap.cursors[1].is_tracking = false;
        assert!(matches!(
            evaluate_assert_tracking(true, &snap),
            AssertionResult::Failed { message, .. } if message.starts_with("cursor 1")
        ));
    }
}
