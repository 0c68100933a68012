//! Cursors Animation System
//!
//! Everything that moves between two frames.
//!
//! # Features
//!
//! - **Target Source**: synthetic targets wandering with random velocities
//! - **Cursor Set**: kinematic and visual state of every sprite
//! - **Idle Layout**: evenly spaced ring arrangement
//! - **Motion Update**: offset targets, exponential smoothing, rotation, clamping
//! - **Frame Clock**: fixed-rate frame pacing

pub mod cursor;
pub mod layout;
pub mod motion;
pub mod scheduler;
pub mod smoothing;
pub mod targets;

pub use cursor::{Cursor, CursorSet, SpawnConfig};
pub use layout::{ring_positions, Viewport};
pub use motion::{MotionConfig, MotionStats, MotionUpdate};
pub use scheduler::{FrameClock, FrameTick};
pub use smoothing::{wrap_degrees, Smoothing};
pub use targets::{SyntheticTarget, TargetConfig, TargetSource};
