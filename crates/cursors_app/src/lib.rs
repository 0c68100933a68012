//! Cursors Application
//!
//! Ties the animation, the mode switch and the scene together.
//!
//! - [`AnimationState`] owns the swarm and runs one tick per frame
//! - [`scene::build_draw_list`] turns the state into draw commands
//! - [`windowed::WindowedApp`] runs it in a native window
//! - the `headless_*` modules run it on a virtual clock from JSON scenarios
//!
//! # Example
//!
//! ```ignore
//! use cursors_app::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = SimulationConfig::default().with_cursor_count(20);
//!     WindowedApp::run(WindowConfig::default(), config)
//! }
//! ```

pub mod config;
mod error;
pub mod headless_assert;
pub mod headless_report;
pub mod headless_runner;
pub mod headless_runtime;
pub mod headless_scenario;
pub mod mode;
pub mod scene;
pub mod state;

#[cfg(all(feature = "windowed", not(any(target_os = "android", target_os = "ios"))))]
pub mod windowed;

pub use config::SimulationConfig;
pub use error::{AppError, Result};
pub use mode::{Mode, ModeController};
pub use state::{button_rect, AnimationState, FrameInput, FrameOutput};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::config::SimulationConfig;
    pub use crate::error::{AppError, Result};
    pub use crate::mode::Mode;
    pub use crate::scene::build_draw_list;
    pub use crate::state::{AnimationState, FrameInput, FrameOutput};

    #[cfg(all(feature = "windowed", not(any(target_os = "android", target_os = "ios"))))]
    pub use crate::windowed::WindowedApp;

    pub use cursors_animation::Viewport;
    pub use cursors_core::{Color, InputEvent, Point, Rect};
    pub use cursors_platform::WindowConfig;
}
