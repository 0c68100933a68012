//! Cursors Platform Abstraction
//!
//! The narrow surface the animation needs from a windowing backend:
//!
//! - A [`Window`] that reports its size and the pointer position, and can
//!   hide the pointer or request a redraw
//! - An [`EventLoop`] that feeds [`Event`]s to a handler and honors the
//!   [`ControlFlow`] it returns
//!
//! Backends live in separate crates (see `cursors_platform_desktop`).

pub mod error;

pub use cursors_core::{InputEvent, KeyCode, MouseButton, Point};
pub use error::{PlatformError, Result};

/// Configuration for creating a window
#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    /// Logical width, ignored when fullscreen
    pub width: u32,
    /// Logical height, ignored when fullscreen
    pub height: u32,
    pub fullscreen: bool,
    pub resizable: bool,
    /// Frame rate cap for redraw requests
    pub target_fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Cursors".to_string(),
            width: 1280,
            height: 720,
            fullscreen: true,
            resizable: false,
            target_fps: 60,
        }
    }
}

impl WindowConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Use a fixed-size window instead of fullscreen
    pub fn windowed(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self.fullscreen = false;
        self
    }

    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }
}

/// Application lifecycle notifications
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The window exists and rendering may start
    Resumed,
    /// Rendering should pause
    Suspended,
    LowMemory,
}

/// Events delivered to the application handler
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// User input. The handler is expected to buffer these until the next frame.
    Input(InputEvent),
    /// Time to update and draw one frame
    Frame,
    Lifecycle(LifecycleEvent),
}

/// What the event loop should do after the handler returns
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControlFlow {
    #[default]
    Continue,
    Exit,
}

impl ControlFlow {
    pub fn is_exit(self) -> bool {
        self == ControlFlow::Exit
    }
}

/// A native window
pub trait Window {
    /// Physical size in pixels
    fn size(&self) -> (u32, u32);

    fn scale_factor(&self) -> f64;

    /// Last known pointer position in physical pixels
    fn pointer_position(&self) -> Point;

    /// Show or hide the OS pointer while it is over the window
    fn set_pointer_visible(&self, visible: bool);

    fn request_redraw(&self);

    fn is_focused(&self) -> bool;
}

/// A platform event loop
pub trait EventLoop {
    type Window: Window;

    /// Run until the handler returns [`ControlFlow::Exit`] or the platform
    /// shuts the loop down
    fn run<F>(self, handler: F) -> Result<()>
    where
        F: FnMut(Event, &Self::Window) -> ControlFlow + 'static;
}
