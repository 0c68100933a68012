//! Desktop window implementation using winit

use cursors_platform::{Point, Window, WindowConfig};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window as WinitWindow, WindowAttributes};

/// Desktop window wrapping a winit window
pub struct DesktopWindow {
    window: Arc<WinitWindow>,
    focused: AtomicBool,
    pointer_x: AtomicU32,
    pointer_y: AtomicU32,
}

impl DesktopWindow {
    /// Create a new desktop window
    pub fn new(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Self, winit::error::OsError> {
        let mut attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_resizable(config.resizable);

        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(winit::window::Fullscreen::Borderless(None)));
        }

        let window = Arc::new(event_loop.create_window(attrs)?);

        // Until the first CursorMoved arrives, report the window center
        let size = window.inner_size();
        let center = Point::new(size.width as f32 / 2.0, size.height as f32 / 2.0);

        Ok(Self {
            window,
            focused: AtomicBool::new(true),
            pointer_x: AtomicU32::new(center.x.to_bits()),
            pointer_y: AtomicU32::new(center.y.to_bits()),
        })
    }

    /// Get the underlying winit window
    pub fn winit_window(&self) -> &WinitWindow {
        &self.window
    }

    /// Get an Arc to the winit window
    pub fn winit_window_arc(&self) -> Arc<WinitWindow> {
        Arc::clone(&self.window)
    }

    /// Set focus state (called by event loop)
    pub(crate) fn set_focused(&self, focused: bool) {
        self.focused.store(focused, Ordering::Relaxed);
    }

    /// Record the pointer position (called by event loop)
    pub(crate) fn set_pointer_position(&self, position: Point) {
        self.pointer_x.store(position.x.to_bits(), Ordering::Relaxed);
        self.pointer_y.store(position.y.to_bits(), Ordering::Relaxed);
    }
}

impl Window for DesktopWindow {
    fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    fn pointer_position(&self) -> Point {
        Point::new(
            f32::from_bits(self.pointer_x.load(Ordering::Relaxed)),
            f32::from_bits(self.pointer_y.load(Ordering::Relaxed)),
        )
    }

    fn set_pointer_visible(&self, visible: bool) {
        self.window.set_cursor_visible(visible);
    }

    fn request_redraw(&self) {
        self.window.request_redraw();
    }

    fn is_focused(&self) -> bool {
        self.focused.load(Ordering::Relaxed)
    }
}
