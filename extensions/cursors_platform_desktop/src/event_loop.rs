//! Desktop event loop implementation using winit

use std::time::{Duration, Instant};

use crate::input;
use crate::window::DesktopWindow;
use cursors_platform::{
    ControlFlow, Event, EventLoop, InputEvent, LifecycleEvent, PlatformError, Point, Window,
    WindowConfig,
};
use winit::application::ApplicationHandler;
use winit::event::{StartCause, WindowEvent as WinitWindowEvent};
use winit::event_loop::{
    ActiveEventLoop, ControlFlow as WinitControlFlow, EventLoop as WinitEventLoop,
};
use winit::window::WindowId;

fn frame_interval(target_fps: u32) -> Duration {
    Duration::from_secs(1) / target_fps.max(1)
}

fn next_frame_deadline(last_frame: Option<Instant>, interval: Duration) -> Option<Instant> {
    last_frame.map(|last| last + interval)
}

fn should_request_frame(last_frame: Option<Instant>, interval: Duration, now: Instant) -> bool {
    next_frame_deadline(last_frame, interval).map_or(true, |deadline| now >= deadline)
}

/// Desktop event loop wrapping winit's event loop
pub struct DesktopEventLoop {
    event_loop: WinitEventLoop<()>,
    window_config: WindowConfig,
}

impl DesktopEventLoop {
    /// Create a new desktop event loop
    pub fn new(config: WindowConfig) -> Result<Self, PlatformError> {
        // NOTE(macos): Regular activation policy so non-bundled binaries get a
        // normal, focusable app window.
        let event_loop = {
            let mut builder = WinitEventLoop::builder();

            #[cfg(target_os = "macos")]
            {
                use winit::platform::macos::{ActivationPolicy, EventLoopBuilderExtMacOS};
                builder.with_activation_policy(ActivationPolicy::Regular);
            }

            builder
                .build()
                .map_err(|e| PlatformError::EventLoop(e.to_string()))?
        };

        Ok(Self {
            event_loop,
            window_config: config,
        })
    }
}

impl EventLoop for DesktopEventLoop {
    type Window = DesktopWindow;

    fn run<F>(self, handler: F) -> Result<(), PlatformError>
    where
        F: FnMut(Event, &Self::Window) -> ControlFlow + 'static,
    {
        let mut app = DesktopApp::new(self.window_config, handler);
        self.event_loop
            .run_app(&mut app)
            .map_err(|e| PlatformError::EventLoop(e.to_string()))
    }
}

/// Internal winit application handler
struct DesktopApp<F>
where
    F: FnMut(Event, &DesktopWindow) -> ControlFlow,
{
    window_config: WindowConfig,
    window: Option<DesktopWindow>,
    handler: F,
    frame_interval: Duration,
    last_frame: Option<Instant>,
    should_exit: bool,
}

impl<F> DesktopApp<F>
where
    F: FnMut(Event, &DesktopWindow) -> ControlFlow,
{
    fn new(window_config: WindowConfig, handler: F) -> Self {
        Self {
            frame_interval: frame_interval(window_config.target_fps),
            window_config,
            window: None,
            handler,
            last_frame: None,
            should_exit: false,
        }
    }

    fn handle_event(&mut self, event: Event) {
        if let Some(ref window) = self.window {
            let flow = (self.handler)(event, window);
            if flow.is_exit() {
                self.should_exit = true;
            }
        }
    }
}

impl<F> ApplicationHandler for DesktopApp<F>
where
    F: FnMut(Event, &DesktopWindow) -> ControlFlow,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            match DesktopWindow::new(event_loop, &self.window_config) {
                Ok(window) => {
                    tracing::info!(
                        size = ?window.size(),
                        scale_factor = window.scale_factor(),
                        "window created"
                    );
                    self.window = Some(window);
                    self.handle_event(Event::Lifecycle(LifecycleEvent::Resumed));
                }
                Err(e) => {
                    tracing::error!("Failed to create window: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.handle_event(Event::Lifecycle(LifecycleEvent::Suspended));
    }

    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        // Frame deadline reached
        if matches!(cause, StartCause::ResumeTimeReached { .. } | StartCause::Poll) {
            if let Some(ref window) = self.window {
                window.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WinitWindowEvent,
    ) {
        match event {
            WinitWindowEvent::CloseRequested => {
                self.handle_event(Event::Input(InputEvent::Quit));
                // Closing the window always ends the loop
                self.should_exit = true;
            }

            WinitWindowEvent::Focused(focused) => {
                if let Some(ref window) = self.window {
                    window.set_focused(focused);
                }
            }

            WinitWindowEvent::RedrawRequested => {
                self.last_frame = Some(Instant::now());
                self.handle_event(Event::Frame);
            }

            WinitWindowEvent::KeyboardInput { event, .. } if !event.repeat => {
                if let Some(input_event) = input::keyboard_event(&event.logical_key, event.state)
                {
                    self.handle_event(Event::Input(input_event));
                }
            }

            WinitWindowEvent::CursorMoved { position, .. } => {
                if let Some(ref window) = self.window {
                    window.set_pointer_position(Point::new(position.x as f32, position.y as f32));
                }
            }

            WinitWindowEvent::MouseInput { state, button, .. } => {
                let position = self
                    .window
                    .as_ref()
                    .map_or(Point::ZERO, |window| window.pointer_position());
                if let Some(input_event) = input::mouse_event(button, state, position) {
                    self.handle_event(Event::Input(input_event));
                }
            }

            _ => {}
        }

        if self.should_exit {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(ref window) = self.window else {
            return;
        };

        if should_request_frame(self.last_frame, self.frame_interval, Instant::now()) {
            window.request_redraw();
            event_loop.set_control_flow(WinitControlFlow::Wait);
        } else if let Some(deadline) = next_frame_deadline(self.last_frame, self.frame_interval) {
            event_loop.set_control_flow(WinitControlFlow::WaitUntil(deadline));
        }
    }

    fn memory_warning(&mut self, _event_loop: &ActiveEventLoop) {
        self.handle_event(Event::Lifecycle(LifecycleEvent::LowMemory));
    }
}
