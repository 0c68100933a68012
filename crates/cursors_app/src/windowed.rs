//! Windowed application runner
//!
//! Opens a window through the desktop platform, drives [`AnimationState`]
//! once per frame event and draws the scene with the GPU renderer.
//!
//! # Example
//!
//! ```ignore
//! use cursors_app::windowed::WindowedApp;
//! use cursors_app::SimulationConfig;
//! use cursors_platform::WindowConfig;
//!
//! fn main() -> cursors_app::Result<()> {
//!     WindowedApp::run(WindowConfig::default(), SimulationConfig::default())
//! }
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use cursors_animation::{FrameClock, Viewport};
use cursors_core::InputEvent;
use cursors_gpu::{FrameStatus, GpuRenderer, RendererConfig, RendererError};
use cursors_platform::{ControlFlow, Event, EventLoop, LifecycleEvent, Window, WindowConfig};
use cursors_platform_desktop::{DesktopEventLoop, DesktopWindow};

use crate::config::SimulationConfig;
use crate::error::{AppError, Result};
use crate::scene::build_draw_list;
use crate::state::{AnimationState, FrameInput};

/// Per-window state created once the window exists
struct Session {
    state: AnimationState,
    renderer: GpuRenderer,
    clock: FrameClock,
}

impl Session {
    fn new(window: &DesktopWindow, config: &SimulationConfig) -> Result<Self> {
        let (width, height) = window.size();
        let state = AnimationState::new(Viewport::new(width as f32, height as f32), config)?;
        let renderer = GpuRenderer::with_surface_blocking(
            window.winit_window_arc(),
            (width, height),
            RendererConfig::default(),
        )
        .map_err(|e| AppError::Renderer(e.to_string()))?;

        Ok(Self {
            state,
            renderer,
            clock: FrameClock::new(Instant::now()),
        })
    }
}

/// Windowed application runner
pub struct WindowedApp;

impl WindowedApp {
    /// Run the animation until the window closes or an exit key is pressed
    pub fn run(window_config: WindowConfig, config: SimulationConfig) -> Result<()> {
        config.validate()?;

        let event_loop = DesktopEventLoop::new(window_config)
            .map_err(|e| AppError::Platform(e.to_string()))?;

        let mut session: Option<Session> = None;
        let mut pending: Vec<InputEvent> = Vec::new();
        // Errors raised inside the handler, returned once the loop ends
        let failure: Rc<RefCell<Option<AppError>>> = Rc::new(RefCell::new(None));
        let handler_failure = Rc::clone(&failure);

        event_loop
            .run(move |event, window: &DesktopWindow| match event {
                Event::Lifecycle(LifecycleEvent::Resumed) => {
                    if session.is_some() {
                        return ControlFlow::Continue;
                    }
                    match Session::new(window, &config) {
                        Ok(created) => {
                            session = Some(created);
                            window.request_redraw();
                            ControlFlow::Continue
                        }
                        Err(e) => {
                            tracing::error!("failed to start animation: {e}");
                            *handler_failure.borrow_mut() = Some(e);
                            ControlFlow::Exit
                        }
                    }
                }

                Event::Lifecycle(LifecycleEvent::Suspended) => {
                    tracing::debug!("suspended");
                    ControlFlow::Continue
                }

                Event::Lifecycle(LifecycleEvent::LowMemory) => {
                    tracing::warn!("low memory warning");
                    ControlFlow::Continue
                }

                Event::Input(input) => {
                    if input.is_exit_request() && session.is_none() {
                        return ControlFlow::Exit;
                    }
                    pending.push(input);
                    ControlFlow::Continue
                }

                Event::Frame => {
                    let Some(session) = session.as_mut() else {
                        return ControlFlow::Continue;
                    };

                    let input = FrameInput {
                        events: std::mem::take(&mut pending),
                        pointer: window.pointer_position(),
                    };
                    let tick = session.clock.begin_frame(Instant::now());
                    tracing::trace!(frame = tick.index, dt = ?tick.dt, "frame");
                    let output = session.state.update(&input, tick.elapsed);
                    if output.control.is_exit() {
                        return ControlFlow::Exit;
                    }
                    if output.activated {
                        window.set_pointer_visible(false);
                    }

                    let (width, height) = window.size();
                    if session.renderer.size() != (width, height) {
                        session.renderer.resize(width, height);
                    }

                    let list = build_draw_list(&session.state);
                    match session.renderer.render(&list) {
                        Ok(FrameStatus::Presented) => {}
                        Ok(FrameStatus::Skipped) => {
                            tracing::trace!(frame = session.state.frames(), "frame skipped");
                        }
                        Err(RendererError::OutOfMemory) => {
                            tracing::error!("Out of GPU memory");
                            *handler_failure.borrow_mut() =
                                Some(AppError::Renderer(RendererError::OutOfMemory.to_string()));
                            return ControlFlow::Exit;
                        }
                        Err(e) => {
                            tracing::warn!("render error: {e}");
                        }
                    }
                    ControlFlow::Continue
                }
            })
            .map_err(|e| AppError::Platform(e.to_string()))?;

        let failure = failure.take();
        failure.map_or(Ok(()), Err)
    }
}

/// Run the animation fullscreen with default settings
pub fn run_windowed(config: SimulationConfig) -> Result<()> {
    WindowedApp::run(WindowConfig::default(), config)
}
