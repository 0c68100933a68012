//! Animation state and the per-frame tick
//!
//! [`AnimationState`] owns everything that changes between frames. A tick
//! drains the frame's input, applies activation, refreshes the synthetic
//! targets and runs the motion update. Drawing is separate (see
//! [`crate::scene`]).

use std::time::Duration;

use crate::config::SimulationConfig;
use crate::error::{AppError, Result};
use crate::mode::{Mode, ModeController};
use cursors_animation::{CursorSet, MotionStats, MotionUpdate, TargetSource, Viewport};
use cursors_core::{InputEvent, Point, Rect};
use cursors_platform::ControlFlow;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Activation button width as a fraction of the display width
pub const BUTTON_WIDTH_RATIO: f32 = 0.25;
/// Activation button height as a fraction of the display height
pub const BUTTON_HEIGHT_RATIO: f32 = 0.08;

/// Input gathered for one frame
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Events since the previous frame, oldest first
    pub events: Vec<InputEvent>,
    /// Real pointer position at frame time
    pub pointer: Point,
}

impl FrameInput {
    pub fn new(pointer: Point) -> Self {
        Self {
            events: Vec::new(),
            pointer,
        }
    }

    pub fn with_event(mut self, event: InputEvent) -> Self {
        self.events.push(event);
        self
    }
}

/// Result of one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameOutput {
    pub control: ControlFlow,
    /// The swarm switched to tracking during this tick
    pub activated: bool,
    pub motion: MotionStats,
}

/// The activation button rectangle, centered on the display
pub fn button_rect(viewport: Viewport) -> Rect {
    let width = (viewport.width * BUTTON_WIDTH_RATIO).trunc();
    let height = (viewport.height * BUTTON_HEIGHT_RATIO).trunc();
    let x = (viewport.width / 2.0).trunc() - (width / 2.0).trunc();
    let y = (viewport.height / 2.0).trunc() - (height / 2.0).trunc();
    Rect::new(x, y, width, height)
}

/// All mutable animation state
#[derive(Debug)]
pub struct AnimationState {
    viewport: Viewport,
    cursors: CursorSet,
    targets: TargetSource,
    mode: ModeController,
    motion: MotionUpdate,
    rng: StdRng,
    button: Rect,
    pointer: Point,
    frames: u64,
}

impl AnimationState {
    /// Build the swarm for a display of `viewport` size
    pub fn new(viewport: Viewport, config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        if !(viewport.width > 0.0 && viewport.height > 0.0) {
            return Err(AppError::Config(format!(
                "display size must be non-zero, got {}x{}",
                viewport.width, viewport.height
            )));
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let cursors = CursorSet::spawn(config.cursor_count, viewport, &config.spawn, &mut rng);
        let targets = TargetSource::spawn(
            config.cursor_count.saturating_sub(1),
            viewport,
            config.targets,
            &mut rng,
        );

        tracing::debug!(
            cursors = cursors.len(),
            synthetic_targets = targets.len(),
            width = viewport.width,
            height = viewport.height,
            seed = ?config.seed,
            "animation state created"
        );

        Ok(Self {
            viewport,
            cursors,
            targets,
            mode: ModeController::new(),
            motion: MotionUpdate::new(config.motion),
            rng,
            button: button_rect(viewport),
            pointer: viewport.center(),
            frames: 0,
        })
    }

    /// Run one tick at time `now` (measured from the start of the run)
    ///
    /// Exit requests end the tick before anything else is updated.
    pub fn update(&mut self, input: &FrameInput, now: Duration) -> FrameOutput {
        if input.events.iter().any(InputEvent::is_exit_request) {
            tracing::info!(frame = self.frames, "exit requested");
            return FrameOutput {
                control: ControlFlow::Exit,
                ..FrameOutput::default()
            };
        }

        self.pointer = input.pointer;
        let mut activated = false;
        for event in &input.events {
            if let InputEvent::ButtonPress { position, .. } = event {
                if !self.mode.is_tracking() && self.button.contains(*position) {
                    activated |= self.activate();
                }
            }
        }

        if self.mode.is_tracking() {
            self.targets.refresh(now, &mut self.rng);
        }

        let motion = self
            .motion
            .step(&mut self.cursors, &self.targets, self.pointer, self.viewport);
        self.frames += 1;

        FrameOutput {
            control: ControlFlow::Continue,
            activated,
            motion,
        }
    }

    /// Switch every cursor to tracking in one step
    ///
    /// Each cursor starts from the current reading of its tracker. Returns
    /// `false` when already tracking.
    pub fn activate(&mut self) -> bool {
        if !self.mode.activate() {
            return false;
        }
        for cursor in self.cursors.iter_mut() {
            let initial = if cursor.is_real_pointer {
                Some(self.pointer)
            } else {
                self.targets.target(cursor.tracker_id)
            };
            cursor.begin_tracking(initial.unwrap_or(cursor.position));
        }
        tracing::debug!(
            frame = self.frames,
            cursors = self.cursors.len(),
            "all cursors tracking"
        );
        true
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn cursors(&self) -> &CursorSet {
        &self.cursors
    }

    pub fn targets(&self) -> &TargetSource {
        &self.targets
    }

    pub fn mode(&self) -> Mode {
        self.mode.mode()
    }

    pub fn mode_controller(&self) -> &ModeController {
        &self.mode
    }

    pub fn is_tracking(&self) -> bool {
        self.mode.is_tracking()
    }

    pub fn button_rect(&self) -> Rect {
        self.button
    }

    /// Whether the last known pointer position is over the activation button
    pub fn is_button_hovered(&self) -> bool {
        self.button.contains(self.pointer)
    }

    /// Inset tracking cursors are clamped to
    pub fn clamp_margin(&self) -> f32 {
        self.motion.margin(self.viewport)
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Ticks run so far, not counting ticks ended by an exit request
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cursors_core::{KeyCode, MouseButton};

    fn state(width: f32, height: f32, count: usize) -> AnimationState {
        let config = SimulationConfig::default()
            .with_cursor_count(count)
            .with_seed(7);
        AnimationState::new(Viewport::new(width, height), &config).unwrap()
    }

    fn click(position: Point) -> InputEvent {
        InputEvent::ButtonPress {
            position,
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_button_rect_is_centered() {
        let rect = button_rect(Viewport::new(1920.0, 1080.0));
        assert_eq!(rect, Rect::new(720.0, 497.0, 480.0, 86.0));
    }

    #[test]
    fn test_rejects_empty_display() {
        let config = SimulationConfig::default().with_seed(1);
        assert!(AnimationState::new(Viewport::new(0.0, 600.0), &config).is_err());
    }

    #[test]
    fn test_exit_requests_short_circuit() {
        let mut state = state(800.0, 600.0, 4);
        let center = state.viewport().center();

        let input = FrameInput::new(center)
            .with_event(click(center))
            .with_event(InputEvent::KeyPress(KeyCode::ESCAPE));
        let output = state.update(&input, Duration::ZERO);

        assert_eq!(output.control, ControlFlow::Exit);
        assert!(!state.is_tracking());
        assert_eq!(state.frames(), 0);

        let quit = FrameInput::new(center).with_event(InputEvent::Quit);
        let output = state.update(&quit, Duration::ZERO);
        assert!(output.control.is_exit());
    }

    #[test]
    fn test_click_outside_button_stays_idle() {
        let mut state = state(800.0, 600.0, 4);
        let output = state.update(
            &FrameInput::new(Point::ZERO).with_event(click(Point::new(5.0, 5.0))),
            Duration::ZERO,
        );
        assert!(!output.activated);
        assert_eq!(state.mode(), Mode::Idle);
    }

    #[test]
    fn test_other_keys_are_ignored() {
        let mut state = state(800.0, 600.0, 2);
        let output = state.update(
            &FrameInput::new(Point::ZERO).with_event(InputEvent::KeyPress(KeyCode::SPACE)),
            Duration::ZERO,
        );
        assert_eq!(output.control, ControlFlow::Continue);
        assert_eq!(state.mode(), Mode::Idle);
    }

    #[test]
    fn test_activation_applies_to_every_cursor_in_one_tick() {
        let mut state = state(1000.0, 800.0, 10);
        let center = state.button_rect().center();
        let before: Vec<Point> = state.cursors().iter().map(|c| c.position).collect();

        let input = FrameInput::new(center).with_event(click(center));
        let output = state.update(&input, Duration::ZERO);

        assert!(output.activated);
        assert!(state.cursors().iter().all(|c| c.is_tracking));
        assert_eq!(output.motion.moved, 10);

        // Positions moved at most one smoothing step toward their targets
        for (cursor, start) in state.cursors().iter().zip(before) {
            let factor = if cursor.is_real_pointer { 0.3 } else { 0.15 };
            let full = start.distance(cursor.target_position);
            assert!(cursor.position.distance(start) <= full * factor + 1e-3);
        }
    }

    #[test]
    fn test_activate_seeds_each_target_from_its_tracker() {
        let mut state = state(1000.0, 800.0, 6);
        let pointer = Point::new(123.0, 456.0);
        state.update(&FrameInput::new(pointer), Duration::ZERO);

        assert!(state.activate());

        let real = state.cursors().get(0).unwrap();
        assert_eq!(real.target_position, state.pointer());
        assert_eq!(real.target_position, pointer);
        for (i, cursor) in state.cursors().iter().enumerate().skip(1) {
            assert_eq!(
                Some(cursor.target_position),
                state.targets().target(i),
                "cursor {i}"
            );
        }
    }

    #[test]
    fn test_high_rotation_speed_keeps_angles_in_range() {
        let mut config = SimulationConfig::default()
            .with_cursor_count(8)
            .with_seed(1);
        config.spawn.max_rotation_speed = 359.0;
        let mut state = AnimationState::new(Viewport::new(800.0, 600.0), &config).unwrap();

        for frame in 0..10u64 {
            state.update(
                &FrameInput::new(Point::ZERO),
                Duration::from_millis(frame * 16),
            );
            for cursor in state.cursors().iter() {
                assert!((0.0..360.0).contains(&cursor.rotation_angle));
            }
        }
    }

    #[test]
    fn test_second_activation_is_noop() {
        let mut state = state(1000.0, 800.0, 3);
        let center = state.button_rect().center();
        let input = FrameInput::new(center).with_event(click(center));
        state.update(&input, Duration::ZERO);
        let output = state.update(
            &FrameInput::new(center).with_event(click(center)),
            Duration::from_millis(16),
        );

        assert!(!output.activated);
        assert!(!state.activate());
        assert_eq!(state.mode_controller().history().len(), 1);
    }

    #[test]
    fn test_hover_follows_pointer() {
        let mut state = state(1000.0, 800.0, 1);
        let center = state.button_rect().center();
        state.update(&FrameInput::new(center), Duration::ZERO);
        assert!(state.is_button_hovered());
        state.update(&FrameInput::new(Point::ZERO), Duration::ZERO);
        assert!(!state.is_button_hovered());
    }
}
