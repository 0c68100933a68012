//! Headless runtime: drives [`AnimationState`] on a virtual clock.

use crate::config::SimulationConfig;
use crate::state::{AnimationState, FrameInput, FrameOutput};
use anyhow::{bail, Result};
use cursors_animation::Viewport;
use cursors_core::{InputEvent, Point};
use std::time::Duration;

/// Configuration for deterministic headless frame execution.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessRunConfig {
    /// Virtual display width.
    pub width: u32,
    /// Virtual display height.
    pub height: u32,
    /// Number of frames to execute when no scenario is given.
    pub max_frames: u32,
    /// Virtual milliseconds between frames.
    pub tick_ms: u64,
    /// Probe sampling interval in frames (1 = every frame, 4 = every 4 frames).
    pub probe_every_frames: u32,
}

impl Default for HeadlessRunConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            max_frames: 1,
            tick_ms: 16,
            probe_every_frames: 4,
        }
    }
}

impl HeadlessRunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("headless dimensions must be non-zero");
        }
        if self.max_frames == 0 {
            bail!("headless max_frames must be > 0");
        }
        if self.tick_ms == 0 {
            bail!("headless tick_ms must be > 0");
        }
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width as f32, self.height as f32)
    }
}

/// Frame context passed to headless frame callbacks.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessContext {
    pub frame_index: u64,
    pub elapsed_ms: u64,
    pub output: FrameOutput,
}

/// Animation state plus the virtual pointer, event queue and clock.
///
/// A run without a seed is seeded with `0` so headless runs reproduce.
#[derive(Debug)]
pub struct HeadlessRuntime {
    state: AnimationState,
    pending: Vec<InputEvent>,
    pointer: Point,
    elapsed_ms: u64,
    frames: u64,
    exited: bool,
}

impl HeadlessRuntime {
    pub fn new(cfg: HeadlessRunConfig, sim: &SimulationConfig) -> Result<Self> {
        cfg.validate()?;
        let mut sim = sim.clone();
        sim.seed = Some(sim.seed.unwrap_or(0));
        let viewport = cfg.viewport();
        let state = AnimationState::new(viewport, &sim)?;
        Ok(Self {
            state,
            pending: Vec::new(),
            pointer: viewport.center(),
            elapsed_ms: 0,
            frames: 0,
            exited: false,
        })
    }

    /// Queue an event for the next frame
    pub fn push_event(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    pub fn set_pointer(&mut self, position: Point) {
        self.pointer = position;
    }

    /// Advance the clock by `advance_ms` and run one frame
    ///
    /// Returns `None` once an exit request has been processed.
    pub fn tick(&mut self, advance_ms: u64) -> Option<FrameOutput> {
        if self.exited {
            return None;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(advance_ms);
        self.frames += 1;

        let input = FrameInput {
            events: std::mem::take(&mut self.pending),
            pointer: self.pointer,
        };
        let output = self
            .state
            .update(&input, Duration::from_millis(self.elapsed_ms));
        if output.control.is_exit() {
            self.exited = true;
        }
        Some(output)
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn is_exited(&self) -> bool {
        self.exited
    }

    pub fn elapsed_frames(&self) -> u64 {
        self.frames
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Run `cfg.max_frames` frames with no input, or until exit.
    pub fn run<F>(cfg: HeadlessRunConfig, sim: &SimulationConfig, mut on_frame: F) -> Result<Self>
    where
        F: FnMut(&HeadlessContext, &AnimationState),
    {
        let mut runtime = Self::new(cfg, sim)?;
        for _ in 0..cfg.max_frames {
            let Some(output) = runtime.tick(cfg.tick_ms) else {
                break;
            };
            on_frame(
                &HeadlessContext {
                    frame_index: runtime.frames - 1,
                    elapsed_ms: runtime.elapsed_ms,
                    output,
                },
                &runtime.state,
            );
        }
        Ok(runtime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_frames: u32) -> HeadlessRunConfig {
        HeadlessRunConfig {
            width: 800,
            height: 600,
            max_frames,
            ..HeadlessRunConfig::default()
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let sim = SimulationConfig::default();
        let mut cfg = config(1);
        cfg.tick_ms = 0;
        assert!(HeadlessRuntime::new(cfg, &sim).is_err());
        assert!(HeadlessRuntime::new(config(0), &sim).is_err());
    }

    #[test]
    fn run_advances_virtual_clock() {
        let mut seen = Vec::new();
        let runtime = HeadlessRuntime::run(config(3), &SimulationConfig::default(), |ctx, _| {
            seen.push((ctx.frame_index, ctx.elapsed_ms));
        })
        .unwrap();

        assert_eq!(seen, vec![(0, 16), (1, 32), (2, 48)]);
        assert_eq!(runtime.elapsed_frames(), 3);
    }

    #[test]
    fn quit_stops_further_ticks() {
        let mut runtime = HeadlessRuntime::new(config(1), &SimulationConfig::default()).unwrap();
        runtime.push_event(InputEvent::Quit);
        let output = runtime.tick(16).unwrap();
        assert!(output.control.is_exit());
        assert!(runtime.is_exited());
        assert!(runtime.tick(16).is_none());
        assert_eq!(runtime.elapsed_frames(), 1);
    }

    #[test]
    fn unseeded_runs_are_reproducible() {
        let sim = SimulationConfig::default();
        let a = HeadlessRuntime::new(config(1), &sim).unwrap();
        let b = HeadlessRuntime::new(config(1), &sim).unwrap();
        let colors = |r: &HeadlessRuntime| {
            r.state().cursors().iter().map(|c| c.color).collect::<Vec<_>>()
        };
        assert_eq!(colors(&a), colors(&b));
    }
}
