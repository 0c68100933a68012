//! Scenario runner that drives the animation without a window.

use crate::config::SimulationConfig;
use crate::headless_assert::{
    evaluate_assert_cursor_near, evaluate_assert_in_bounds, evaluate_assert_mode,
    evaluate_assert_tracking, AssertionResult, SwarmSnapshot,
};
use crate::headless_report::{HeadlessReport, RunSummary};
use crate::headless_runtime::{HeadlessRunConfig, HeadlessRuntime};
use crate::headless_scenario::{HeadlessScenario, ScenarioStep};
use anyhow::{bail, Result};
use cursors_core::{InputEvent, KeyCode, MouseButton, Point};

/// Temporal context passed into probes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbeContext {
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
    pub step_index: usize,
}

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: HeadlessReport },
    Failed { report: HeadlessReport },
}

impl RunOutcome {
    pub fn report(&self) -> &HeadlessReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Execute scenario JSON without observing intermediate frames.
pub fn run_scenario(
    input: &str,
    runtime_cfg: HeadlessRunConfig,
    sim: &SimulationConfig,
) -> Result<RunOutcome> {
    run_scenario_with_probe(input, runtime_cfg, sim, |_, _| {})
}

/// Execute scenario JSON, sampling the swarm every
/// `probe_every_frames` frames.
pub fn run_scenario_with_probe<F>(
    input: &str,
    runtime_cfg: HeadlessRunConfig,
    sim: &SimulationConfig,
    mut probe: F,
) -> Result<RunOutcome>
where
    F: FnMut(&ProbeContext, &SwarmSnapshot),
{
    let scenario = HeadlessScenario::from_json(input)?;
    run_loaded_scenario_with_probe(&scenario, runtime_cfg, sim, &mut probe)
}

/// Execute a pre-loaded scenario with a probe.
pub fn run_loaded_scenario_with_probe<F>(
    scenario: &HeadlessScenario,
    runtime_cfg: HeadlessRunConfig,
    sim: &SimulationConfig,
    probe: &mut F,
) -> Result<RunOutcome>
where
    F: FnMut(&ProbeContext, &SwarmSnapshot),
{
    let mut run = ScenarioRun {
        runtime: HeadlessRuntime::new(runtime_cfg, sim)?,
        cfg: runtime_cfg,
        activated_at_frame: None,
    };

    for (step_index, step) in scenario.steps.iter().enumerate() {
        let result = match step {
            ScenarioStep::Wait { ms } => {
                let frames = wait_frames(*ms, runtime_cfg.tick_ms);
                let mut remaining_ms = *ms;
                run.frames(frames, step_index, probe, || {
                    let step_ms = remaining_ms.min(runtime_cfg.tick_ms);
                    remaining_ms = remaining_ms.saturating_sub(step_ms);
                    step_ms
                });
                AssertionResult::Passed
            }
            ScenarioStep::Tick { frames } => {
                run.frames(*frames, step_index, probe, || runtime_cfg.tick_ms);
                AssertionResult::Passed
            }
            ScenarioStep::Pointer { x, y } => {
                run.runtime.set_pointer(Point::new(*x, *y));
                AssertionResult::Passed
            }
            ScenarioStep::Click { x, y } => {
                let position = Point::new(*x, *y);
                run.runtime.set_pointer(position);
                run.runtime.push_event(InputEvent::ButtonPress {
                    position,
                    button: MouseButton::Left,
                });
                AssertionResult::Passed
            }
            ScenarioStep::Key { key } => {
                let Some(code) = KeyCode::from_name(key) else {
                    bail!("step {step_index}: unknown key {key:?}");
                };
                run.runtime.push_event(InputEvent::KeyPress(code));
                AssertionResult::Passed
            }
            ScenarioStep::Quit => {
                run.runtime.push_event(InputEvent::Quit);
                AssertionResult::Passed
            }
            ScenarioStep::AssertMode { mode } => evaluate_assert_mode(*mode, &run.snapshot()),
            ScenarioStep::AssertCursorNear {
                index,
                x,
                y,
                tolerance,
            } => evaluate_assert_cursor_near(
                *index,
                Point::new(*x, *y),
                *tolerance,
                &run.snapshot(),
            ),
            ScenarioStep::AssertInBounds => evaluate_assert_in_bounds(&run.snapshot()),
            ScenarioStep::AssertTracking { value } => {
                evaluate_assert_tracking(*value, &run.snapshot())
            }
        };

        if let AssertionResult::Failed { message, .. } = result {
            tracing::debug!(step_index, step = step.name(), %message, "scenario step failed");
            let report = HeadlessReport::failed(step.name(), step_index, message, run.summary());
            return Ok(RunOutcome::Failed { report });
        }
    }

    Ok(RunOutcome::Passed {
        report: HeadlessReport::passed(run.summary()),
    })
}

struct ScenarioRun {
    runtime: HeadlessRuntime,
    cfg: HeadlessRunConfig,
    activated_at_frame: Option<u64>,
}

impl ScenarioRun {
    fn snapshot(&self) -> SwarmSnapshot {
        SwarmSnapshot::capture(self.runtime.state())
    }

    fn summary(&self) -> RunSummary {
        RunSummary {
            mode: self.runtime.state().mode(),
            activated_at_frame: self.activated_at_frame,
            exited: self.runtime.is_exited(),
            elapsed_frames: self.runtime.elapsed_frames(),
            elapsed_ms: self.runtime.elapsed_ms(),
        }
    }

    /// Run up to `frames` frames; stops early once the run has exited.
    fn frames<F, A>(&mut self, frames: u32, step_index: usize, probe: &mut F, mut advance_ms: A)
    where
        F: FnMut(&ProbeContext, &SwarmSnapshot),
        A: FnMut() -> u64,
    {
        let probe_every = self.cfg.probe_every_frames.max(1);
        for sampled in 1..=frames {
            let Some(output) = self.runtime.tick(advance_ms()) else {
                break;
            };
            if output.activated {
                self.activated_at_frame = Some(self.runtime.elapsed_frames());
            }
            if sampled % probe_every == 0 || sampled == frames {
                let ctx = ProbeContext {
                    elapsed_frames: self.runtime.elapsed_frames(),
                    elapsed_ms: self.runtime.elapsed_ms(),
                    step_index,
                };
                probe(&ctx, &self.snapshot());
            }
        }
    }
}

fn wait_frames(wait_ms: u64, tick_ms: u64) -> u32 {
    if wait_ms == 0 {
        return 0;
    }
    let tick = tick_ms.max(1);
    let frames = wait_ms.saturating_add(tick.saturating_sub(1)) / tick;
    frames.min(u32::MAX as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Mode;

    fn cfg() -> HeadlessRunConfig {
        HeadlessRunConfig {
            width: 1000,
            height: 1000,
            ..HeadlessRunConfig::default()
        }
    }

    #[test]
    fn wait_rounds_up_to_whole_frames() {
        assert_eq!(wait_frames(0, 16), 0);
        assert_eq!(wait_frames(16, 16), 1);
        assert_eq!(wait_frames(17, 16), 2);
    }

    #[test]
    fn probe_samples_on_cadence_and_last_frame() {
        let mut seen = Vec::new();
        let outcome = run_scenario_with_probe(
            r#"{"steps": [{"type": "tick", "frames": 10}]}"#,
            cfg(),
            &SimulationConfig::default(),
            |ctx, _| seen.push(ctx.elapsed_frames),
        )
        .unwrap();

        assert!(!outcome.is_failed());
        assert_eq!(seen, vec![4, 8, 10]);
    }

    #[test]
    fn click_activates_on_next_frame() {
        let outcome = run_scenario(
            r#"{"steps": [
                {"type": "tick", "frames": 2},
                {"type": "click", "x": 500, "y": 500},
                {"type": "assert_mode", "mode": "idle"},
                {"type": "tick", "frames": 1},
                {"type": "assert_mode", "mode": "tracking"},
                {"type": "assert_tracking", "value": true}
            ]}"#,
            cfg(),
            &SimulationConfig::default(),
        )
        .unwrap();

        let report = outcome.report();
        assert!(!outcome.is_failed(), "{report:?}");
        assert_eq!(report.mode, Mode::Tracking);
        assert_eq!(report.activated_at_frame, Some(3));
    }

    #[test]
    fn failed_assertion_reports_step() {
        let outcome = run_scenario(
            r#"{"steps": [
                {"type": "tick", "frames": 1},
                {"type": "assert_mode", "mode": "tracking"}
            ]}"#,
            cfg(),
            &SimulationConfig::default(),
        )
        .unwrap();

        assert!(outcome.is_failed());
        let report = outcome.report();
        assert_eq!(report.failed_step_index, Some(1));
        assert_eq!(report.assertion.as_deref(), Some("assert_mode"));
    }

    #[test]
    fn escape_ends_the_run() {
        let outcome = run_scenario(
            r#"{"steps": [
                {"type": "key", "key": "escape"},
                {"type": "tick", "frames": 5}
            ]}"#,
            cfg(),
            &SimulationConfig::default(),
        )
        .unwrap();

        let report = outcome.report();
        assert!(report.exited);
        assert_eq!(report.elapsed_frames, 1);
    }

    #[test]
    fn unknown_key_is_an_error() {
        let result = run_scenario(
            r#"{"steps": [{"type": "key", "key": "no-such-key"}]}"#,
            cfg(),
            &SimulationConfig::default(),
        );
        assert!(result.is_err());
    }
}
