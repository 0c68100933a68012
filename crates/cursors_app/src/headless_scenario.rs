//! Scenario definition for headless runs.

use crate::mode::Mode;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Sequence of headless steps.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadlessScenario {
    pub steps: Vec<ScenarioStep>,
}

impl HeadlessScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&raw)
    }
}

fn default_tolerance() -> f32 {
    1.0
}

/// One scenario step.
///
/// Input steps (`click`, `key`, `quit`) are queued and take effect on the
/// next frame. Pointer moves are sampled at frame time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    Wait { ms: u64 },
    Tick { frames: u32 },
    Pointer { x: f32, y: f32 },
    Click { x: f32, y: f32 },
    Key { key: String },
    Quit,
    AssertMode { mode: Mode },
    AssertCursorNear {
        index: usize,
        x: f32,
        y: f32,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
    AssertInBounds,
    AssertTracking { value: bool },
}

impl ScenarioStep {
    pub fn is_assertion(&self) -> bool {
        matches!(
            self,
            ScenarioStep::AssertMode { .. }
                | ScenarioStep::AssertCursorNear { .. }
                | ScenarioStep::AssertInBounds
                | ScenarioStep::AssertTracking { .. }
        )
    }

    /// Name reported when this step fails
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioStep::Wait { .. } => "wait",
            ScenarioStep::Tick { .. } => "tick",
            ScenarioStep::Pointer { .. } => "pointer",
            ScenarioStep::Click { .. } => "click",
            ScenarioStep::Key { .. } => "key",
            ScenarioStep::Quit => "quit",
            ScenarioStep::AssertMode { .. } => "assert_mode",
            ScenarioStep::AssertCursorNear { .. } => "assert_cursor_near",
            ScenarioStep::AssertInBounds => "assert_in_bounds",
            ScenarioStep::AssertTracking { .. } => "assert_tracking",
        }
    }
}
