//! Report output model for headless runs.

use crate::mode::Mode;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Component, Path};

/// Report status for a headless run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// Machine-readable result of a headless run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessReport {
    pub status: ReportStatus,
    pub failed_step_index: Option<usize>,
    pub assertion: Option<String>,
    pub message: Option<String>,
    /// Mode at the end of the run
    pub mode: Mode,
    /// Frame on which tracking started, if it did
    pub activated_at_frame: Option<u64>,
    pub exited: bool,
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
}

/// Run-level facts shared by passing and failing reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub mode: Mode,
    pub activated_at_frame: Option<u64>,
    pub exited: bool,
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
}

impl HeadlessReport {
    pub fn passed(summary: RunSummary) -> Self {
        Self {
            status: ReportStatus::Passed,
            failed_step_index: None,
            assertion: None,
            message: None,
            mode: summary.mode,
            activated_at_frame: summary.activated_at_frame,
            exited: summary.exited,
            elapsed_frames: summary.elapsed_frames,
            elapsed_ms: summary.elapsed_ms,
        }
    }

    pub fn failed(
        assertion: &str,
        failed_step_index: usize,
        message: String,
        summary: RunSummary,
    ) -> Self {
        Self {
            status: ReportStatus::Failed,
            failed_step_index: Some(failed_step_index),
            assertion: Some(assertion.to_string()),
            message: Some(message),
            ..Self::passed(summary)
        }
    }

    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        if path.is_absolute() || path.has_root() {
            bail!("report path must be relative and must not start with a separator");
        }
        if path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            bail!("report path cannot contain '..' or drive prefixes");
        }
        let payload = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, payload)?;
        Ok(())
    }

    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        let payload = serde_json::to_string_pretty(self)?;
        writer.write_all(payload.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
