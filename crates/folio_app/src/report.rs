//! Report output model for headless page runs.

use crate::page::PageSnapshot;
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Component, Path};

/// Report status for a scenario run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// Machine-readable result of a scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub status: ReportStatus,
    pub failed_step_index: Option<usize>,
    pub assertion: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
    /// Page state when the run stopped
    pub page: PageSnapshot,
}

impl ScenarioReport {
    pub fn passed(elapsed_frames: u64, elapsed_ms: u64, page: PageSnapshot) -> Self {
        Self {
            status: ReportStatus::Passed,
            failed_step_index: None,
            assertion: None,
            code: None,
            message: None,
            elapsed_frames,
            elapsed_ms,
            page,
        }
    }

    pub fn failed(
        assertion: &str,
        failed_step_index: usize,
        code: String,
        message: String,
        elapsed_frames: u64,
        elapsed_ms: u64,
        page: PageSnapshot,
    ) -> Self {
        Self {
            status: ReportStatus::Failed,
            failed_step_index: Some(failed_step_index),
            assertion: Some(assertion.to_string()),
            code: Some(code),
            message: Some(message),
            elapsed_frames,
            elapsed_ms,
            page,
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == ReportStatus::Passed
    }

    /// Write pretty JSON to `path`, creating parent directories
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        check_report_path(path)?;
        let payload = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(path, payload)
            .with_context(|| format!("failed to write report {}", path.display()))
    }

    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        let payload = serde_json::to_string_pretty(self)?;
        writer.write_all(payload.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Reports stay inside the working directory: relative, no `..`, no drive prefix
fn check_report_path(path: &Path) -> Result<()> {
    let escapes = path.is_absolute()
        || path.has_root()
        || path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
    if escapes {
        bail!(
            "report path {} must stay inside the working directory",
            path.display()
        );
    }
    Ok(())
}
