//! Per-file outcomes and the summary both pipeline stages return.
//!
//! Individual file failures never abort a batch; they are recorded here so
//! callers can tell a complete run from a partial one.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CommonResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Local file already on disk; no transfer attempted.
    AlreadyPresent,
    /// Input holds none of the mapped variables.
    NoMatchingVariables,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Completed {
        path: PathBuf,
    },
    Skipped {
        /// Usable file left by the step, if any
        path: Option<PathBuf>,
        reason: SkipReason,
    },
    Failed {
        reason: String,
    },
}

impl FileOutcome {
    pub fn failed(reason: impl ToString) -> Self {
        Self::Failed {
            reason: reason.to_string(),
        }
    }

    /// Path of the file this step left for the next stage.
    pub fn usable_path(&self) -> Option<&Path> {
        match self {
            Self::Completed { path } => Some(path),
            Self::Skipped { path, .. } => path.as_deref(),
            Self::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub name: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Ordered record of every file a stage handled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub reports: Vec<FileReport>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, outcome: FileOutcome) {
        self.reports.push(FileReport {
            name: name.into(),
            outcome,
        });
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn completed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Completed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(FileOutcome::is_failed)
    }

    /// True when no file failed. Skips count as success.
    pub fn is_complete(&self) -> bool {
        self.failed() == 0
    }

    /// Files available to the next stage, in processing order.
    pub fn usable_paths(&self) -> Vec<PathBuf> {
        self.reports
            .iter()
            .filter_map(|r| r.outcome.usable_path().map(Path::to_path_buf))
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.reports.iter().filter(|r| r.outcome.is_failed())
    }

    /// Write the summary as pretty JSON.
    pub fn write_json(&self, path: &Path) -> CommonResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }
}
