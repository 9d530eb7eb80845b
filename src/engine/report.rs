//! Per-invocation build results and error passthrough.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::logger;

/// How failures leave an invoker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMode {
    /// Single-shot builds: any failed file fails the task.
    Propagate,
    /// Watch mode: log the failure and keep the session alive.
    Continue,
}

/// What one invocation did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Written destination files.
    pub built: Vec<PathBuf>,
    /// Sources skipped as up to date.
    pub skipped: usize,
    /// Sources that failed, with the engine's message.
    pub failed: Vec<(PathBuf, String)>,
}

impl BuildReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_built(&mut self, output: impl Into<PathBuf>) {
        self.built.push(output.into());
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn record_failed(&mut self, input: &Path, error: &anyhow::Error) {
        self.failed.push((input.to_path_buf(), format!("{error:#}")));
    }

    pub fn merge(&mut self, other: Self) {
        self.built.extend(other.built);
        self.skipped += other.skipped;
        self.failed.extend(other.failed);
    }

    pub fn is_empty(&self) -> bool {
        self.built.is_empty() && self.skipped == 0 && self.failed.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Every written file is a stylesheet.
    pub fn only_styles(&self) -> bool {
        !self.built.is_empty()
            && self
                .built
                .iter()
                .all(|p| p.extension().is_some_and(|e| e == "css"))
    }

    /// One-line summary: `3 built, 2 up to date, 1 failed`.
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} built", self.built.len())];
        if self.skipped > 0 {
            parts.push(format!("{} up to date", self.skipped));
        }
        if !self.failed.is_empty() {
            parts.push(format!("{} failed", self.failed.len()));
        }
        parts.join(", ")
    }

    fn failure_detail(&self) -> String {
        self.failed
            .iter()
            .map(|(path, message)| format!("{}: {message}", path.display()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Apply the error mode to this report.
    ///
    /// `Propagate` turns failures into an error. `Continue` prints them on
    /// the watch status line and hands the report back.
    pub fn finish(self, label: &str, mode: ErrorMode) -> Result<Self> {
        if self.failed.is_empty() {
            return Ok(self);
        }
        match mode {
            ErrorMode::Propagate => bail!("{label}: {}\n{}", self.summary(), self.failure_detail()),
            ErrorMode::Continue => {
                logger::status_detach();
                logger::status_error(&format!("{label}: {}", self.summary()), &self.failure_detail());
                Ok(self)
            }
        }
    }
}
