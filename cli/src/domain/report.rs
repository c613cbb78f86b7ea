//! Result types returned by the install, list and remove use-cases.
//!
//! Batch operations return one [`ItemOutcome`] per processed item, in
//! processing order, so every input ends up with exactly one success or
//! failure. Errors raised after mutations already happened (validation,
//! reload) are attached as `batch_errors` and never replace the outcomes.

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::error::QuadletError;

/// Status reported for quadlets whose service is unknown to systemd.
pub const NOT_LOADED: &str = "Not loaded";

// ── Service manager view ─────────────────────────────────────────────────────

/// Load/active/sub state of one unit as reported by the service manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitStatus {
    pub name: String,
    pub load_state: String,
    pub active_state: String,
    pub sub_state: String,
}

impl UnitStatus {
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.load_state == "loaded"
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active_state == "active"
    }

    /// `ActiveState/SubState` for loaded units, [`NOT_LOADED`] otherwise.
    #[must_use]
    pub fn display_status(&self) -> String {
        if self.is_loaded() {
            format!("{}/{}", self.active_state, self.sub_state)
        } else {
            NOT_LOADED.to_string()
        }
    }
}

/// Completion result of a stop job, following systemd's job result names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobResult {
    Done,
    /// The unit was already inactive.
    Skipped,
    Canceled,
    Timeout,
    Failed(String),
}

impl JobResult {
    /// Parse a systemd job result string.
    #[must_use]
    pub fn parse(result: &str) -> Self {
        match result {
            "done" => Self::Done,
            "skipped" => Self::Skipped,
            "canceled" => Self::Canceled,
            "timeout" => Self::Timeout,
            other => Self::Failed(other.to_string()),
        }
    }

    /// Whether the unit can be treated as stopped.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Done | Self::Skipped)
    }

    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Done => "done".to_string(),
            Self::Skipped => "skipped".to_string(),
            Self::Canceled => "canceled".to_string(),
            Self::Timeout => "timeout".to_string(),
            Self::Failed(reason) => reason.clone(),
        }
    }
}

// ── List ─────────────────────────────────────────────────────────────────────

/// One row of `quadlet list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    pub name: String,
    pub path: PathBuf,
    pub status: String,
}

// ── Batch outcomes ───────────────────────────────────────────────────────────

/// Outcome for one input of a batch operation.
#[derive(Debug)]
pub struct ItemOutcome<T> {
    /// Input reference (source for install, quadlet name for remove).
    pub key: String,
    pub result: Result<T, QuadletError>,
}

impl<T> ItemOutcome<T> {
    #[must_use]
    pub fn ok(key: impl Into<String>, value: T) -> Self {
        Self {
            key: key.into(),
            result: Ok(value),
        }
    }

    #[must_use]
    pub fn err(key: impl Into<String>, error: QuadletError) -> Self {
        Self {
            key: key.into(),
            result: Err(error),
        }
    }
}

/// Result of an install batch.
#[derive(Debug, Default)]
pub struct InstallReport {
    pub outcomes: Vec<ItemOutcome<PathBuf>>,
    /// Validation and reload failures; files listed as installed are on disk.
    pub batch_errors: Vec<QuadletError>,
}

impl InstallReport {
    /// `(reference, final path)` for every successful install.
    pub fn installed(&self) -> impl Iterator<Item = (&str, &PathBuf)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|p| (o.key.as_str(), p)))
    }

    /// `(reference, error)` for every failed install.
    pub fn errors(&self) -> impl Iterator<Item = (&str, &QuadletError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.key.as_str(), e)))
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.batch_errors.is_empty() || self.errors().next().is_some()
    }
}

/// Result of a remove batch.
#[derive(Debug, Default)]
pub struct RemoveReport {
    pub outcomes: Vec<ItemOutcome<()>>,
    /// Reload failure after files were already deleted.
    pub batch_errors: Vec<QuadletError>,
}

impl RemoveReport {
    /// Removed quadlet names, in processing order.
    pub fn removed(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_ok())
            .map(|o| o.key.as_str())
    }

    /// `(name, error)` for every quadlet that was not removed.
    pub fn errors(&self) -> impl Iterator<Item = (&str, &QuadletError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.key.as_str(), e)))
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.batch_errors.is_empty() || self.errors().next().is_some()
    }
}
