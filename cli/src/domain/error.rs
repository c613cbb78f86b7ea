//! Typed domain error enum for quadlet operations.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! Variants are grouped by how far they propagate: fatal errors abort a whole
//! call, per-item errors land in a report outcome, batch-level errors are
//! attached to a report after mutations already happened.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by install, list, print and remove.
#[derive(Debug, Error)]
pub enum QuadletError {
    // ── Fatal ────────────────────────────────────────────────────────────────
    #[error("no usable quadlet directory: {0}")]
    DirectoryUnavailable(String),

    #[error("connecting to systemd: {0}")]
    ServiceManagerConnect(String),

    #[error("quadlet generator unavailable: {0}")]
    GeneratorUnavailable(String),

    #[error("invalid filter {filter:?}: {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("must provide at least 1 quadlet to remove")]
    NoTargets,

    #[error("querying systemd for unit status: {0}")]
    StatusQuery(String),

    // ── Per item ─────────────────────────────────────────────────────────────
    #[error("fetching {reference}: {reason}")]
    Fetch { reference: String, reason: String },

    #[error("{extension:?} is not a supported quadlet file type")]
    UnsupportedExtension { extension: String },

    #[error("a quadlet with name {0} already exists, refusing to overwrite")]
    AlreadyExists(String),

    #[error("could not locate quadlet {0:?} in any supported quadlet directory")]
    NotFound(String),

    #[error("parsing quadlet file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("quadlet {0} is running and force is not set, refusing to remove")]
    Running(String),

    #[error("unable to stop quadlet {quadlet}: {reason}")]
    Stop { quadlet: String, reason: String },

    #[error("removing quadlet {quadlet}: {source}")]
    Delete {
        quadlet: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cancelled before processing started")]
    Cancelled,

    #[error("{context} {path}: {source}")]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Batch level ──────────────────────────────────────────────────────────
    #[error("validating quadlet syntax failed: {0}")]
    ValidationFailed(String),

    #[error("reloading systemd: {0}")]
    ReloadFailed(String),
}

impl QuadletError {
    /// Wrap an I/O error with a short description of the operation and path.
    #[must_use]
    pub fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }

    /// Stable machine-readable code used by JSON output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::DirectoryUnavailable(_) => "directory_unavailable",
            Self::ServiceManagerConnect(_) => "service_manager_connect",
            Self::GeneratorUnavailable(_) => "generator_unavailable",
            Self::InvalidFilter { .. } => "invalid_filter",
            Self::NoTargets => "no_targets",
            Self::StatusQuery(_) => "status_query",
            Self::Fetch { .. } => "fetch_error",
            Self::UnsupportedExtension { .. } => "unsupported_extension",
            Self::AlreadyExists(_) => "already_exists",
            Self::NotFound(_) => "not_found",
            Self::Parse { .. } => "parse_error",
            Self::Running(_) => "running",
            Self::Stop { .. } => "stop_error",
            Self::Delete { .. } => "delete_error",
            Self::Cancelled => "cancelled",
            Self::Io { .. } => "io_error",
            Self::ValidationFailed(_) => "validation_failed",
            Self::ReloadFailed(_) => "reload_failed",
        }
    }
}
