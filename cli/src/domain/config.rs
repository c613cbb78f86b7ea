//! Domain types for quadlet CLI configuration.
//!
//! Pure functions only, no I/O, no async, no filesystem access.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ── Constants ────────────────────────────────────────────────────────────────

/// Where Podman installs the quadlet generator.
pub const DEFAULT_GENERATOR_PATH: &str =
    "/usr/lib/systemd/system-generators/podman-system-generator";

// ── Config schema ────────────────────────────────────────────────────────────

/// Configuration stored in `~/.config/quadlet-cli/config.yaml`.
///
/// Every operation receives this value explicitly; nothing reads it from
/// global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadletConfig {
    /// Path to the quadlet generator binary used for dry-run validation.
    pub generator_path: PathBuf,
    /// Upper bound on waiting for a unit to stop during `rm --force`.
    pub stop_timeout_secs: u64,
    /// Timeout for ordinary `systemctl` and `podman` invocations.
    pub command_timeout_secs: u64,
    /// Timeout for downloading a quadlet over HTTP(S).
    pub fetch_timeout_secs: u64,
    /// Replaces the computed search directories when set.
    pub unit_dirs: Option<Vec<PathBuf>>,
}

impl Default for QuadletConfig {
    fn default() -> Self {
        Self {
            generator_path: PathBuf::from(DEFAULT_GENERATOR_PATH),
            stop_timeout_secs: 90,
            command_timeout_secs: 30,
            fetch_timeout_secs: 60,
            unit_dirs: None,
        }
    }
}

impl QuadletConfig {
    #[must_use]
    pub fn stop_timeout(&self) -> Duration {
        Duration::from_secs(self.stop_timeout_secs)
    }

    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
