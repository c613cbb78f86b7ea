//! `QuadletGenerator` adapter running Podman's systemd generator in dry-run mode.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use tracing::{debug, error};

use crate::application::ports::{CommandRunner, QuadletGenerator};
use crate::domain::dirs::{PrivilegeMode, format_dir_list};
use crate::domain::error::QuadletError;
use crate::infra::command_runner::failure_message;
use crate::infra::host::UNIT_DIRS_ENV;

/// Runs the generator binary at a configured path.
pub struct PodmanGenerator<R> {
    runner: R,
    path: PathBuf,
}

impl<R: CommandRunner> PodmanGenerator<R> {
    #[must_use]
    pub fn new(runner: R, path: PathBuf) -> Self {
        Self { runner, path }
    }
}

impl<R: CommandRunner> QuadletGenerator for PodmanGenerator<R> {
    async fn ensure_available(&self) -> Result<(), QuadletError> {
        let meta = std::fs::metadata(&self.path).map_err(|e| {
            QuadletError::GeneratorUnavailable(format!("{}: {e}", self.path.display()))
        })?;
        if !meta.is_file() {
            return Err(QuadletError::GeneratorUnavailable(format!(
                "{} is not a regular file",
                self.path.display()
            )));
        }
        if meta.permissions().mode() & 0o111 == 0 {
            return Err(QuadletError::GeneratorUnavailable(format!(
                "{} is not executable",
                self.path.display()
            )));
        }
        Ok(())
    }

    /// Dry-runs the generator with `QUADLET_UNIT_DIRS` pinned to
    /// `search_dirs`, so configured directories are checked too.
    async fn validate(
        &self,
        mode: PrivilegeMode,
        search_dirs: &[PathBuf],
    ) -> Result<(), QuadletError> {
        let program = self.path.to_string_lossy();
        let mut args = vec!["--dryrun"];
        if mode.is_restricted() {
            args.push("--user");
        }
        let dirs = format_dir_list(search_dirs);
        let output = self
            .runner
            .run_with_env(&program, &args, &[(UNIT_DIRS_ENV, dirs.as_str())])
            .await
            .map_err(|e| QuadletError::ValidationFailed(format!("{e:#}")))?;
        if output.status.success() {
            debug!(dirs = %dirs, "quadlet generator dry run succeeded");
            return Ok(());
        }
        error!(
            stdout = %String::from_utf8_lossy(&output.stdout),
            "quadlet generator dry run failed"
        );
        Err(QuadletError::ValidationFailed(failure_message(&output)))
    }
}
