//! `ServiceManager` adapter driving `systemctl`.
//!
//! One adapter value corresponds to one manager (system or user) selected by
//! the privilege mode.

use std::time::Duration;

use tracing::{debug, warn};

use crate::application::ports::{CommandRunner, ServiceManager};
use crate::domain::dirs::PrivilegeMode;
use crate::domain::error::QuadletError;
use crate::domain::report::{JobResult, UnitStatus};
use crate::infra::command_runner::failure_message;

const SYSTEMCTL: &str = "systemctl";
const STATUS_PROPERTIES: &str = "--property=Id,LoadState,ActiveState,SubState";

/// Talks to the system manager when elevated, the user manager otherwise.
pub struct SystemctlServiceManager<R> {
    runner: R,
    mode: PrivilegeMode,
}

impl<R: CommandRunner> SystemctlServiceManager<R> {
    #[must_use]
    pub fn new(runner: R, mode: PrivilegeMode) -> Self {
        Self { runner, mode }
    }

    fn args<'a>(&self, rest: &[&'a str]) -> Vec<&'a str> {
        let mut args = Vec::with_capacity(rest.len() + 1);
        if self.mode.is_restricted() {
            args.push("--user");
        }
        args.extend_from_slice(rest);
        args
    }
}

impl<R: CommandRunner> ServiceManager for SystemctlServiceManager<R> {
    async fn connect(&self) -> Result<(), QuadletError> {
        let args = self.args(&["show", "--property=Version"]);
        let output = self
            .runner
            .run(SYSTEMCTL, &args)
            .await
            .map_err(|e| QuadletError::ServiceManagerConnect(format!("{e:#}")))?;
        if !output.status.success() {
            return Err(QuadletError::ServiceManagerConnect(failure_message(&output)));
        }
        debug!(
            version = %String::from_utf8_lossy(&output.stdout).trim(),
            "connected to systemd"
        );
        Ok(())
    }

    async fn list_units_by_names(&self, names: &[String]) -> Result<Vec<UnitStatus>, QuadletError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let mut args = self.args(&["show", STATUS_PROPERTIES, "--"]);
        args.extend(names.iter().map(String::as_str));
        let output = self
            .runner
            .run(SYSTEMCTL, &args)
            .await
            .map_err(|e| QuadletError::StatusQuery(format!("{e:#}")))?;
        if !output.status.success() {
            return Err(QuadletError::StatusQuery(failure_message(&output)));
        }
        parse_show_output(names, &String::from_utf8_lossy(&output.stdout))
    }

    async fn stop_unit(&self, unit: &str, timeout: Duration) -> Result<JobResult, QuadletError> {
        let args = self.args(&["stop", "--job-mode=replace", "--", unit]);
        // systemctl blocks until the stop job finishes.
        match self.runner.run_with_timeout(SYSTEMCTL, &args, timeout).await {
            Ok(output) if output.status.success() => Ok(JobResult::Done),
            Ok(output) => Ok(JobResult::Failed(failure_message(&output))),
            Err(e) => {
                warn!(unit, error = %e, "stop job did not complete");
                Ok(JobResult::Failed(format!("{e:#}")))
            }
        }
    }

    async fn reload(&self) -> Result<(), QuadletError> {
        let args = self.args(&["daemon-reload"]);
        let output = self
            .runner
            .run(SYSTEMCTL, &args)
            .await
            .map_err(|e| QuadletError::ReloadFailed(format!("{e:#}")))?;
        if !output.status.success() {
            return Err(QuadletError::ReloadFailed(failure_message(&output)));
        }
        Ok(())
    }
}

/// Pair `systemctl show` property blocks with the names that were queried.
///
/// `systemctl show` prints one blank-line separated block per argument, in
/// argument order, so blocks are matched by position; the reported `Id` may
/// differ from the queried name when the name is an alias.
fn parse_show_output(names: &[String], stdout: &str) -> Result<Vec<UnitStatus>, QuadletError> {
    let blocks: Vec<&str> = stdout
        .split("\n\n")
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .collect();
    if blocks.len() != names.len() {
        return Err(QuadletError::StatusQuery(format!(
            "expected {} status blocks, got {}",
            names.len(),
            blocks.len()
        )));
    }

    Ok(names
        .iter()
        .zip(blocks)
        .map(|(name, block)| {
            let mut status = UnitStatus {
                name: name.clone(),
                load_state: String::new(),
                active_state: String::new(),
                sub_state: String::new(),
            };
            for line in block.lines() {
                match line.split_once('=') {
                    Some(("LoadState", v)) => status.load_state = v.to_string(),
                    Some(("ActiveState", v)) => status.active_state = v.to_string(),
                    Some(("SubState", v)) => status.sub_state = v.to_string(),
                    _ => {}
                }
            }
            status
        })
        .collect())
}
