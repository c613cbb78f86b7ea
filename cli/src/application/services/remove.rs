//! Application service: stop and remove installed quadlets.
//!
//! Per quadlet: resolve the file, derive its service name, check the
//! service's state, stop it if running and `force` is set, then delete the
//! file. A running service without `force`, or a failed stop, keeps the file.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::application::ports::{ProgressReporter, QuadletFs, ServiceManager};
use crate::application::services::QuadletContext;
use crate::application::services::directories;
use crate::domain::cancel::CancelToken;
use crate::domain::config::QuadletConfig;
use crate::domain::error::QuadletError;
use crate::domain::quadlet::QuadletDescriptor;
use crate::domain::report::{ItemOutcome, RemoveReport, UnitStatus};

/// Options for [`remove_quadlets`].
#[derive(Debug, Clone)]
pub struct RemoveOptions {
    /// Stop running services instead of refusing to remove them.
    pub force: bool,
    /// Remove every quadlet found; the name list is ignored.
    pub all: bool,
    /// Treat names that cannot be found as already removed.
    pub ignore: bool,
    /// Upper bound on each stop wait.
    pub stop_timeout: Duration,
}

impl Default for RemoveOptions {
    fn default() -> Self {
        Self {
            force: false,
            all: false,
            ignore: false,
            stop_timeout: QuadletConfig::default().stop_timeout(),
        }
    }
}

struct Target {
    name: String,
    path: PathBuf,
    service: String,
    /// Running without force, or the stop failed: the file stays.
    keep: bool,
}

/// Remove the named quadlets (or all of them).
///
/// Outcomes are recorded in processing order. Stops are issued one at a
/// time and each waits for completion before the next begins. The service
/// manager is reloaded once at the end if any target was loaded.
///
/// # Errors
///
/// Returns `NoTargets` when no names are given without `all`, and
/// `ServiceManagerConnect`, `DirectoryUnavailable` or the status query error
/// before anything is stopped or deleted.
pub async fn remove_quadlets<F, M, R>(
    ctx: &QuadletContext<'_, F, M, R>,
    names: &[String],
    options: &RemoveOptions,
    cancel: &CancelToken,
) -> Result<RemoveReport, QuadletError>
where
    F: QuadletFs,
    M: ServiceManager,
    R: ProgressReporter,
{
    if names.is_empty() && !options.all {
        return Err(QuadletError::NoTargets);
    }
    ctx.manager.connect().await?;

    let mut report = RemoveReport::default();
    let quadlets = if options.all {
        directories::enumerate(ctx.fs, ctx.layout)?
    } else {
        resolve_names(ctx, names, options.ignore, &mut report)
    };

    let mut targets = Vec::with_capacity(quadlets.len());
    for quadlet in &quadlets {
        match directories::service_name(ctx.fs, quadlet) {
            Ok(service) => targets.push(Target {
                name: quadlet.name.clone(),
                path: quadlet.path.clone(),
                service: service.to_string(),
                keep: false,
            }),
            // Gone since it was listed: `all` and `ignore` accept that as removed.
            Err(QuadletError::Io { source, .. })
                if source.kind() == ErrorKind::NotFound && (options.all || options.ignore) =>
            {
                debug!(quadlet = %quadlet.name, "quadlet vanished before removal");
                report.outcomes.push(ItemOutcome::ok(quadlet.name.clone(), ()));
            }
            Err(e) => report.outcomes.push(ItemOutcome::err(quadlet.name.clone(), e)),
        }
    }

    let need_reload = stop_running(ctx, &mut targets, options, cancel, &mut report).await?;

    for target in targets.iter().filter(|t| !t.keep) {
        if cancel.is_cancelled() {
            report
                .outcomes
                .push(ItemOutcome::err(target.name.clone(), QuadletError::Cancelled));
            continue;
        }
        match ctx.fs.remove_file(&target.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %target.path.display(), "quadlet already gone");
            }
            Err(source) => {
                report.outcomes.push(ItemOutcome::err(
                    target.name.clone(),
                    QuadletError::Delete {
                        quadlet: target.name.clone(),
                        source,
                    },
                ));
                continue;
            }
        }
        ctx.reporter.success(&format!("removed {}", target.name));
        report.outcomes.push(ItemOutcome::ok(target.name.clone(), ()));
    }

    if need_reload {
        ctx.reporter.step("reloading systemd...");
        if let Err(e) = ctx.manager.reload().await {
            report.batch_errors.push(e);
        }
    }

    Ok(report)
}

/// Map requested names to files. Unresolved names are settled immediately.
fn resolve_names<F, M, R>(
    ctx: &QuadletContext<'_, F, M, R>,
    names: &[String],
    ignore: bool,
    report: &mut RemoveReport,
) -> Vec<QuadletDescriptor>
where
    F: QuadletFs,
{
    let mut resolved = Vec::with_capacity(names.len());
    for name in names {
        match directories::find_by_name(ctx.fs, ctx.layout, name) {
            Ok(path) => resolved.push(QuadletDescriptor::new(path)),
            Err(_) if ignore => {
                debug!(quadlet = %name, "quadlet not found, ignoring");
                report.outcomes.push(ItemOutcome::ok(name.clone(), ()));
            }
            Err(e) => report.outcomes.push(ItemOutcome::err(name.clone(), e)),
        }
    }
    resolved
}

/// Query all target services once and stop the running ones.
///
/// Returns whether any target was loaded, i.e. whether a reload is due.
async fn stop_running<F, M, R>(
    ctx: &QuadletContext<'_, F, M, R>,
    targets: &mut [Target],
    options: &RemoveOptions,
    cancel: &CancelToken,
    report: &mut RemoveReport,
) -> Result<bool, QuadletError>
where
    M: ServiceManager,
    R: ProgressReporter,
{
    if targets.is_empty() {
        return Ok(false);
    }

    let mut query: Vec<String> = Vec::with_capacity(targets.len());
    for target in targets.iter() {
        if !query.contains(&target.service) {
            query.push(target.service.clone());
        }
    }
    let statuses = ctx.manager.list_units_by_names(&query).await?;
    let by_name: HashMap<&str, &UnitStatus> =
        statuses.iter().map(|s| (s.name.as_str(), s)).collect();

    let mut need_reload = false;
    for target in targets.iter_mut() {
        let Some(unit) = by_name.get(target.service.as_str()) else {
            continue;
        };
        if !unit.is_loaded() {
            continue;
        }
        need_reload = true;
        if !unit.is_active() {
            continue;
        }

        target.keep = true;
        if !options.force {
            report.outcomes.push(ItemOutcome::err(
                target.name.clone(),
                QuadletError::Running(target.name.clone()),
            ));
            continue;
        }
        if cancel.is_cancelled() {
            report
                .outcomes
                .push(ItemOutcome::err(target.name.clone(), QuadletError::Cancelled));
            continue;
        }

        info!(unit = %target.service, quadlet = %target.name, "going to stop systemd unit");
        ctx.reporter.step(&format!("stopping {}...", target.service));
        let reason = match ctx.manager.stop_unit(&target.service, options.stop_timeout).await {
            Ok(result) if result.is_stopped() => {
                debug!(unit = %target.service, result = %result.describe(), "unit stopped");
                target.keep = false;
                continue;
            }
            Ok(result) => result.describe(),
            Err(e) => e.to_string(),
        };
        report.outcomes.push(ItemOutcome::err(
            target.name.clone(),
            QuadletError::Stop {
                quadlet: target.name.clone(),
                reason,
            },
        ));
    }

    Ok(need_reload)
}
