//! Application service: install quadlets from paths, URLs and artifacts.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::application::ports::{
    FetchedSource, ProgressReporter, QuadletFs, QuadletGenerator, ServiceManager, SourceFetcher,
};
use crate::application::services::QuadletContext;
use crate::application::services::directories;
use crate::domain::cancel::CancelToken;
use crate::domain::error::QuadletError;
use crate::domain::quadlet::{ensure_supported, is_plain_file_name};
use crate::domain::report::{InstallReport, ItemOutcome};
use crate::domain::source::SourceRef;

/// Options for [`install_quadlets`].
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Ask the service manager to reload after installing.
    pub reload_systemd: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            reload_systemd: true,
        }
    }
}

/// Install every source into the resolved quadlet directory.
///
/// Steps:
/// 1. Connect to the service manager and check the generator is installed
/// 2. Resolve the install directory
/// 3. For each source: fetch, validate the destination, copy (never aborting
///    the batch on one item's failure)
/// 4. Dry-run the generator over the whole directory tree
/// 5. Reload the service manager if requested
///
/// Validation and reload failures are attached to the report as batch
/// errors; the per-item outcomes are always complete.
///
/// # Errors
///
/// Returns `ServiceManagerConnect`, `GeneratorUnavailable` or
/// `DirectoryUnavailable` before anything is written.
pub async fn install_quadlets<F, M, R, S, G>(
    ctx: &QuadletContext<'_, F, M, R>,
    fetcher: &S,
    generator: &G,
    sources: &[String],
    options: &InstallOptions,
    cancel: &CancelToken,
) -> Result<InstallReport, QuadletError>
where
    F: QuadletFs,
    M: ServiceManager,
    R: ProgressReporter,
    S: SourceFetcher,
    G: QuadletGenerator,
{
    ctx.manager.connect().await?;
    generator.ensure_available().await?;
    let install_dir = directories::install_dir(ctx.fs, ctx.layout)?;
    debug!(dir = %install_dir.display(), "going to install quadlets to directory");

    let mut report = InstallReport::default();

    for reference in sources {
        if cancel.is_cancelled() {
            report
                .outcomes
                .push(ItemOutcome::err(reference.clone(), QuadletError::Cancelled));
            continue;
        }

        ctx.reporter.step(&format!("installing {reference}..."));
        let fetched = match fetcher.fetch(&SourceRef::parse(reference)).await {
            Ok(fetched) if fetched.is_empty() => {
                let err = QuadletError::Fetch {
                    reference: reference.clone(),
                    reason: "no content to install".to_string(),
                };
                report.outcomes.push(ItemOutcome::err(reference.clone(), err));
                continue;
            }
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(source = %reference, error = %e, "fetch failed");
                report.outcomes.push(ItemOutcome::err(reference.clone(), e));
                continue;
            }
        };

        for item in fetched {
            let result = install_one(ctx.fs, &item, &install_dir);
            match &result {
                Ok(path) => {
                    info!(source = %item.key, path = %path.display(), "installed quadlet");
                    ctx.reporter.success(&format!("installed {}", path.display()));
                }
                Err(e) => warn!(source = %item.key, error = %e, "quadlet failed to install"),
            }
            // Dropping `item` releases its temporary file, if any.
            report.outcomes.push(ItemOutcome {
                key: item.key,
                result,
            });
        }
    }

    // Quadlets may reference each other, so validation covers the whole tree.
    if let Err(e) = generator.validate(ctx.layout.mode, &ctx.layout.search_dirs).await {
        error!(error = %e, "error validating quadlet syntax");
        report.batch_errors.push(e);
    }

    if options.reload_systemd {
        ctx.reporter.step("reloading systemd...");
        if let Err(e) = ctx.manager.reload().await {
            report.batch_errors.push(e);
        }
    }

    Ok(report)
}

/// Copy one fetched file into `install_dir`. Never overwrites.
fn install_one(
    fs: &impl QuadletFs,
    item: &FetchedSource,
    install_dir: &Path,
) -> Result<PathBuf, QuadletError> {
    let dest_name = match &item.suggested_name {
        Some(name) => name.clone(),
        None => item
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    if !is_plain_file_name(&dest_name) {
        return Err(QuadletError::Fetch {
            reference: item.key.clone(),
            reason: format!("{dest_name:?} is not a usable file name"),
        });
    }
    ensure_supported(&dest_name)?;

    let dest = install_dir.join(&dest_name);
    if fs
        .exists(&dest)
        .map_err(|e| QuadletError::io("cannot stat", &dest, e))?
    {
        return Err(QuadletError::AlreadyExists(dest_name));
    }

    match fs.is_file(&item.path) {
        Ok(true) => {}
        Ok(false) => {
            return Err(QuadletError::io(
                "quadlet to install",
                &item.path,
                std::io::Error::other("not a regular file"),
            ));
        }
        Err(e) => {
            return Err(QuadletError::io(
                "quadlet to install does not exist or cannot be read:",
                &item.path,
                e,
            ));
        }
    }

    let contents = fs
        .read(&item.path)
        .map_err(|e| QuadletError::io("reading source file", &item.path, e))?;
    fs.write_new(&dest, &contents).map_err(|e| {
        if e.kind() == ErrorKind::AlreadyExists {
            QuadletError::AlreadyExists(dest_name.clone())
        } else {
            QuadletError::io("writing quadlet", &dest, e)
        }
    })?;
    Ok(dest)
}
