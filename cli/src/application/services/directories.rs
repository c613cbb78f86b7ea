//! Application service: locating quadlet directories and files.

use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::application::ports::QuadletFs;
use crate::domain::dirs::{DirProbe, UnitDirLayout};
use crate::domain::error::QuadletError;
use crate::domain::quadlet::{
    QuadletDescriptor, derive_service_name, ensure_supported, is_plain_file_name, is_supported,
};

/// Resolve (and in restricted mode, create) the directory new quadlets go to.
///
/// # Errors
///
/// Returns `DirectoryUnavailable` when no candidate qualifies, the chosen
/// path exists but is not a directory, or it cannot be created.
pub fn install_dir(fs: &impl QuadletFs, layout: &UnitDirLayout) -> Result<PathBuf, QuadletError> {
    let target = layout
        .select_install_target(|dir| fs.probe_dir(dir))
        .ok_or_else(|| {
            QuadletError::DirectoryUnavailable(format!(
                "none of {} is writable",
                join_dirs(&layout.search_dirs)
            ))
        })?;

    match fs.probe_dir(&target) {
        DirProbe::WritableDir | DirProbe::ReadOnlyDir => Ok(target),
        DirProbe::NotADirectory => Err(QuadletError::DirectoryUnavailable(format!(
            "install path {} for quadlets is not a directory",
            target.display()
        ))),
        DirProbe::Missing if layout.mode.is_restricted() => {
            debug!(dir = %target.display(), "creating quadlet install directory");
            fs.create_dir_all(&target).map_err(|e| {
                QuadletError::DirectoryUnavailable(format!(
                    "unable to create quadlet install path {}: {e}",
                    target.display()
                ))
            })?;
            Ok(target)
        }
        DirProbe::Missing => Err(QuadletError::DirectoryUnavailable(format!(
            "quadlet install path {} does not exist",
            target.display()
        ))),
    }
}

/// Every quadlet file across all search directories, in precedence order.
///
/// Missing directories are skipped. Duplicate names in different
/// directories are all reported.
///
/// # Errors
///
/// Returns `DirectoryUnavailable` when directories exist but none of them
/// could be read.
pub fn enumerate(
    fs: &impl QuadletFs,
    layout: &UnitDirLayout,
) -> Result<Vec<QuadletDescriptor>, QuadletError> {
    let mut found = Vec::new();
    let mut readable = 0usize;
    let mut failures = Vec::new();

    for dir in &layout.search_dirs {
        match fs.list_files(dir) {
            Ok(names) => {
                readable += 1;
                debug!(dir = %dir.display(), "checking for quadlets");
                for name in names.into_iter().filter(|n| is_supported(n)) {
                    debug!(quadlet = %name, "found quadlet");
                    found.push(QuadletDescriptor::new(dir.join(name)));
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(dir = %dir.display(), "quadlet directory does not exist");
            }
            Err(e) => {
                info!(dir = %dir.display(), error = %e, "cannot list quadlet directory");
                failures.push(format!("{}: {e}", dir.display()));
            }
        }
    }

    if readable == 0 && !failures.is_empty() {
        return Err(QuadletError::DirectoryUnavailable(failures.join("; ")));
    }
    Ok(found)
}

/// First path named `name` in precedence order.
///
/// # Errors
///
/// Returns `UnsupportedExtension` for non-quadlet names, `NotFound` when no
/// directory holds the file, and `Io` when a candidate cannot be inspected.
pub fn find_by_name(
    fs: &impl QuadletFs,
    layout: &UnitDirLayout,
    name: &str,
) -> Result<PathBuf, QuadletError> {
    ensure_supported(name)?;
    if !is_plain_file_name(name) {
        return Err(QuadletError::NotFound(name.to_string()));
    }

    for dir in &layout.search_dirs {
        let candidate = dir.join(name);
        match fs.exists(&candidate) {
            Ok(true) => return Ok(candidate),
            Ok(false) => {}
            Err(e) => return Err(QuadletError::io("cannot stat quadlet at", candidate, e)),
        }
    }
    Err(QuadletError::NotFound(name.to_string()))
}

/// Service name for `quadlet`, reading and parsing the file on first use.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read and `Parse` if it is not valid
/// UTF-8 or not a valid unit file.
pub fn service_name<'q>(
    fs: &impl QuadletFs,
    quadlet: &'q QuadletDescriptor,
) -> Result<&'q str, QuadletError> {
    quadlet.service_name_with(|path| {
        let bytes = fs
            .read(path)
            .map_err(|e| QuadletError::io("reading quadlet", path, e))?;
        let content = String::from_utf8(bytes).map_err(|e| QuadletError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        derive_service_name(path, &content)
    })
}

fn join_dirs(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
