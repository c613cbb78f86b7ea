//! Quadlet file types, the on-disk descriptor, and service name derivation.
//!
//! Pure functions only, no I/O, no async, no filesystem access. Callers
//! read file contents and hand them in.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use crate::domain::error::QuadletError;
use crate::domain::unit::UnitFile;

/// File extensions recognised as quadlets, without the leading dot.
pub const SUPPORTED_EXTENSIONS: &[&str] =
    &["container", "volume", "network", "kube", "image", "build", "pod"];

/// Quadlet flavour, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadletKind {
    Container,
    Volume,
    Network,
    Kube,
    Image,
    Build,
    Pod,
}

impl QuadletKind {
    /// Classify a file name by its extension.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        match extension(name)? {
            "container" => Some(Self::Container),
            "volume" => Some(Self::Volume),
            "network" => Some(Self::Network),
            "kube" => Some(Self::Kube),
            "image" => Some(Self::Image),
            "build" => Some(Self::Build),
            "pod" => Some(Self::Pod),
            _ => None,
        }
    }

    /// Unit file section holding the `ServiceName=` override.
    #[must_use]
    pub fn section(self) -> &'static str {
        match self {
            Self::Container => "Container",
            Self::Volume => "Volume",
            Self::Network => "Network",
            Self::Kube => "Kube",
            Self::Image => "Image",
            Self::Build => "Build",
            Self::Pod => "Pod",
        }
    }

    /// Suffix appended to the file stem when no `ServiceName=` is set.
    #[must_use]
    pub fn default_suffix(self) -> &'static str {
        match self {
            Self::Container | Self::Kube => "",
            Self::Volume => "-volume",
            Self::Network => "-network",
            Self::Image => "-image",
            Self::Build => "-build",
            Self::Pod => "-pod",
        }
    }
}

/// Extension of `name` without the dot, if any.
fn extension(name: &str) -> Option<&str> {
    Path::new(name).extension().and_then(|e| e.to_str())
}

/// Returns `true` when `name` ends in a supported quadlet extension.
#[must_use]
pub fn is_supported(name: &str) -> bool {
    QuadletKind::from_file_name(name).is_some()
}

/// Reject names without a supported extension.
///
/// # Errors
///
/// Returns `UnsupportedExtension` carrying the offending extension (with dot,
/// or empty when the name has none).
pub fn ensure_supported(name: &str) -> Result<QuadletKind, QuadletError> {
    QuadletKind::from_file_name(name).ok_or_else(|| QuadletError::UnsupportedExtension {
        extension: extension(name).map(|e| format!(".{e}")).unwrap_or_default(),
    })
}

/// Returns `true` when `name` is a bare file name (no separators, not `.`/`..`).
#[must_use]
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name)
}

/// Derive the systemd service unit generated for a quadlet.
///
/// Honors `ServiceName=` in the type's main section, otherwise uses the file
/// stem plus the type-specific suffix. The result always ends in `.service`.
///
/// # Errors
///
/// Returns `UnsupportedExtension` for unknown file types and `Parse` when the
/// unit content is malformed or declares an empty service name.
pub fn derive_service_name(path: &Path, content: &str) -> Result<String, QuadletError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let kind = ensure_supported(file_name)?;
    let unit = UnitFile::parse(content).map_err(|reason| QuadletError::Parse {
        path: path.to_path_buf(),
        reason,
    })?;

    let base = match unit.lookup(kind.section(), "ServiceName") {
        Some(name) if name.is_empty() => {
            return Err(QuadletError::Parse {
                path: path.to_path_buf(),
                reason: "ServiceName is empty".to_string(),
            });
        }
        Some(name) => name.to_string(),
        None => {
            let stem = Path::new(file_name)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            format!("{stem}{}", kind.default_suffix())
        }
    };
    Ok(format!("{base}.service"))
}

/// A quadlet file found in one of the search directories.
#[derive(Debug, Clone)]
pub struct QuadletDescriptor {
    /// File name including extension.
    pub name: String,
    /// Absolute path to the file.
    pub path: PathBuf,
    service_name: OnceCell<String>,
}

impl QuadletDescriptor {
    /// Describe the quadlet at `path`. The name is the path's file name.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            path,
            service_name: OnceCell::new(),
        }
    }

    /// The derived service name, computing it with `derive` on first use.
    ///
    /// # Errors
    ///
    /// Propagates the error from `derive`; nothing is cached in that case.
    pub fn service_name_with<F>(&self, derive: F) -> Result<&str, QuadletError>
    where
        F: FnOnce(&Path) -> Result<String, QuadletError>,
    {
        if let Some(name) = self.service_name.get() {
            return Ok(name);
        }
        let name = derive(&self.path)?;
        Ok(self.service_name.get_or_init(|| name))
    }
}
