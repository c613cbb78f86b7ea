//! Classification of install source references.

use std::fmt;
use std::path::PathBuf;

/// Prefix selecting the OCI artifact store.
pub const ARTIFACT_SCHEME: &str = "oci-artifact://";

/// Where the content for one install reference comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    /// File on the local filesystem, read in place.
    Local(PathBuf),
    /// `http://` or `https://` URL, downloaded to a temporary file.
    Http(String),
    /// Artifact name in the OCI artifact store; each layer is one quadlet.
    Artifact(String),
}

impl SourceRef {
    /// Classify a raw reference by prefix. Anything unrecognised is a path.
    #[must_use]
    pub fn parse(reference: &str) -> Self {
        if let Some(name) = reference.strip_prefix(ARTIFACT_SCHEME) {
            Self::Artifact(name.to_string())
        } else if reference.starts_with("http://") || reference.starts_with("https://") {
            Self::Http(reference.to_string())
        } else {
            Self::Local(PathBuf::from(reference))
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Http(url) => f.write_str(url),
            Self::Artifact(name) => write!(f, "{ARTIFACT_SCHEME}{name}"),
        }
    }
}

/// Suggested destination file name for a URL: its last path segment.
///
/// Query string and fragment are ignored. Returns `None` when the URL has no
/// usable final segment (e.g. `https://example.com/`).
#[must_use]
pub fn url_file_name(url: &str) -> Option<String> {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let end = without_scheme
        .find(['?', '#'])
        .unwrap_or(without_scheme.len());
    let path = &without_scheme[..end];
    // Host only, no path component.
    let (_, path) = path.split_once('/')?;
    let segment = path.rsplit('/').next()?;
    (!segment.is_empty() && segment != "." && segment != "..").then(|| segment.to_string())
}
