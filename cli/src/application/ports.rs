//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::any::Any;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{
    DirProbe, JobResult, PrivilegeMode, QuadletConfig, QuadletError, SourceRef, UnitStatus,
};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Keeps staged content alive; dropping the last clone deletes it.
pub type StagingGuard = Arc<dyn Any + Send + Sync>;

/// One local file ready to be installed, produced by a [`SourceFetcher`].
#[derive(Debug)]
pub struct FetchedSource {
    /// Outcome key: the original reference, or `reference#layer` for artifacts.
    pub key: String,
    /// Local file holding the content.
    pub path: PathBuf,
    /// Destination file name; `None` means use the file name of `path`.
    pub suggested_name: Option<String>,
    /// Temporary file or directory backing `path`, if any.
    pub guard: Option<StagingGuard>,
}

/// One content layer of an OCI artifact, extracted to disk.
pub struct ArtifactLayer {
    pub file_name: String,
    pub path: PathBuf,
}

/// All layers of an artifact plus the guard owning their staging directory.
pub struct ExtractedArtifact {
    pub layers: Vec<ArtifactLayer>,
    pub guard: StagingGuard,
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program with extra environment variables, using the default
    /// timeout. The rest of the environment is inherited.
    async fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Service Manager Port ──────────────────────────────────────────────────────

/// The subset of the systemd manager interface the engine consumes.
///
/// One value represents one connection for the duration of a request.
#[allow(async_fn_in_trait)]
pub trait ServiceManager {
    /// Verify the manager is reachable. Failure is fatal to the request.
    async fn connect(&self) -> Result<(), QuadletError>;
    /// Status of every named unit in a single round trip.
    async fn list_units_by_names(&self, names: &[String]) -> Result<Vec<UnitStatus>, QuadletError>;
    /// Stop `unit` and wait (at most `timeout`) for the job to complete.
    async fn stop_unit(&self, unit: &str, timeout: Duration) -> Result<JobResult, QuadletError>;
    /// Re-read unit definitions from disk.
    async fn reload(&self) -> Result<(), QuadletError>;
}

// ── Quadlet Generator Port ────────────────────────────────────────────────────

/// The quadlet generator binary, used only for validation.
#[allow(async_fn_in_trait)]
pub trait QuadletGenerator {
    /// Check the generator is installed and executable.
    async fn ensure_available(&self) -> Result<(), QuadletError>;
    /// Dry-run the generator over every quadlet in `search_dirs`.
    async fn validate(
        &self,
        mode: PrivilegeMode,
        search_dirs: &[PathBuf],
    ) -> Result<(), QuadletError>;
}

// ── Source Ports ──────────────────────────────────────────────────────────────

/// Content-addressed artifact storage.
#[allow(async_fn_in_trait)]
pub trait ArtifactStore {
    /// Extract every content layer of artifact `name` to a staging directory.
    async fn extract_layers(&self, name: &str) -> Result<ExtractedArtifact, QuadletError>;
}

/// Turns a source reference into local files ready to copy.
#[allow(async_fn_in_trait)]
pub trait SourceFetcher {
    /// Resolve one reference. Artifacts may yield several files.
    async fn fetch(&self, source: &SourceRef) -> Result<Vec<FetchedSource>, QuadletError>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Filesystem operations used on quadlet directories.
pub trait QuadletFs {
    /// Classify `dir` for install-target selection.
    fn probe_dir(&self, dir: &Path) -> DirProbe;
    /// Create `dir` and its parents with mode 0755.
    fn create_dir_all(&self, dir: &Path) -> std::io::Result<()>;
    /// File names of the regular (non-directory) entries of `dir`, sorted.
    fn list_files(&self, dir: &Path) -> std::io::Result<Vec<String>>;
    /// Whether `path` exists. Errors other than "not found" are returned.
    fn exists(&self, path: &Path) -> std::io::Result<bool>;
    /// Whether `path` is a regular file (following symlinks).
    fn is_file(&self, path: &Path) -> std::io::Result<bool>;
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>>;
    /// Create `path` with mode 0644; fails with `AlreadyExists` if present.
    fn write_new(&self, path: &Path, contents: &[u8]) -> std::io::Result<()>;
    fn remove_file(&self, path: &Path) -> std::io::Result<()>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts configuration loading.
pub trait ConfigStore {
    /// Load the configuration, returning defaults if no file exists.
    fn load(&self) -> Result<QuadletConfig>;
    /// Path of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
