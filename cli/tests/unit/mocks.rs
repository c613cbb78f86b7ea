//! Shared mock infrastructure for unit tests.
//!
//! In-memory stand-ins for the service manager, generator and artifact
//! store. The filesystem is real (`LocalFs` on a temp directory), with
//! `FaultyFs` layering injected failures on top of it.

#![allow(clippy::expect_used, dead_code)]

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use quadlet_cli::application::ports::{
    ArtifactLayer, ArtifactStore, ExtractedArtifact, ProgressReporter, QuadletFs,
    QuadletGenerator, ServiceManager,
};
use quadlet_cli::domain::{DirProbe, JobResult, PrivilegeMode, QuadletError, UnitStatus};
use quadlet_cli::infra::fs::LocalFs;

// ── Service manager ───────────────────────────────────────────────────────────

/// Unit table keyed by service name. Unknown units report `not-found`.
pub struct MockServiceManager {
    pub units: Mutex<HashMap<String, UnitStatus>>,
    pub calls: Mutex<Vec<String>>,
    pub connect_fails: bool,
    pub reload_fails: bool,
    pub stop_result: JobResult,
}

impl Default for MockServiceManager {
    fn default() -> Self {
        Self {
            units: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            connect_fails: false,
            reload_fails: false,
            stop_result: JobResult::Done,
        }
    }
}

impl MockServiceManager {
    /// Register `service` as loaded with the given active/sub state.
    pub fn with_unit(self, service: &str, active: &str, sub: &str) -> Self {
        self.units.lock().expect("lock").insert(
            service.to_string(),
            UnitStatus {
                name: service.to_string(),
                load_state: "loaded".to_string(),
                active_state: active.to_string(),
                sub_state: sub.to_string(),
            },
        );
        self
    }

    /// Every call in order: `connect`, `list:<n>`, `stop:<unit>`, `reload`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn active_state(&self, service: &str) -> Option<String> {
        self.units
            .lock()
            .expect("lock")
            .get(service)
            .map(|u| u.active_state.clone())
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("lock").push(call);
    }
}

impl ServiceManager for MockServiceManager {
    async fn connect(&self) -> Result<(), QuadletError> {
        self.record("connect".to_string());
        if self.connect_fails {
            return Err(QuadletError::ServiceManagerConnect("bus unavailable".to_string()));
        }
        Ok(())
    }

    async fn list_units_by_names(&self, names: &[String]) -> Result<Vec<UnitStatus>, QuadletError> {
        self.record(format!("list:{}", names.len()));
        let units = self.units.lock().expect("lock");
        Ok(names
            .iter()
            .map(|name| {
                units.get(name).cloned().unwrap_or_else(|| UnitStatus {
                    name: name.clone(),
                    load_state: "not-found".to_string(),
                    active_state: "inactive".to_string(),
                    sub_state: "dead".to_string(),
                })
            })
            .collect())
    }

    async fn stop_unit(&self, unit: &str, _timeout: Duration) -> Result<JobResult, QuadletError> {
        self.record(format!("stop:{unit}"));
        if self.stop_result.is_stopped() {
            if let Some(status) = self.units.lock().expect("lock").get_mut(unit) {
                status.active_state = "inactive".to_string();
                status.sub_state = "dead".to_string();
            }
        }
        Ok(self.stop_result.clone())
    }

    async fn reload(&self) -> Result<(), QuadletError> {
        self.record("reload".to_string());
        if self.reload_fails {
            return Err(QuadletError::ReloadFailed("reload refused".to_string()));
        }
        Ok(())
    }
}

// ── Generator ─────────────────────────────────────────────────────────────────

pub struct MockGenerator {
    pub available: bool,
    pub valid: bool,
    /// Search directories passed to each `validate` call.
    pub validated: Mutex<Vec<Vec<PathBuf>>>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self {
            available: true,
            valid: true,
            validated: Mutex::new(Vec::new()),
        }
    }
}

impl MockGenerator {
    pub fn validations(&self) -> usize {
        self.validated.lock().expect("lock").len()
    }

    pub fn validated_dirs(&self) -> Vec<Vec<PathBuf>> {
        self.validated.lock().expect("lock").clone()
    }
}

impl QuadletGenerator for MockGenerator {
    async fn ensure_available(&self) -> Result<(), QuadletError> {
        if self.available {
            Ok(())
        } else {
            Err(QuadletError::GeneratorUnavailable("not installed".to_string()))
        }
    }

    async fn validate(
        &self,
        _mode: PrivilegeMode,
        search_dirs: &[PathBuf],
    ) -> Result<(), QuadletError> {
        self.validated.lock().expect("lock").push(search_dirs.to_vec());
        if self.valid {
            Ok(())
        } else {
            Err(QuadletError::ValidationFailed("unsupported key Foo".to_string()))
        }
    }
}

// ── Artifact store ────────────────────────────────────────────────────────────

/// Serves one artifact per name, each a list of `(file name, contents)`.
#[derive(Default)]
pub struct MockArtifactStore {
    pub artifacts: HashMap<String, Vec<(String, String)>>,
}

impl MockArtifactStore {
    pub fn with_artifact(mut self, name: &str, layers: &[(&str, &str)]) -> Self {
        self.artifacts.insert(
            name.to_string(),
            layers
                .iter()
                .map(|(n, c)| ((*n).to_string(), (*c).to_string()))
                .collect(),
        );
        self
    }
}

impl ArtifactStore for MockArtifactStore {
    async fn extract_layers(&self, name: &str) -> Result<ExtractedArtifact, QuadletError> {
        let Some(layers) = self.artifacts.get(name) else {
            return Err(QuadletError::Fetch {
                reference: name.to_string(),
                reason: "artifact not found".to_string(),
            });
        };
        let dir = tempfile::tempdir().expect("staging dir");
        let layers = layers
            .iter()
            .map(|(file_name, contents)| {
                let path = dir.path().join(file_name);
                std::fs::write(&path, contents).expect("write layer");
                ArtifactLayer {
                    file_name: file_name.clone(),
                    path,
                }
            })
            .collect();
        Ok(ExtractedArtifact {
            layers,
            guard: Arc::new(dir),
        })
    }
}

// ── Filesystem ────────────────────────────────────────────────────────────────

/// `LocalFs` with injected faults.
#[derive(Default)]
pub struct FaultyFs {
    /// Names listed (and reported as existing) in every readable directory
    /// although no such file is on disk: files deleted by someone else
    /// after they were found.
    pub phantom: Vec<String>,
    /// Error returned by every `remove_file` call; the file is left alone.
    pub remove_error: Option<ErrorKind>,
}

impl FaultyFs {
    fn is_phantom(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|n| self.phantom.iter().any(|p| n == p.as_str()))
    }
}

impl QuadletFs for FaultyFs {
    fn probe_dir(&self, dir: &Path) -> DirProbe {
        LocalFs.probe_dir(dir)
    }

    fn create_dir_all(&self, dir: &Path) -> std::io::Result<()> {
        LocalFs.create_dir_all(dir)
    }

    fn list_files(&self, dir: &Path) -> std::io::Result<Vec<String>> {
        let mut names = LocalFs.list_files(dir)?;
        names.extend(self.phantom.iter().cloned());
        names.sort();
        Ok(names)
    }

    fn exists(&self, path: &Path) -> std::io::Result<bool> {
        if self.is_phantom(path) && path.parent().is_some_and(Path::is_dir) {
            return Ok(true);
        }
        LocalFs.exists(path)
    }

    fn is_file(&self, path: &Path) -> std::io::Result<bool> {
        LocalFs.is_file(path)
    }

    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        LocalFs.read(path)
    }

    fn write_new(&self, path: &Path, contents: &[u8]) -> std::io::Result<()> {
        LocalFs.write_new(path, contents)
    }

    fn remove_file(&self, path: &Path) -> std::io::Result<()> {
        match self.remove_error {
            Some(kind) => Err(kind.into()),
            None => LocalFs.remove_file(path),
        }
    }
}

// ── Reporter ──────────────────────────────────────────────────────────────────

pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}
