//! `ArtifactStore` adapter backed by `podman artifact extract`.

use std::sync::Arc;

use tracing::debug;

use crate::application::ports::{ArtifactLayer, ArtifactStore, CommandRunner, ExtractedArtifact};
use crate::domain::error::QuadletError;
use crate::infra::command_runner::failure_message;

/// Extracts artifacts from Podman's local artifact store.
pub struct PodmanArtifactStore<R> {
    runner: R,
}

impl<R: CommandRunner> PodmanArtifactStore<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> ArtifactStore for PodmanArtifactStore<R> {
    async fn extract_layers(&self, name: &str) -> Result<ExtractedArtifact, QuadletError> {
        let fetch_err = |reason: String| QuadletError::Fetch {
            reference: name.to_string(),
            reason,
        };

        let staging = tempfile::Builder::new()
            .prefix("quadlet-artifact")
            .tempdir()
            .map_err(|e| fetch_err(format!("creating staging directory: {e}")))?;
        let dest = staging.path().to_string_lossy().into_owned();

        let output = self
            .runner
            .run("podman", &["artifact", "extract", name, &dest])
            .await
            .map_err(|e| fetch_err(format!("{e:#}")))?;
        if !output.status.success() {
            return Err(fetch_err(failure_message(&output)));
        }

        let mut layers = Vec::new();
        let entries = std::fs::read_dir(staging.path())
            .map_err(|e| fetch_err(format!("reading extracted layers: {e}")))?;
        for entry in entries {
            let entry = entry.map_err(|e| fetch_err(format!("reading extracted layers: {e}")))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            debug!(artifact = name, layer = %file_name, "extracted artifact layer");
            layers.push(ArtifactLayer { file_name, path });
        }
        layers.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        Ok(ExtractedArtifact {
            layers,
            guard: Arc::new(staging),
        })
    }
}
