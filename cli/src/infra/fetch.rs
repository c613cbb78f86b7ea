//! `SourceFetcher` adapter: local paths, HTTP(S) downloads and artifacts.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::application::ports::{ArtifactStore, FetchedSource, SourceFetcher};
use crate::domain::error::QuadletError;
use crate::domain::source::{SourceRef, url_file_name};

/// Resolves source references into local files.
pub struct DefaultSourceFetcher<A> {
    artifacts: A,
    http_timeout: Duration,
    /// Where downloads are staged; the system temp dir when `None`.
    staging_dir: Option<PathBuf>,
}

impl<A: ArtifactStore> DefaultSourceFetcher<A> {
    #[must_use]
    pub fn new(artifacts: A, http_timeout: Duration) -> Self {
        Self {
            artifacts,
            http_timeout,
            staging_dir: None,
        }
    }

    /// Stage downloads in `dir` instead of the system temp dir.
    #[must_use]
    pub fn with_staging_dir(mut self, dir: PathBuf) -> Self {
        self.staging_dir = Some(dir);
        self
    }
}

impl<A: ArtifactStore> SourceFetcher for DefaultSourceFetcher<A> {
    async fn fetch(&self, source: &SourceRef) -> Result<Vec<FetchedSource>, QuadletError> {
        let key = source.to_string();
        match source {
            SourceRef::Local(path) => Ok(vec![FetchedSource {
                key,
                path: path.clone(),
                suggested_name: None,
                guard: None,
            }]),
            SourceRef::Http(url) => {
                let name = url_file_name(url).ok_or_else(|| QuadletError::Fetch {
                    reference: url.clone(),
                    reason: "URL has no file name to install as".to_string(),
                })?;
                let file =
                    download(url.clone(), self.http_timeout, self.staging_dir.clone()).await?;
                Ok(vec![FetchedSource {
                    key,
                    path: file.to_path_buf(),
                    suggested_name: Some(name),
                    guard: Some(Arc::new(file)),
                }])
            }
            SourceRef::Artifact(name) => {
                let extracted = self.artifacts.extract_layers(name).await?;
                Ok(extracted
                    .layers
                    .into_iter()
                    .map(|layer| FetchedSource {
                        key: format!("{key}#{}", layer.file_name),
                        path: layer.path,
                        suggested_name: Some(layer.file_name),
                        guard: Some(Arc::clone(&extracted.guard)),
                    })
                    .collect())
            }
        }
    }
}

/// Download `url` into a temporary file that is deleted when dropped.
async fn download(
    url: String,
    timeout: Duration,
    staging_dir: Option<PathBuf>,
) -> Result<tempfile::TempPath, QuadletError> {
    let reference = url.clone();
    tokio::task::spawn_blocking(move || -> Result<tempfile::TempPath, QuadletError> {
        let fetch_err = |reason: String| QuadletError::Fetch {
            reference: url.clone(),
            reason,
        };
        debug!(url = %url, "downloading quadlet");

        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        let response = agent.get(&url).call().map_err(|e| fetch_err(e.to_string()))?;

        let mut builder = tempfile::Builder::new();
        builder.prefix("quadlet-dl");
        let file = match &staging_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        let mut file = file.map_err(|e| fetch_err(format!("creating temporary file: {e}")))?;
        std::io::copy(&mut response.into_reader(), file.as_file_mut())
            .map_err(|e| fetch_err(format!("writing download: {e}")))?;
        Ok(file.into_temp_path())
    })
    .await
    .map_err(|e| QuadletError::Fetch {
        reference,
        reason: format!("download task failed: {e}"),
    })?
}
