//! Artifact retrieval and checksum computation.
//!
//! The fetcher downloads the release archive for a version into the staging
//! directory and computes a SHA-256 digest over the bytes on disk. The
//! transport is behind the [`FileFetcher`] capability; [`HttpFileFetcher`]
//! is the production implementation.
//!
//! Staging is deterministic: the archive for version `2.21.2` always lands
//! at `{staging_dir}/geoserver-2.21.2-bin.zip`. Downloads stream into a
//! `.part` sibling that is renamed into place on completion, so a file at
//! the staging path is always complete and a later run can reuse it. The
//! checksum is recomputed from disk every run, never trusted across runs.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use semver::Version;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::constants::{download_url, staging_file_name};
use crate::core::TapwatchError;
use crate::utils::fs::ensure_dir;

/// A downloaded, locally verified release archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseArtifact {
    /// The release version the archive belongs to
    pub version: Version,
    /// Where the archive sits in the staging directory
    pub local_path: PathBuf,
    /// SHA-256 of the archive bytes, 64 lowercase hex characters
    pub checksum: String,
}

/// Capability for downloading a URL to a local file.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    /// Download `url` into `dest`, returning the number of bytes written.
    async fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// Production [`FileFetcher`] backed by reqwest.
pub struct HttpFileFetcher {
    client: reqwest::Client,
}

impl HttpFileFetcher {
    /// Create a fetcher with default transport settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFileFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileFetcher for HttpFileFetcher {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let response = self.client.get(url).send().await.map_err(|e| {
            TapwatchError::ArtifactRequestFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TapwatchError::ArtifactHttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        // Stream into a .part sibling, then rename, so an interrupted
        // download never leaves a partial file at the final path.
        let part_path = dest.with_file_name(format!(
            "{}.part",
            dest.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "artifact".to_string())
        ));

        let mut file = tokio::fs::File::create(&part_path)
            .await
            .with_context(|| format!("Failed to create staging file: {}", part_path.display()))?;

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| TapwatchError::ArtifactRequestFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
            file.write_all(&chunk)
                .await
                .with_context(|| format!("Failed to write to: {}", part_path.display()))?;
            written += chunk.len() as u64;
        }

        file.sync_all()
            .await
            .context("Failed to sync staging file to disk")?;
        drop(file);

        tokio::fs::rename(&part_path, dest)
            .await
            .with_context(|| format!("Failed to move staging file to: {}", dest.display()))?;

        debug!(target: "fetcher", url, bytes = written, "download complete");
        Ok(written)
    }
}

/// Compute the SHA-256 digest of a file as 64 lowercase hex characters.
pub async fn compute_sha256(path: &Path) -> Result<String> {
    let contents = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let mut hasher = Sha256::new();
    hasher.update(&contents);
    Ok(hex::encode(hasher.finalize()))
}

/// Downloads release archives into the staging directory and verifies them.
pub struct ArtifactFetcher<F> {
    fetcher: F,
    staging_dir: PathBuf,
}

impl<F: FileFetcher> ArtifactFetcher<F> {
    /// Create a fetcher staging files under `staging_dir`.
    pub fn new(fetcher: F, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            staging_dir: staging_dir.into(),
        }
    }

    /// Download the archive for `version` and compute its checksum.
    ///
    /// A non-empty file already sitting at the deterministic staging path is
    /// reused instead of re-downloaded; its checksum is still recomputed
    /// from the bytes on disk.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-success HTTP status, or a zero-byte
    /// result.
    pub async fn fetch(&self, version: &Version) -> Result<ReleaseArtifact> {
        ensure_dir(&self.staging_dir)?;

        let url = download_url(version);
        let dest = self.staging_dir.join(staging_file_name(version));

        let staged = matches!(tokio::fs::metadata(&dest).await, Ok(m) if m.len() > 0);
        if staged {
            info!(target: "fetcher", path = %dest.display(), "reusing staged artifact");
        } else {
            info!(target: "fetcher", url = %url, "downloading artifact");
            self.fetcher.download(&url, &dest).await?;
        }

        let size = tokio::fs::metadata(&dest)
            .await
            .with_context(|| format!("Staged artifact missing: {}", dest.display()))?
            .len();
        if size == 0 {
            return Err(TapwatchError::ArtifactEmpty {
                path: dest.display().to_string(),
            }
            .into());
        }

        let checksum = compute_sha256(&dest).await?;
        debug!(target: "fetcher", %checksum, bytes = size, "artifact checksum computed");

        Ok(ReleaseArtifact {
            version: version.clone(),
            local_path: dest,
            checksum,
        })
    }
}
