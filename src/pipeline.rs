//! The publish pipeline.
//!
//! One run walks a fixed sequence: load the local version record, discover
//! the remote version, compare, and either stop as a no-op or drive
//! fetch → render → persist → publish to completion. Each step's output is
//! the next step's input, so the pipeline is strictly sequential; any
//! failure aborts the remaining steps.
//!
//! Ordering rules the rest of the crate relies on:
//! - The local record loads before any network call, so a corrupt record
//!   fails the run without touching the upstream site.
//! - The record is advanced only after the artifact is fetched, its
//!   checksum computed, and the recipe rendered and written.
//! - The record is advanced before the VCS publish. When the publish then
//!   fails, the run surfaces [`TapwatchError::RecordedButUnpublished`]
//!   instead of a generic error, because the record and the tap now
//!   disagree and an operator has to resolve it.

use anyhow::{Context, Result};
use semver::Version;
use std::path::PathBuf;
use tracing::info;

use crate::core::TapwatchError;
use crate::discovery::{ReleaseDiscovery, WebClient};
use crate::fetcher::{ArtifactFetcher, FileFetcher};
use crate::git::VcsPublisher;
use crate::recipe;
use crate::utils::fs::atomic_write;
use crate::version::VersionStore;

/// Outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishResult {
    /// A newer release was found, published, and recorded.
    Updated {
        /// The version that was published
        version: Version,
    },
    /// The local record is already current; nothing was touched.
    NoOp {
        /// The recorded version
        current: Version,
    },
}

/// Orchestrates one release-tracking run.
pub struct PublishPipeline<W, F, P> {
    store: VersionStore,
    discovery: ReleaseDiscovery<W>,
    fetcher: ArtifactFetcher<F>,
    publisher: P,
    recipe_path: PathBuf,
}

impl<W, F, P> PublishPipeline<W, F, P>
where
    W: WebClient,
    F: FileFetcher,
    P: VcsPublisher,
{
    /// Assemble a pipeline from its collaborators.
    pub fn new(
        store: VersionStore,
        discovery: ReleaseDiscovery<W>,
        fetcher: ArtifactFetcher<F>,
        publisher: P,
        recipe_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            discovery,
            fetcher,
            publisher,
            recipe_path: recipe_path.into(),
        }
    }

    /// Run the pipeline to completion.
    pub async fn execute(&self) -> Result<PublishResult> {
        // The record must be readable before any network traffic happens.
        let local = self.store.load()?;

        let remote = self.discovery.latest_version().await?;
        info!(target: "pipeline", %local, %remote, "comparing versions");

        if remote <= local {
            info!(target: "pipeline", "local version is current, nothing to do");
            return Ok(PublishResult::NoOp { current: local });
        }

        info!(target: "pipeline", %remote, "new upstream release found");

        let artifact = self.fetcher.fetch(&remote).await?;
        info!(
            target: "pipeline",
            checksum = %artifact.checksum,
            path = %artifact.local_path.display(),
            "artifact staged and verified"
        );

        let rendered = recipe::render(&artifact)?;
        atomic_write(&self.recipe_path, rendered.as_bytes())
            .with_context(|| format!("Failed to write recipe to {}", self.recipe_path.display()))?;
        info!(target: "pipeline", path = %self.recipe_path.display(), "recipe regenerated");

        self.store.save(&remote)?;
        info!(target: "pipeline", %remote, "version record advanced");

        if let Err(e) = self.publish(&remote).await {
            return Err(TapwatchError::RecordedButUnpublished {
                version: remote.to_string(),
                reason: format!("{e:#}"),
            }
            .into());
        }

        Ok(PublishResult::Updated { version: remote })
    }

    async fn publish(&self, version: &Version) -> Result<()> {
        self.publisher.sync_primary_branch().await?;
        self.publisher
            .create_and_publish_branch(&version.to_string())
            .await
    }
}
