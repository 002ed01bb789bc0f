//! Version-control publishing against the tap clone.
//!
//! The pipeline only depends on the [`VcsPublisher`] capability:
//! synchronize the primary branch, then create and push a branch named
//! after the release. [`GitPublisher`] implements it by shelling out to the
//! system git binary through [`command_builder::GitCommand`], the same way
//! Cargo drives git.
//!
//! Publishing is deliberately not idempotent. Re-running for an already
//! published version fails on branch creation, which is the guard against
//! double-publishing; that failure is terminal for the run.

pub mod command_builder;

use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::constants::{
    GIT_PUSH_TIMEOUT, GIT_SYNC_TIMEOUT, ORIGIN_REMOTE, PRIMARY_BRANCH, UPSTREAM_REMOTE,
};
use crate::core::TapwatchError;
use command_builder::GitCommand;

/// Capability for the branch-and-push side effect of a publish cycle.
#[async_trait]
pub trait VcsPublisher: Send + Sync {
    /// Switch the working copy to the primary branch and fast-forward it
    /// from the canonical upstream remote.
    async fn sync_primary_branch(&self) -> Result<()>;

    /// Create a branch named `name`, switch to it, and push it to the
    /// origin remote. Fails when the branch already exists.
    async fn create_and_publish_branch(&self, name: &str) -> Result<()>;
}

/// [`VcsPublisher`] over a local tap clone, using the system git binary.
pub struct GitPublisher {
    tap_path: PathBuf,
    primary_branch: String,
    upstream_remote: String,
    origin_remote: String,
}

impl GitPublisher {
    /// Create a publisher for the clone at `tap_path` with the default
    /// branch and remote names.
    pub fn new(tap_path: impl Into<PathBuf>) -> Self {
        Self {
            tap_path: tap_path.into(),
            primary_branch: PRIMARY_BRANCH.to_string(),
            upstream_remote: UPSTREAM_REMOTE.to_string(),
            origin_remote: ORIGIN_REMOTE.to_string(),
        }
    }

    /// Override the primary branch name.
    #[must_use]
    pub fn with_primary_branch(mut self, branch: impl Into<String>) -> Self {
        self.primary_branch = branch.into();
        self
    }

    /// Override the canonical upstream remote name.
    #[must_use]
    pub fn with_upstream_remote(mut self, remote: impl Into<String>) -> Self {
        self.upstream_remote = remote.into();
        self
    }

    /// Override the origin remote name.
    #[must_use]
    pub fn with_origin_remote(mut self, remote: impl Into<String>) -> Self {
        self.origin_remote = remote.into();
        self
    }
}

#[async_trait]
impl VcsPublisher for GitPublisher {
    async fn sync_primary_branch(&self) -> Result<()> {
        debug!(target: "git", branch = %self.primary_branch, "syncing primary branch");

        GitCommand::checkout(&self.primary_branch)
            .current_dir(&self.tap_path)
            .execute_success()
            .await?;

        GitCommand::pull_ff(&self.upstream_remote, &self.primary_branch)
            .current_dir(&self.tap_path)
            .with_timeout(GIT_SYNC_TIMEOUT)
            .execute_success()
            .await?;

        Ok(())
    }

    async fn create_and_publish_branch(&self, name: &str) -> Result<()> {
        if let Err(e) = GitCommand::create_branch(name)
            .current_dir(&self.tap_path)
            .execute_success()
            .await
        {
            if let Some(TapwatchError::GitCommandError { stderr, .. }) =
                e.downcast_ref::<TapwatchError>()
                && stderr.contains("already exists")
            {
                return Err(TapwatchError::BranchAlreadyExists {
                    branch: name.to_string(),
                }
                .into());
            }
            return Err(e);
        }

        GitCommand::push(&self.origin_remote, name)
            .current_dir(&self.tap_path)
            .with_timeout(GIT_PUSH_TIMEOUT)
            .execute_success()
            .await?;

        info!(target: "git", branch = name, remote = %self.origin_remote, "release branch pushed");
        Ok(())
    }
}
