//! The `run` subcommand: one full pipeline execution.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::ConfigArgs;
use crate::discovery::{HttpWebClient, ReleaseDiscovery};
use crate::fetcher::{ArtifactFetcher, HttpFileFetcher};
use crate::git::GitPublisher;
use crate::pipeline::{PublishPipeline, PublishResult};
use crate::version::VersionStore;

/// Execute the release-tracking pipeline once.
#[derive(Args)]
pub struct RunCommand {
    #[command(flatten)]
    config: ConfigArgs,
}

impl RunCommand {
    /// Build the production collaborators and run the pipeline.
    pub async fn execute(self) -> Result<()> {
        let config = self.config.into_config();

        let pipeline = PublishPipeline::new(
            VersionStore::new(config.version_file.clone()),
            ReleaseDiscovery::new(HttpWebClient::new(), config.upstream_url.clone()),
            ArtifactFetcher::new(HttpFileFetcher::new(), config.staging_dir.clone()),
            GitPublisher::new(config.tap_path()),
            config.recipe_path(),
        );

        match pipeline.execute().await? {
            PublishResult::Updated { version } => {
                println!("{} geoserver {version}", "Published".green().bold());
            }
            PublishResult::NoOp { current } => {
                println!("No update available; local version {current} is current");
            }
        }

        Ok(())
    }
}
