//! The `check` subcommand: discovery and comparison without side effects.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::ConfigArgs;
use crate::discovery::{HttpWebClient, ReleaseDiscovery};
use crate::version::VersionStore;

/// Report whether a newer upstream release exists, touching nothing.
#[derive(Args)]
pub struct CheckCommand {
    #[command(flatten)]
    config: ConfigArgs,
}

impl CheckCommand {
    /// Compare the recorded version against the latest upstream release.
    pub async fn execute(self) -> Result<()> {
        let config = self.config.into_config();

        let local = VersionStore::new(config.version_file.clone()).load()?;
        let remote = ReleaseDiscovery::new(HttpWebClient::new(), config.upstream_url.clone())
            .latest_version()
            .await?;

        if remote > local {
            println!(
                "{} {local} -> {remote}",
                "Update available:".yellow().bold()
            );
        } else {
            println!("Up to date ({local})");
        }

        Ok(())
    }
}
