//! Command-line interface for tapwatch.
//!
//! Two subcommands cover the whole tool:
//! - `run` executes the full pipeline and publishes when a newer upstream
//!   release exists
//! - `check` performs discovery and comparison only, with no side effects
//!
//! Global `--verbose` / `--quiet` flags control tracing verbosity; an
//! explicit `RUST_LOG` always wins.

mod check;
mod run;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::constants;

/// Configuration flags shared by every subcommand.
///
/// Each flag falls back to an environment variable and then to the built-in
/// default, so a scheduler can configure the tool entirely through its
/// environment.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Upstream page scanned for the stable release link
    #[arg(long, env = "TAPWATCH_UPSTREAM_URL", default_value = constants::UPSTREAM_URL)]
    upstream_url: String,

    /// Path of the persisted version record
    #[arg(long, env = "TAPWATCH_VERSION_FILE", default_value = constants::DEFAULT_VERSION_FILE)]
    version_file: PathBuf,

    /// Directory downloaded artifacts are staged in
    #[arg(long, env = "TAPWATCH_STAGING_DIR", default_value = constants::DEFAULT_STAGING_DIR)]
    staging_dir: PathBuf,

    /// Local tap clone used for checkout, branch, and push
    #[arg(long, env = "TAPWATCH_TAP_PATH", default_value = constants::DEFAULT_TAP_PATH)]
    tap_path: String,
}

impl ConfigArgs {
    /// Resolve the flags into an immutable [`Config`].
    pub fn into_config(self) -> Config {
        Config::new(
            self.upstream_url,
            self.version_file,
            self.staging_dir,
            &self.tap_path,
        )
    }
}

/// Top-level CLI definition.
#[derive(Parser)]
#[command(
    name = "tapwatch",
    about = "Tracks upstream GeoServer releases and publishes Homebrew formula updates",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors and the final status line
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: discover, compare, fetch, render, publish
    Run(run::RunCommand),

    /// Report whether a newer upstream release exists, with no side effects
    Check(check::CheckCommand),
}

impl Cli {
    /// Initialize logging and dispatch to the selected subcommand.
    pub async fn execute(self) -> Result<()> {
        init_tracing(self.verbose, self.quiet);

        match self.command {
            Commands::Run(cmd) => cmd.execute().await,
            Commands::Check(cmd) => cmd.execute().await,
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
