//! tapwatch - upstream release tracker and Homebrew tap publisher.
//!
//! tapwatch watches the GeoServer project for new stable releases and keeps
//! a Homebrew tap current: when a newer version is published upstream it
//! downloads the release archive, computes its SHA-256 checksum,
//! regenerates the formula, advances a local YAML version record, and
//! pushes a release branch to the tap repository for review.
//!
//! # Pipeline
//!
//! ```text
//! 1. Load the local version record      (version store, before any network)
//! 2. Discover the latest remote version (landing page link scan)
//! 3. Compare semantically               (no-op when remote <= local)
//! 4. Download + checksum the artifact   (deterministic staging path)
//! 5. Regenerate the formula             (byte-stable template render)
//! 6. Advance the version record         (atomic write)
//! 7. Branch and push the tap clone      (system git)
//! ```
//!
//! Any failure aborts the run; nothing is retried and no defaults are
//! substituted. The external scheduler decides when to run again, and
//! deterministic staging plus the branch-already-exists failure keep
//! repeated runs cheap and single-shot.
//!
//! # Core Modules
//!
//! - [`pipeline`] - orchestration and the publish state machine
//! - [`discovery`] - upstream page scan and version extraction
//! - [`fetcher`] - artifact download and SHA-256 verification
//! - [`recipe`] - formula rendering
//! - [`version`] - persisted version record and semantic comparison
//! - [`git`] - branch-and-push publishing over the system git binary
//!
//! # Supporting Modules
//!
//! - [`cli`] - command-line interface (`run`, `check`)
//! - [`config`] - explicit runtime configuration
//! - [`constants`] - package identity, URL templates, timeouts
//! - [`core`] - error types and operator-facing error display
//! - [`utils`] - atomic file writes
//!
//! # Usage
//!
//! ```bash
//! # Publish an update if one exists
//! tapwatch run
//!
//! # Only report whether an update exists
//! tapwatch check
//!
//! # Point at a different tap clone and record
//! tapwatch run --tap-path ~/src/homebrew --version-file /var/lib/tapwatch/version.yml
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod discovery;
pub mod fetcher;
pub mod git;
pub mod pipeline;
pub mod recipe;
pub mod utils;
pub mod version;
