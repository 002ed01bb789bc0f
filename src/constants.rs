//! Package identity and operational constants used across the tapwatch
//! codebase.
//!
//! Everything that ties the tool to the tracked package lives here: the
//! upstream site, the release link pattern, the artifact URL template, and
//! the location of the formula inside the tap. Defining them centrally keeps
//! the rest of the code free of magic strings.

use semver::Version;
use std::time::Duration;

/// Name of the tracked package, used in staging file names and log output.
pub const PACKAGE_NAME: &str = "geoserver";

/// Upstream landing page scanned for the stable release link.
pub const UPSTREAM_URL: &str = "http://geoserver.org/";

/// Href path of the stable release link on the upstream landing page.
pub const STABLE_RELEASE_PATH: &str = "/release/stable";

/// Artifact URL template, parameterized only by version.
pub const DOWNLOAD_URL_TEMPLATE: &str =
    "https://downloads.sourceforge.net/project/geoserver/GeoServer/{version}/geoserver-{version}-bin.zip";

/// Location of the generated formula relative to the tap clone root.
pub const RECIPE_RELATIVE_PATH: &str = "Library/Formula/geoserver.rb";

/// Default path of the persisted version record.
pub const DEFAULT_VERSION_FILE: &str = "version.yml";

/// Default staging directory for downloaded artifacts.
pub const DEFAULT_STAGING_DIR: &str = "/tmp";

/// Default tap clone location, tilde-expanded at startup.
pub const DEFAULT_TAP_PATH: &str = "~/projects/homebrew";

/// Primary branch of the tap clone, kept in sync before branching.
pub const PRIMARY_BRANCH: &str = "master";

/// Remote the primary branch is fast-forwarded from.
pub const UPSTREAM_REMOTE: &str = "upstream";

/// Remote the release branch is pushed to.
pub const ORIGIN_REMOTE: &str = "origin";

/// Default timeout for git operations.
pub const GIT_COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

/// Timeout for fast-forwarding the primary branch.
///
/// Pulls hit the network and can stall on a dead connection, so they get a
/// tighter bound than local operations.
pub const GIT_SYNC_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for pushing the release branch.
pub const GIT_PUSH_TIMEOUT: Duration = Duration::from_secs(120);

/// Expands the artifact URL template for a concrete version.
pub fn download_url(version: &Version) -> String {
    DOWNLOAD_URL_TEMPLATE.replace("{version}", &version.to_string())
}

/// Deterministic staging file name for a version.
pub fn staging_file_name(version: &Version) -> String {
    format!("{PACKAGE_NAME}-{version}-bin.zip")
}
