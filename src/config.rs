//! Runtime configuration.
//!
//! All knobs are collected into one [`Config`] built at process start from
//! CLI flags (with environment fallbacks, handled by clap) and passed by
//! reference into each component's constructor. No component reads ambient
//! global state after startup.

use std::path::{Path, PathBuf};

use crate::constants::RECIPE_RELATIVE_PATH;

/// Immutable configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base page scanned for the stable release link
    pub upstream_url: String,
    /// Location of the persisted version record
    pub version_file: PathBuf,
    /// Where downloaded artifacts are placed
    pub staging_dir: PathBuf,
    /// Local tap clone used for checkout, branch, and push
    pub tap_path: PathBuf,
}

impl Config {
    /// Build a config, tilde-expanding the tap path.
    pub fn new(
        upstream_url: impl Into<String>,
        version_file: impl Into<PathBuf>,
        staging_dir: impl Into<PathBuf>,
        tap_path: &str,
    ) -> Self {
        Self {
            upstream_url: upstream_url.into(),
            version_file: version_file.into(),
            staging_dir: staging_dir.into(),
            tap_path: PathBuf::from(shellexpand::tilde(tap_path).into_owned()),
        }
    }

    /// Full path of the formula file inside the tap clone.
    pub fn recipe_path(&self) -> PathBuf {
        self.tap_path.join(RECIPE_RELATIVE_PATH)
    }

    /// The tap clone root.
    pub fn tap_path(&self) -> &Path {
        &self.tap_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_path_is_inside_the_tap() {
        let config = Config::new("http://geoserver.org/", "version.yml", "/tmp", "/opt/tap");
        assert_eq!(
            config.recipe_path(),
            PathBuf::from("/opt/tap/Library/Formula/geoserver.rb")
        );
    }

    #[test]
    fn test_tap_path_tilde_expansion() {
        let config = Config::new("http://geoserver.org/", "version.yml", "/tmp", "~/tap");
        assert!(!config.tap_path.to_string_lossy().starts_with('~'));
        assert!(config.tap_path.to_string_lossy().ends_with("/tap"));
    }
}
