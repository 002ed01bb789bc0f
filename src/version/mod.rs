//! The persisted version record and semantic version comparison.
//!
//! The record is a single-key YAML mapping, `version: "2.21.1"`, owned
//! exclusively by [`VersionStore`]. It is read once at pipeline start and
//! rewritten at most once per successful publish cycle. Writes go through
//! an atomic write-then-rename so a crash never leaves a half-written
//! record behind.

pub mod comparison;

use anyhow::Result;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::core::TapwatchError;
use crate::utils::fs::atomic_write;

/// On-disk shape of the version record.
#[derive(Debug, Serialize, Deserialize)]
struct VersionRecord {
    version: String,
}

/// Reads and writes the single persisted version record.
pub struct VersionStore {
    path: PathBuf,
}

impl VersionStore {
    /// Create a store over the record at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the recorded version.
    ///
    /// # Errors
    ///
    /// A missing record yields [`TapwatchError::VersionRecordMissing`]; a
    /// record that is not valid YAML, lacks the `version` key, or carries an
    /// unparseable version yields [`TapwatchError::VersionRecordInvalid`].
    /// No default is ever assumed.
    pub fn load(&self) -> Result<Version> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TapwatchError::VersionRecordMissing {
                    path: self.path.display().to_string(),
                }
                .into());
            }
            Err(e) => return Err(e.into()),
        };

        let record: VersionRecord =
            serde_yaml::from_str(&raw).map_err(|e| TapwatchError::VersionRecordInvalid {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;

        let version = comparison::parse_lenient(&record.version).map_err(|e| {
            TapwatchError::VersionRecordInvalid {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        debug!(target: "store", %version, path = %self.path.display(), "loaded version record");
        Ok(version)
    }

    /// Replace the recorded version.
    ///
    /// The write is atomic from the caller's perspective: either the full
    /// record lands or the prior record remains.
    pub fn save(&self, version: &Version) -> Result<()> {
        let record = VersionRecord {
            version: version.to_string(),
        };
        let yaml = serde_yaml::to_string(&record)?;
        atomic_write(&self.path, yaml.as_bytes())?;
        debug!(target: "store", %version, path = %self.path.display(), "saved version record");
        Ok(())
    }
}
