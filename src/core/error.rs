//! Error handling for tapwatch.
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** for precise handling in code
//! 2. **User-friendly messages** with actionable suggestions for operators
//!
//! It consists of two main types:
//! - [`TapwatchError`] - enumerated error types for every failure the
//!   pipeline can hit, grouped by stage (discovery, store, fetch, render,
//!   publish)
//! - [`ErrorContext`] - a wrapper that adds suggestions and details for
//!   terminal display
//!
//! Every error aborts the run. Nothing is retried or substituted with a
//! default; retries belong to the external scheduler re-invoking the whole
//! pipeline. A publish failure that happens after the version record was
//! already advanced is its own variant,
//! [`TapwatchError::RecordedButUnpublished`], so the operator sees the
//! inconsistency instead of a generic git error.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for tapwatch operations.
///
/// Variants carry the context needed to tell the operator which pipeline
/// step failed and why. Standard library and ecosystem errors that appear at
/// module seams are converted automatically:
/// - [`std::io::Error`] → [`TapwatchError::IoError`]
/// - [`semver::Error`] → [`TapwatchError::SemverError`]
#[derive(Error, Debug)]
pub enum TapwatchError {
    /// The upstream landing page could not be retrieved.
    #[error("Failed to fetch upstream page {url}: {reason}")]
    PageFetchFailed {
        /// URL of the page that could not be fetched
        url: String,
        /// Transport-level reason for the failure
        reason: String,
    },

    /// The landing page was retrieved but carries no stable release link.
    #[error("No stable release link found on {url}")]
    ReleaseLinkNotFound {
        /// URL of the page that was scanned
        url: String,
    },

    /// A stable release link was found but no version could be parsed out
    /// of it.
    #[error("Could not parse a version from release link '{link}': {reason}")]
    VersionTokenUnparseable {
        /// The link text or href the parse was attempted on
        link: String,
        /// Why parsing failed
        reason: String,
    },

    /// The persisted version record does not exist.
    #[error("Version record not found: {path}")]
    VersionRecordMissing {
        /// Expected location of the record
        path: String,
    },

    /// The persisted version record exists but cannot be understood.
    #[error("Invalid version record in {path}: {reason}")]
    VersionRecordInvalid {
        /// Location of the record
        path: String,
        /// Why the record could not be parsed
        reason: String,
    },

    /// The artifact download failed at the transport level.
    #[error("Failed to download artifact from {url}: {reason}")]
    ArtifactRequestFailed {
        /// Artifact URL
        url: String,
        /// Transport-level reason for the failure
        reason: String,
    },

    /// The artifact download completed with a non-success HTTP status.
    ///
    /// A changed upstream naming scheme shows up here as a 404.
    #[error("Artifact download from {url} returned HTTP {status}")]
    ArtifactHttpStatus {
        /// Artifact URL
        url: String,
        /// HTTP status code returned by the server
        status: u16,
    },

    /// The downloaded artifact has zero bytes.
    #[error("Downloaded artifact is empty: {path}")]
    ArtifactEmpty {
        /// Staging path of the empty file
        path: String,
    },

    /// The formula template failed to render.
    ///
    /// The template is a constant, so this is a programming error rather
    /// than an operational one.
    #[error("Failed to render recipe: {reason}")]
    RecipeRenderFailed {
        /// Template engine error text
        reason: String,
    },

    /// Git executable not found in PATH.
    #[error("Git is not installed or not found in PATH")]
    GitNotFound,

    /// A git command returned a non-zero exit code.
    #[error("Git operation failed: {operation}")]
    GitCommandError {
        /// The git operation that failed (e.g. "checkout", "push")
        operation: String,
        /// Error output from the git command
        stderr: String,
    },

    /// The release branch already exists in the tap clone.
    ///
    /// Publishing is not idempotent. A second run for the same version is
    /// expected to land here and must be resolved by the operator, not
    /// retried.
    #[error("Release branch '{branch}' already exists")]
    BranchAlreadyExists {
        /// Name of the colliding branch
        branch: String,
    },

    /// The version record was advanced but the publish step failed.
    ///
    /// The record now points at a version that has no pushed branch. This
    /// inconsistency needs manual resolution: either push the branch by
    /// hand or reset the record.
    #[error("Version {version} recorded but publish failed: {reason}")]
    RecordedButUnpublished {
        /// The version the record was advanced to
        version: String,
        /// The underlying publish failure
        reason: String,
    },

    /// IO error wrapper
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Semantic version parsing error wrapper
    #[error("Invalid semantic version: {0}")]
    SemverError(#[from] semver::Error),
}

/// Wrapper that pairs an error with a suggestion and details for display.
///
/// Suggestions tell the operator what to do next; details explain what the
/// tool was attempting. Both are optional.
pub struct ErrorContext {
    /// The underlying error
    pub error: anyhow::Error,
    /// Actionable next step, shown after the error message
    pub suggestion: Option<String>,
    /// Extra context about what was being attempted
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap an error with no suggestion or details.
    pub fn new(error: impl Into<anyhow::Error>) -> Self {
        Self {
            error: error.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Attach an actionable suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach explanatory details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{} {:#}", "Error:".red().bold(), self.error);
        if let Some(ref details) = self.details {
            eprintln!("\n{} {details}", "Details:".yellow());
        }
        if let Some(ref suggestion) = self.suggestion {
            eprintln!("\n{} {suggestion}", "Suggestion:".green());
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.error)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {details}")?;
        }
        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }
        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] with stage-appropriate
/// suggestions.
///
/// Known [`TapwatchError`] variants get targeted guidance; everything else
/// passes through unchanged.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let mut suggestion: Option<String> = None;
    let mut details: Option<String> = None;

    match error.downcast_ref::<TapwatchError>() {
        Some(TapwatchError::GitNotFound) => {
            suggestion =
                Some("Install git from https://git-scm.com/ or via your package manager".into());
        }
        Some(TapwatchError::BranchAlreadyExists { branch }) => {
            suggestion = Some(format!(
                "Branch '{branch}' was already published. Delete it from the tap clone and the origin remote if this release needs to be republished"
            ));
        }
        Some(TapwatchError::RecordedButUnpublished { version, .. }) => {
            details = Some(format!(
                "The version record already points at {version}, but no release branch was pushed"
            ));
            suggestion = Some(
                "Push the release branch manually, or reset the version record before re-running"
                    .into(),
            );
        }
        Some(TapwatchError::VersionRecordMissing { path }) => {
            suggestion = Some(format!(
                "Create {path} containing the currently published version, e.g. `version: \"2.21.1\"`"
            ));
        }
        Some(TapwatchError::PageFetchFailed { .. })
        | Some(TapwatchError::ArtifactRequestFailed { .. }) => {
            suggestion = Some(
                "Check network connectivity and that the upstream site is reachable".into(),
            );
        }
        Some(TapwatchError::ArtifactHttpStatus { status: 404, .. }) => {
            details =
                Some("A 404 usually means the upstream artifact naming scheme changed".into());
        }
        _ => {}
    }

    let mut context = ErrorContext::new(error);
    context.suggestion = suggestion;
    context.details = details;
    context
}
