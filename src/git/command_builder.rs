//! Type-safe builder for executing git commands.
//!
//! Every git operation in tapwatch goes through [`GitCommand`], which
//! handles working-directory selection via `-C`, timeout enforcement,
//! output capture, and consistent error mapping. The working copy is a
//! pre-existing tap clone; nothing here creates repositories.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::GIT_COMMAND_TIMEOUT;
use crate::core::TapwatchError;

/// Builder for a single git invocation.
///
/// Commands are created with output capture enabled and a default timeout
/// of five minutes. The working directory is passed to git with `-C` so
/// execution is independent of the process's own current directory.
pub struct GitCommand {
    args: Vec<String>,
    current_dir: Option<std::path::PathBuf>,
    timeout_duration: Duration,
}

impl Default for GitCommand {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            current_dir: None,
            timeout_duration: GIT_COMMAND_TIMEOUT,
        }
    }
}

impl GitCommand {
    /// Create an empty command with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the working directory for the invocation.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Append arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Override the timeout.
    pub const fn with_timeout(mut self, duration: Duration) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Execute the command and return its captured output.
    ///
    /// # Errors
    ///
    /// A missing git binary yields [`TapwatchError::GitNotFound`]; a
    /// timeout or non-zero exit yields [`TapwatchError::GitCommandError`]
    /// with the operation name and stderr.
    pub async fn execute(self) -> Result<GitOutput> {
        let mut full_args = Vec::new();
        if let Some(ref dir) = self.current_dir {
            full_args.push("-C".to_string());
            full_args.push(dir.display().to_string());
        }
        full_args.extend(self.args.clone());

        let operation = self
            .args
            .first()
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());

        tracing::debug!(target: "git", "Executing command: git {}", full_args.join(" "));

        let mut cmd = Command::new("git");
        cmd.args(&full_args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match timeout(self.timeout_duration, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TapwatchError::GitNotFound.into());
            }
            Ok(Err(e)) => {
                return Err(e).context(format!("Failed to execute git {}", full_args.join(" ")));
            }
            Err(_) => {
                tracing::warn!(
                    target: "git",
                    "Command timed out after {} seconds: git {}",
                    self.timeout_duration.as_secs(),
                    full_args.join(" ")
                );
                return Err(TapwatchError::GitCommandError {
                    operation,
                    stderr: format!(
                        "git command timed out after {} seconds",
                        self.timeout_duration.as_secs()
                    ),
                }
                .into());
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "git",
                "Command failed with exit code {:?}: {}",
                output.status.code(),
                stderr.trim()
            );
            return Err(TapwatchError::GitCommandError {
                operation,
                stderr: if stderr.is_empty() { stdout } else { stderr },
            }
            .into());
        }

        if !stderr.is_empty() {
            tracing::debug!(target: "git", "{}", stderr.trim());
        }

        Ok(GitOutput { stdout, stderr })
    }

    /// Execute and discard the output, keeping only success or failure.
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }
}

/// Captured output of a git command.
pub struct GitOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

// Convenience builders for the operations the publisher needs.

impl GitCommand {
    /// `git checkout <branch>`
    pub fn checkout(branch: &str) -> Self {
        Self::new().args(["checkout", branch])
    }

    /// `git pull --ff-only <remote> <branch>`
    pub fn pull_ff(remote: &str, branch: &str) -> Self {
        Self::new().args(["pull", "--ff-only", remote, branch])
    }

    /// `git checkout -b <branch>`
    pub fn create_branch(branch: &str) -> Self {
        Self::new().args(["checkout", "-b", branch])
    }

    /// `git push <remote> <branch>`
    pub fn push(remote: &str, branch: &str) -> Self {
        Self::new().args(["push", remote, branch])
    }
}
