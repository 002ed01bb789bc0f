//! Common test utilities for tapwatch integration tests.

// These utilities are shared across test files and not every test file uses
// every helper.
#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Git command wrapper for building test repositories.
pub struct TestGit {
    repo_path: PathBuf,
}

impl TestGit {
    /// Create a wrapper for the repository at `repo_path`.
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    /// Run a git command in the repository, failing on non-zero exit.
    pub fn run(&self, args: &[&str]) -> Result<Output> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;
        if !output.status.success() {
            bail!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        Ok(output)
    }

    /// Initialize a repository with `master` as the initial branch.
    pub fn init(&self) -> Result<()> {
        self.run(&["init", "--initial-branch=master"])?;
        Ok(())
    }

    /// Initialize a bare repository.
    pub fn init_bare(&self) -> Result<()> {
        self.run(&["init", "--bare", "--initial-branch=master"])?;
        Ok(())
    }

    /// Configure a throwaway git identity.
    pub fn config_user(&self) -> Result<()> {
        self.run(&["config", "user.email", "test@tapwatch.example"])?;
        self.run(&["config", "user.name", "Test User"])?;
        Ok(())
    }

    /// Stage everything.
    pub fn add_all(&self) -> Result<()> {
        self.run(&["add", "."])?;
        Ok(())
    }

    /// Commit staged changes.
    pub fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message])?;
        Ok(())
    }

    /// Rename a remote.
    pub fn remote_rename(&self, from: &str, to: &str) -> Result<()> {
        self.run(&["remote", "rename", from, to])?;
        Ok(())
    }

    /// Add a remote.
    pub fn remote_add(&self, name: &str, url: &str) -> Result<()> {
        self.run(&["remote", "add", name, url])?;
        Ok(())
    }

    /// Check whether a local branch exists.
    pub fn branch_exists(&self, name: &str) -> bool {
        Command::new("git")
            .args(["rev-parse", "--verify", &format!("refs/heads/{name}")])
            .current_dir(&self.repo_path)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Resolve a reference to a commit hash.
    pub fn rev_parse(&self, reference: &str) -> Result<String> {
        let output = self.run(&["rev-parse", reference])?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Name of the currently checked out branch.
    pub fn current_branch(&self) -> Result<String> {
        let output = self.run(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Minimal loopback HTTP server serving a fixed route table.
///
/// Each route maps an exact request path to a response body. Unknown paths
/// get a 404. The listener thread lives for the duration of the test
/// process.
pub struct StaticServer {
    addr: SocketAddr,
}

impl StaticServer {
    /// Bind an ephemeral port and start serving `routes`.
    pub fn start(routes: Vec<(String, Vec<u8>)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
        let addr = listener.local_addr().expect("listener has a local addr");

        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let routes = routes.clone();
                std::thread::spawn(move || {
                    let _ = serve_one(&mut stream, &routes);
                });
            }
        });

        Self { addr }
    }

    /// Absolute URL for a path on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

fn serve_one(stream: &mut TcpStream, routes: &[(String, Vec<u8>)]) -> std::io::Result<()> {
    let mut head = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut buf)?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
        if head.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    let request = String::from_utf8_lossy(&head);
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    let response = match routes.iter().find(|(route, _)| *route == path) {
        Some((_, body)) => {
            let mut bytes = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            )
            .into_bytes();
            bytes.extend_from_slice(body);
            bytes
        }
        None => b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_vec(),
    };

    stream.write_all(&response)?;
    stream.flush()
}

/// Write a version record file with the given version string.
pub fn write_version_record(path: &Path, version: &str) {
    std::fs::write(path, format!("version: \"{version}\"\n")).expect("write version record");
}

/// A landing page whose stable release link advertises `version`.
pub fn landing_page(version: &str) -> Vec<u8> {
    format!(
        r#"<html><body>
  <a href="/about">About</a>
  <a href="/release/stable">{version}</a>
  <a href="/release/maintenance">2.20.6</a>
</body></html>"#
    )
    .into_bytes()
}
