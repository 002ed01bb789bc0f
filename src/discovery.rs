//! Remote release discovery.
//!
//! Discovery asks the upstream landing page for its hyperlinks, finds the
//! one pointing at the stable release, and extracts the version token from
//! it. The page transport is behind the [`WebClient`] capability so the
//! pipeline never depends on a concrete HTTP stack; [`HttpWebClient`] is the
//! production implementation.
//!
//! There is no retry at this layer. If the page is unreachable or the link
//! is absent the run fails, and the external scheduler decides when to try
//! again.

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use semver::Version;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::constants::STABLE_RELEASE_PATH;
use crate::core::TapwatchError;
use crate::version::comparison::parse_lenient;

/// A hyperlink discovered on a fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// The anchor's href attribute, as written in the page
    pub href: String,
    /// The anchor's visible text with markup stripped
    pub text: String,
}

/// Capability for retrieving a page and returning its hyperlinks.
#[async_trait]
pub trait WebClient: Send + Sync {
    /// Fetch `url` and return every hyperlink found on it.
    async fn discover_links(&self, url: &str) -> Result<Vec<Link>>;
}

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*\bhref\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a>"#)
        .expect("anchor pattern is valid")
});

static MARKUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("markup pattern is valid"));

/// Production [`WebClient`] backed by reqwest.
pub struct HttpWebClient {
    client: reqwest::Client,
}

impl HttpWebClient {
    /// Create a client with default transport settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpWebClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebClient for HttpWebClient {
    async fn discover_links(&self, url: &str) -> Result<Vec<Link>> {
        debug!(target: "discovery", url, "fetching upstream page");

        let response = self.client.get(url).send().await.map_err(|e| {
            TapwatchError::PageFetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TapwatchError::PageFetchFailed {
                url: url.to_string(),
                reason: format!("HTTP {status}"),
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| TapwatchError::PageFetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let links = extract_links(&body);
        debug!(target: "discovery", count = links.len(), "extracted hyperlinks");
        Ok(links)
    }
}

/// Pull every anchor out of an HTML document.
fn extract_links(html: &str) -> Vec<Link> {
    ANCHOR_RE
        .captures_iter(html)
        .map(|caps| Link {
            href: caps[1].trim().to_string(),
            text: MARKUP_RE.replace_all(&caps[2], "").trim().to_string(),
        })
        .collect()
}

/// Finds the latest published upstream version.
pub struct ReleaseDiscovery<W> {
    web: W,
    upstream_url: String,
}

impl<W: WebClient> ReleaseDiscovery<W> {
    /// Create a discovery over `web`, scanning `upstream_url`.
    pub fn new(web: W, upstream_url: impl Into<String>) -> Self {
        Self {
            web,
            upstream_url: upstream_url.into(),
        }
    }

    /// Fetch the landing page and extract the latest stable version.
    ///
    /// # Errors
    ///
    /// Fails when the page is unreachable, when no link matches the stable
    /// release pattern, or when the matched link carries no parseable
    /// version token.
    pub async fn latest_version(&self) -> Result<Version> {
        let links = self.web.discover_links(&self.upstream_url).await?;

        let link = links.iter().find(|l| is_stable_release_link(l)).ok_or_else(|| {
            warn!(target: "discovery", url = %self.upstream_url, "no stable release link on page");
            TapwatchError::ReleaseLinkNotFound {
                url: self.upstream_url.clone(),
            }
        })?;

        let version = version_from_link(link)?;
        debug!(target: "discovery", %version, href = %link.href, "found stable release link");
        Ok(version)
    }
}

/// A link counts as the stable release link when its href path matches the
/// known pattern, with or without a site prefix or trailing slash.
fn is_stable_release_link(link: &Link) -> bool {
    link.href.trim_end_matches('/').ends_with(STABLE_RELEASE_PATH)
}

/// Extract the version token from a stable release link.
///
/// The visible text is tried first; when it does not parse, the last path
/// segment of the href is tried instead.
fn version_from_link(link: &Link) -> Result<Version> {
    if let Ok(version) = parse_lenient(link.text.trim()) {
        return Ok(version);
    }

    let last_segment = link
        .href
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    parse_lenient(last_segment).map_err(|e| {
        TapwatchError::VersionTokenUnparseable {
            link: if link.text.is_empty() {
                link.href.clone()
            } else {
                link.text.clone()
            },
            reason: e.to_string(),
        }
        .into()
    })
}
