// Repository identifiers parsed from GitHub URLs.
// Handles both web subscription URLs and API release URLs.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ChangelogError, Result};

static WEB_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://github\.com/([A-Za-z0-9_-]+)/([A-Za-z0-9_-]+)")
        .expect("valid regex")
});

static API_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^https?://(?:api\.)?github\.com/(?:repos/)?([A-Za-z0-9_-]+)/([A-Za-z0-9_-]+)",
    )
    .expect("valid regex")
});

static REPOS_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/repos/([A-Za-z0-9_-]+)/([A-Za-z0-9_-]+)").expect("valid regex"));

/// Canonical owner/repository pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryIdentifier {
    pub owner: String,
    pub repo: String,
}

impl RepositoryIdentifier {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Case-insensitive key; GitHub treats `Acme/Widget` and `acme/widget` as
    /// the same repository.
    pub fn key(&self) -> String {
        self.to_string().to_ascii_lowercase()
    }

    /// API path for this repository's release list.
    pub fn releases_endpoint(&self) -> String {
        format!("/repos/{}/{}/releases", self.owner, self.repo)
    }
}

impl fmt::Display for RepositoryIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Parse a subscription URL of the form `https://github.com/{owner}/{repo}`.
pub fn resolve(url: &str) -> Result<RepositoryIdentifier> {
    capture(&WEB_URL, url)
}

/// Parse a URL that may also be API-shaped,
/// e.g. `https://api.github.com/repos/{owner}/{repo}/releases/1`.
pub fn resolve_from_api_url(url: &str) -> Result<RepositoryIdentifier> {
    capture(&API_URL, url)
}

/// Parse a URL served by the API at `base_url`,
/// e.g. `{base_url}/repos/{owner}/{repo}/releases/1`.
///
/// URLs outside `base_url` fall back to [`resolve_from_api_url`].
pub fn resolve_from_base_url(url: &str, base_url: &str) -> Result<RepositoryIdentifier> {
    match url.strip_prefix(base_url.trim_end_matches('/')) {
        Some(path) => capture(&REPOS_PATH, path).map_err(|_| ChangelogError::Parse {
            url: url.to_string(),
        }),
        None => resolve_from_api_url(url),
    }
}

/// Resolve every subscription in order, collapsing duplicates by
/// [`RepositoryIdentifier::key`].
///
/// Fails on the first malformed URL.
pub fn resolve_all<S: AsRef<str>>(urls: &[S]) -> Result<Vec<RepositoryIdentifier>> {
    let mut resolved: Vec<RepositoryIdentifier> = Vec::with_capacity(urls.len());
    for url in urls {
        let id = resolve(url.as_ref())?;
        if !resolved.iter().any(|seen| seen.key() == id.key()) {
            resolved.push(id);
        }
    }
    Ok(resolved)
}

fn capture(pattern: &Regex, url: &str) -> Result<RepositoryIdentifier> {
    let caps = pattern
        .captures(url)
        .ok_or_else(|| ChangelogError::Parse {
            url: url.to_string(),
        })?;
    Ok(RepositoryIdentifier::new(&caps[1], &caps[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_web_urls() {
        let id = resolve("https://github.com/acme/widget").unwrap();
        assert_eq!(id, RepositoryIdentifier::new("acme", "widget"));

        let id = resolve("http://github.com/rust-lang/rust_analyzer/").unwrap();
        assert_eq!(id, RepositoryIdentifier::new("rust-lang", "rust_analyzer"));

        let id = resolve("HTTPS://GitHub.com/acme/widget/releases/tag/v1").unwrap();
        assert_eq!(id, RepositoryIdentifier::new("acme", "widget"));

        // Only the leading word characters form the repo segment.
        let id = resolve("https://github.com/acme/widget.git").unwrap();
        assert_eq!(id, RepositoryIdentifier::new("acme", "widget"));
    }

    #[test]
    fn test_resolve_rejects_malformed() {
        for url in [
            "github.com/acme/widget",
            "https://github.com/acme",
            "https://github.com/acme/",
            "https://gitlab.com/acme/widget",
            "https://github.com//widget",
            "ftp://github.com/acme/widget",
            "",
        ] {
            assert!(
                matches!(resolve(url), Err(ChangelogError::Parse { .. })),
                "expected parse error for {url:?}"
            );
        }
    }

    #[test]
    fn test_resolve_does_not_accept_api_urls() {
        assert!(resolve("https://api.github.com/repos/acme/widget").is_err());
    }

    #[test]
    fn test_resolve_from_api_url() {
        let id =
            resolve_from_api_url("https://api.github.com/repos/acme/widget/releases/1").unwrap();
        assert_eq!(id, RepositoryIdentifier::new("acme", "widget"));

        let id = resolve_from_api_url("https://github.com/acme/widget").unwrap();
        assert_eq!(id, RepositoryIdentifier::new("acme", "widget"));

        assert!(resolve_from_api_url("https://api.github.com/repos/acme").is_err());
        assert!(resolve_from_api_url("http://127.0.0.1:8080/repos/acme/widget").is_err());
    }

    #[test]
    fn test_resolve_from_base_url() {
        let base = "http://127.0.0.1:8080/api/v3";

        let id = resolve_from_base_url(
            "http://127.0.0.1:8080/api/v3/repos/acme/widget/releases/1",
            base,
        )
        .unwrap();
        assert_eq!(id, RepositoryIdentifier::new("acme", "widget"));

        let id = resolve_from_base_url(
            "https://api.github.com/repos/acme/widget/releases/1",
            "https://api.github.com/",
        )
        .unwrap();
        assert_eq!(id, RepositoryIdentifier::new("acme", "widget"));

        // Other hosts still resolve when they look like GitHub
        let id =
            resolve_from_base_url("https://api.github.com/repos/acme/widget/releases/1", base)
                .unwrap();
        assert_eq!(id, RepositoryIdentifier::new("acme", "widget"));

        assert!(resolve_from_base_url("http://127.0.0.1:8080/api/v3/releases/1", base).is_err());
        assert!(resolve_from_base_url("http://127.0.0.1:8080/api/v30/repos/a/b", base).is_err());
    }

    #[test]
    fn test_key_ignores_case() {
        assert_eq!(RepositoryIdentifier::new("Acme", "Widget").key(), "acme/widget");
        assert_eq!(
            RepositoryIdentifier::new("Acme", "Widget").key(),
            RepositoryIdentifier::new("acme", "widget").key()
        );
    }

    #[test]
    fn test_resolve_all_collapses_duplicates() {
        let ids = resolve_all(&[
            "https://github.com/acme/widget",
            "https://github.com/acme/gadget",
            "https://github.com/acme/widget/",
            "https://github.com/Acme/Widget",
        ])
        .unwrap();
        assert_eq!(
            ids,
            vec![
                RepositoryIdentifier::new("acme", "widget"),
                RepositoryIdentifier::new("acme", "gadget"),
            ]
        );
    }

    #[test]
    fn test_resolve_all_fails_on_any_malformed() {
        let result = resolve_all(&["https://github.com/acme/widget", "not a url"]);
        assert!(matches!(result, Err(ChangelogError::Parse { url }) if url == "not a url"));
    }

    #[test]
    fn test_display_and_endpoint() {
        let id = RepositoryIdentifier::new("acme", "widget");
        assert_eq!(id.to_string(), "acme/widget");
        assert_eq!(id.releases_endpoint(), "/repos/acme/widget/releases");
    }
}
