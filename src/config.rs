// Subscription configuration.
// Loads changelog.conf and validates the token and subscription list.

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::Result;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "changelog.conf";

/// Default GitHub REST API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Raw document shape; every field is optional until validated.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawConfig {
    #[serde(default)]
    github_token: String,
    #[serde(default)]
    subscribes: Vec<String>,
    #[serde(default)]
    api_base_url: Option<String>,
}

/// Validated configuration: a non-empty token and at least one subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub github_token: String,
    pub subscribes: Vec<String>,
    pub api_base_url: String,
}

impl Config {
    /// Build the request settings handed to the GitHub client.
    pub fn request(&self) -> RequestConfig {
        RequestConfig {
            token: self.github_token.clone(),
            base_url: self.api_base_url.trim_end_matches('/').to_string(),
            user_agent: concat!("changelog/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Immutable HTTP request settings, built once from a validated config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    /// Sent verbatim in the Authorization header.
    pub token: String,
    pub base_url: String,
    pub user_agent: String,
}

/// Load configuration from `path`.
///
/// Returns `Ok(None)` when the tool is simply not configured: the file is
/// missing, is not valid JSON, or lacks a token or subscriptions. Only I/O
/// failures on an existing file are errors.
pub fn load(path: &Path) -> Result<Option<Config>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no configuration file");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let raw: RawConfig = match serde_json::from_str(&contents) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable configuration");
            return Ok(None);
        }
    };

    Ok(validate(raw))
}

fn validate(raw: RawConfig) -> Option<Config> {
    if raw.github_token.is_empty() {
        debug!("configuration has no github-token");
        return None;
    }
    if raw.subscribes.is_empty() {
        debug!("configuration has no subscribes");
        return None;
    }

    Some(Config {
        github_token: raw.github_token,
        subscribes: raw.subscribes,
        api_base_url: raw
            .api_base_url
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
    })
}
