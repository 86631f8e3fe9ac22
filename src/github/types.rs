// GitHub API response types.
// Defines structs for deserializing GitHub release responses.

use serde::{Deserialize, Serialize};

/// Entry in a repository's release list. Only the detail URL is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseSummary {
    pub url: String,
}

/// Single release as returned by its detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub body: Option<String>,
    pub url: String,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub limit: u64,
    /// `None` until a response reports it.
    pub remaining: Option<u64>,
    /// Unix timestamp at which the quota resets.
    pub reset: u64,
}

impl RateLimit {
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Reset time as a wall-clock `HH:MM:SS` string.
    pub fn reset_display(&self) -> String {
        chrono::DateTime::from_timestamp(self.reset as i64, 0)
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}
