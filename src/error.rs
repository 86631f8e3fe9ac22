// Error types for the changelog puller.
// Covers GitHub API failures, subscription parsing, and cache errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Repository {0} has no releases")]
    MissingRelease(String),

    #[error("Not a GitHub repository URL: {url}")]
    Parse { url: String },

    #[error("Cache record for {namespace} must be a single non-empty line")]
    InvalidRecord { namespace: String },

    #[error("Cache corrupted in {namespace}: {reason}")]
    CacheCorruption { namespace: String, reason: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl ChangelogError {
    /// Whether this error came from talking to the remote API.
    ///
    /// Remote errors end the current fetch stage but keep the run alive;
    /// everything else is fatal.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ChangelogError::Api(_)
                | ChangelogError::Unauthorized
                | ChangelogError::NotFound(_)
                | ChangelogError::RateLimited { .. }
                | ChangelogError::Http { .. }
                | ChangelogError::MissingRelease(_)
                | ChangelogError::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ChangelogError>;
