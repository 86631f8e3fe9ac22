// Release details as stored in the releases-body cache.

use serde::{Deserialize, Serialize};

use crate::cache::Namespace;
use crate::error::{ChangelogError, Result};
use crate::github::Release;
use crate::repository::RepositoryIdentifier;

/// Marker every line-ending variant in a release body is normalized to.
pub const LINE_BREAK: &str = "\n";

/// Parsed release metadata together with the repository it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDetail {
    pub tag_name: String,
    pub body: String,
    /// Pointer the detail was fetched from.
    pub source_url: String,
    pub repository: RepositoryIdentifier,
}

impl ReleaseDetail {
    /// Build a detail from an API response fetched from `source_url`.
    pub fn from_release(
        release: Release,
        source_url: &str,
        repository: RepositoryIdentifier,
    ) -> Self {
        Self {
            tag_name: release.tag_name,
            body: normalize_line_breaks(release.body.as_deref().unwrap_or_default()),
            source_url: source_url.to_string(),
            repository,
        }
    }

    /// Serialize to a single cache line.
    pub fn to_record(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a cache line written by [`ReleaseDetail::to_record`].
    pub fn from_record(record: &str) -> Result<Self> {
        serde_json::from_str(record).map_err(|e| ChangelogError::CacheCorruption {
            namespace: Namespace::ReleasesBody.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Replace `\r\n`, `\r` and `\n` with [`LINE_BREAK`], one marker per line ending.
pub fn normalize_line_breaks(text: &str) -> String {
    text.replace("\r\n", LINE_BREAK)
        .replace('\r', LINE_BREAK)
        .replace('\n', LINE_BREAK)
}
