// GitHub API endpoint functions.
// Typed release lookups on top of the raw client.

use crate::error::{ChangelogError, Result};
use crate::repository::RepositoryIdentifier;

use super::client::GitHubClient;
use super::types::{Release, ReleaseSummary};

impl GitHubClient {
    /// Get the detail URL of a repository's most recent release.
    pub async fn get_latest_release_url(&mut self, repo: &RepositoryIdentifier) -> Result<String> {
        let response = self.get(&repo.releases_endpoint()).await?;
        let releases: Vec<ReleaseSummary> = response.json().await?;
        releases
            .into_iter()
            .next()
            .map(|release| release.url)
            .ok_or_else(|| ChangelogError::MissingRelease(repo.to_string()))
    }

    /// Get a release by its detail URL.
    pub async fn get_release(&mut self, url: &str) -> Result<Release> {
        let response = self.get_url(url).await?;
        let release: Release = response.json().await?;
        Ok(release)
    }
}
