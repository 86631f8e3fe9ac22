// Release fetching pipeline.
// Stage A resolves the latest release pointer per repository, Stage B resolves
// each pointer into a release detail. Both write through the cache.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::cache::{Cache, Namespace, NamespaceState, NamespaceStatus};
use crate::error::{ChangelogError, Result};
use crate::github::GitHubClient;
use crate::release::ReleaseDetail;
use crate::repository::{self, RepositoryIdentifier};

/// Result of running one fetch stage.
#[derive(Debug)]
pub enum StageOutcome {
    /// The namespace was already complete; nothing was requested.
    Skipped,
    /// Every pending item was processed.
    Completed { fetched: usize },
    /// A remote error stopped the stage. Records written before it are kept.
    Aborted {
        fetched: usize,
        error: ChangelogError,
    },
}

impl StageOutcome {
    pub fn error(&self) -> Option<&ChangelogError> {
        match self {
            StageOutcome::Aborted { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Fetches release pointers and details, one request at a time.
pub struct ReleaseFetcher<'a> {
    client: GitHubClient,
    cache: &'a Cache,
}

impl<'a> ReleaseFetcher<'a> {
    pub fn new(client: GitHubClient, cache: &'a Cache) -> Self {
        Self { client, cache }
    }

    /// Stage A: record the latest release pointer of each repository.
    ///
    /// Repositories are tracked by [`RepositoryIdentifier::key`] in the status
    /// record as they finish, so a resumed run never appends a second pointer
    /// for the same subscription.
    pub async fn resolve_pointers(
        &mut self,
        repositories: &[RepositoryIdentifier],
    ) -> Result<StageOutcome> {
        let namespace = Namespace::Releases;
        let state = self.cache.state(namespace)?;
        if state == NamespaceState::Complete {
            info!(%namespace, "cache complete, skipping release lookup");
            return Ok(StageOutcome::Skipped);
        }

        let mut completed = match state {
            NamespaceState::Partial => self
                .cache
                .status(namespace)?
                .map(|status| status.completed)
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        let mut fetched = 0;
        for repo in repositories {
            let key = repo.key();
            if completed.contains(&key) {
                debug!(repository = %repo, "release pointer already cached");
                continue;
            }

            info!(repository = %repo, "fetching latest release");
            match self.client.get_latest_release_url(repo).await {
                Ok(pointer) => {
                    self.cache.append_record(namespace, &pointer)?;
                    fetched += 1;
                }
                Err(ChangelogError::MissingRelease(name)) => {
                    warn!(repository = %name, "no releases published, skipping");
                }
                Err(error) if error.is_remote() => {
                    return self.abort(namespace, fetched, completed, error);
                }
                Err(error) => return Err(error),
            }

            completed.push(key);
            self.cache.write_status(
                namespace,
                &NamespaceStatus::with_completed(NamespaceState::Partial, completed.clone()),
            )?;
        }

        self.cache.write_status(
            namespace,
            &NamespaceStatus::with_completed(NamespaceState::Complete, completed),
        )?;
        Ok(StageOutcome::Completed { fetched })
    }

    /// Stage B: record the detail behind every cached release pointer.
    ///
    /// Stops at the first failing pointer.
    pub async fn resolve_details(&mut self) -> Result<StageOutcome> {
        let namespace = Namespace::ReleasesBody;
        let state = self.cache.state(namespace)?;
        if state == NamespaceState::Complete {
            info!(%namespace, "cache complete, skipping release details");
            return Ok(StageOutcome::Skipped);
        }

        let recorded = match state {
            NamespaceState::Partial => self.recorded_sources()?,
            _ => HashSet::new(),
        };

        let mut fetched = 0;
        for pointer in self.cache.read_all(Namespace::Releases)? {
            if recorded.contains(&pointer) {
                debug!(%pointer, "release detail already cached");
                continue;
            }

            info!(%pointer, "fetching release detail");
            let detail = match self.client.get_release(&pointer).await {
                Ok(release) => self
                    .release_repository(&release.url, &pointer)
                    .map(|repository| ReleaseDetail::from_release(release, &pointer, repository)),
                Err(error) => Err(error),
            };

            match detail {
                Ok(detail) => {
                    self.cache.append_record(namespace, &detail.to_record()?)?;
                    fetched += 1;
                }
                Err(error)
                    if error.is_remote() || matches!(error, ChangelogError::Parse { .. }) =>
                {
                    return self.abort(namespace, fetched, Vec::new(), error);
                }
                Err(error) => return Err(error),
            }
        }

        // New pointers may still arrive while the pointer stage is unfinished.
        let state = match self.cache.state(Namespace::Releases)? {
            NamespaceState::Complete => NamespaceState::Complete,
            _ => NamespaceState::Partial,
        };
        self.cache.mark(namespace, state)?;
        Ok(StageOutcome::Completed { fetched })
    }

    /// Repository a release belongs to, from the URL the API reports for it,
    /// falling back to the pointer it was fetched from.
    fn release_repository(&self, release_url: &str, pointer: &str) -> Result<RepositoryIdentifier> {
        let base_url = self.client.base_url();
        repository::resolve_from_base_url(release_url, base_url)
            .or_else(|_| repository::resolve_from_base_url(pointer, base_url))
    }

    fn abort(
        &self,
        namespace: Namespace,
        fetched: usize,
        completed: Vec<String>,
        error: ChangelogError,
    ) -> Result<StageOutcome> {
        warn!(%namespace, fetched, error = %error, "stage aborted");
        self.cache.write_status(
            namespace,
            &NamespaceStatus::with_completed(NamespaceState::Partial, completed),
        )?;
        Ok(StageOutcome::Aborted { fetched, error })
    }

    /// Pointers that already have a detail in the cache.
    fn recorded_sources(&self) -> Result<HashSet<String>> {
        self.cache
            .read_all(Namespace::ReleasesBody)?
            .iter()
            .map(|record| ReleaseDetail::from_record(record).map(|detail| detail.source_url))
            .collect()
    }
}
