// Pull command orchestration.
// Gates on configuration, runs both fetch stages, then renders the cache.

use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::cache::{Cache, Namespace};
use crate::config::{self, CONFIG_FILE_NAME};
use crate::error::Result;
use crate::fetcher::ReleaseFetcher;
use crate::github::GitHubClient;
use crate::release::ReleaseDetail;
use crate::render::Renderer;
use crate::repository;

/// What a pull run ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    /// No usable configuration; nothing was fetched or printed.
    NotConfigured,
    /// Cached releases were rendered.
    Rendered { releases: usize },
}

/// Run the pull pipeline against `workdir`.
///
/// Remote failures end their stage and are reported as notices before the
/// cached releases are rendered. Malformed subscriptions and corrupted cache
/// records are returned as errors.
pub async fn run<W: Write>(workdir: &Path, renderer: &mut Renderer<W>) -> Result<PullOutcome> {
    let Some(config) = config::load(&workdir.join(CONFIG_FILE_NAME))? else {
        debug!("not configured, nothing to pull");
        return Ok(PullOutcome::NotConfigured);
    };

    let repositories = repository::resolve_all(&config.subscribes)?;
    info!(count = repositories.len(), "pulling release changelogs");

    let cache = Cache::new(workdir);
    let client = GitHubClient::new(&config.request())?;
    let mut fetcher = ReleaseFetcher::new(client, &cache);

    let pointers = fetcher.resolve_pointers(&repositories).await?;
    if let Some(error) = pointers.error() {
        renderer.render_error(error)?;
    }

    let details = fetcher.resolve_details().await?;
    if let Some(error) = details.error() {
        renderer.render_error(error)?;
    }

    let releases = cache
        .read_all(Namespace::ReleasesBody)?
        .iter()
        .map(|record| ReleaseDetail::from_record(record))
        .collect::<Result<Vec<_>>>()?;
    renderer.render(&releases)?;

    Ok(PullOutcome::Rendered {
        releases: releases.len(),
    })
}
