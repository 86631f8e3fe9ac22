// Cache path utilities.
// Maps cache namespaces to files in the working directory.

use std::fmt;
use std::path::{Path, PathBuf};

/// Independent append-only record stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Release pointer URLs, one per repository.
    Releases,
    /// Serialized release details, one per pointer.
    ReleasesBody,
}

impl Namespace {
    pub fn key(&self) -> &'static str {
        match self {
            Namespace::Releases => "releases",
            Namespace::ReleasesBody => "releases-body",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Path to a namespace's record file.
pub fn records_path(root: &Path, namespace: Namespace) -> PathBuf {
    root.join(format!("changelog-{}.cache", namespace.key()))
}

/// Path to a namespace's status record.
pub fn status_path(root: &Path, namespace: Namespace) -> PathBuf {
    root.join(format!("changelog-{}.status", namespace.key()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_paths() {
        let root = Path::new("/work");

        assert_eq!(
            records_path(root, Namespace::Releases),
            Path::new("/work/changelog-releases.cache")
        );
        assert_eq!(
            records_path(root, Namespace::ReleasesBody),
            Path::new("/work/changelog-releases-body.cache")
        );
        assert_eq!(
            status_path(root, Namespace::ReleasesBody),
            Path::new("/work/changelog-releases-body.status")
        );
    }
}
