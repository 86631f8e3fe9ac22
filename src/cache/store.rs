// Cache store for namespace record files and their status records.
// Records are appended one per line and never rewritten; status records are
// replaced atomically.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ChangelogError, Result};

use super::paths::{Namespace, records_path, status_path};

/// How far a namespace got in the last run that touched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceState {
    /// Nothing has been written yet.
    Absent,
    /// A stage started filling the namespace but did not finish.
    Partial,
    /// The namespace is fully populated.
    Complete,
}

/// Status record stored next to a namespace file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceStatus {
    pub state: NamespaceState,
    pub updated_at: DateTime<Utc>,
    /// Keys of the units already written, for stages that resume by key.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub completed: Vec<String>,
}

impl NamespaceStatus {
    pub fn new(state: NamespaceState) -> Self {
        Self::with_completed(state, Vec::new())
    }

    pub fn with_completed(state: NamespaceState, completed: Vec<String>) -> Self {
        Self {
            state,
            updated_at: Utc::now(),
            completed,
        }
    }
}

/// Append-only, file-backed cache rooted in a directory.
#[derive(Debug, Clone)]
pub struct Cache {
    root: PathBuf,
}

impl Cache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check whether the namespace file has ever been created.
    pub fn exists(&self, namespace: Namespace) -> bool {
        records_path(&self.root, namespace).exists()
    }

    /// Append one record as a line, creating the file on first use.
    pub fn append_record(&self, namespace: Namespace, record: &str) -> Result<()> {
        if record.is_empty() || record.contains(['\n', '\r']) {
            return Err(ChangelogError::InvalidRecord {
                namespace: namespace.to_string(),
            });
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(records_path(&self.root, namespace))?;
        writeln!(file, "{record}")?;
        Ok(())
    }

    /// Read all non-empty records in append order.
    ///
    /// A namespace that was never written reads as empty.
    pub fn read_all(&self, namespace: Namespace) -> Result<Vec<String>> {
        let contents = match fs::read_to_string(records_path(&self.root, namespace)) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(contents
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Read the status record, if one was written.
    pub fn status(&self, namespace: Namespace) -> Result<Option<NamespaceStatus>> {
        let contents = match fs::read_to_string(status_path(&self.root, namespace)) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| ChangelogError::CacheCorruption {
                namespace: namespace.to_string(),
                reason: format!("unreadable status record: {e}"),
            })
    }

    /// Resolve the namespace state.
    ///
    /// A status record wins. Without one, an existing record file counts as
    /// complete, which is how caches written before status records were
    /// introduced behave.
    pub fn state(&self, namespace: Namespace) -> Result<NamespaceState> {
        if let Some(status) = self.status(namespace)? {
            return Ok(status.state);
        }

        if self.exists(namespace) {
            Ok(NamespaceState::Complete)
        } else {
            Ok(NamespaceState::Absent)
        }
    }

    /// Record the namespace state, replacing any previous status.
    pub fn mark(&self, namespace: Namespace, state: NamespaceState) -> Result<()> {
        self.write_status(namespace, &NamespaceStatus::new(state))
    }

    /// Replace the status record.
    pub fn write_status(&self, namespace: Namespace, status: &NamespaceStatus) -> Result<()> {
        let path = status_path(&self.root, namespace);
        let json = serde_json::to_string_pretty(status)?;

        // Write atomically via temp file
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }
}
