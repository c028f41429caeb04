//! [`MemoryStore`]: an in-process document store for tests and demos.

use std::{collections::HashMap, sync::Arc};

use lifecal_core::store::{Commit, DocumentStore, Snapshot, StoreError, VersionToken};
use tokio::sync::Mutex;

use crate::version::content_version;

/// A commit accepted by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommit {
  pub path:    String,
  pub message: String,
}

#[derive(Default)]
struct Inner {
  files:   HashMap<String, String>,
  commits: Vec<RecordedCommit>,
}

/// Documents held in memory, versioned by content hash.
///
/// Cloning is cheap and every clone sees the same documents.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Put `text` at `path` directly, as an edit from outside the calendar
  /// would. Not recorded as a commit.
  pub async fn insert(&self, path: &str, text: &str) {
    self
      .inner
      .lock()
      .await
      .files
      .insert(path.to_string(), text.to_string());
  }

  pub async fn text(&self, path: &str) -> Option<String> {
    self.inner.lock().await.files.get(path).cloned()
  }

  /// Every accepted commit, oldest first.
  pub async fn commits(&self) -> Vec<RecordedCommit> {
    self.inner.lock().await.commits.clone()
  }
}

impl DocumentStore for MemoryStore {
  async fn get_file(&self, path: &str) -> Result<Snapshot, StoreError> {
    let inner = self.inner.lock().await;
    let text = inner
      .files
      .get(path)
      .cloned()
      .ok_or_else(|| StoreError::NotFound { path: path.to_string() })?;
    let version = content_version(&text);
    Ok(Snapshot { text, version })
  }

  async fn update_file(
    &self,
    path: &str,
    commit: Commit,
  ) -> Result<VersionToken, StoreError> {
    let mut inner = self.inner.lock().await;
    let current = inner
      .files
      .get(path)
      .ok_or_else(|| StoreError::NotFound { path: path.to_string() })?;
    if content_version(current) != commit.version {
      return Err(StoreError::Conflict { path: path.to_string() });
    }

    let version = content_version(&commit.text);
    inner.files.insert(path.to_string(), commit.text);
    inner.commits.push(RecordedCommit {
      path:    path.to_string(),
      message: commit.message,
    });
    Ok(version)
  }
}
