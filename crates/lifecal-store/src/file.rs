//! [`FileStore`]: documents kept as plain files under a local directory.

use std::{
  io,
  path::{Path, PathBuf},
  sync::Arc,
};

use lifecal_core::store::{Commit, DocumentStore, Snapshot, StoreError, VersionToken};
use tokio::sync::Mutex;

use crate::{Error, version::content_version};

const STAGING_SUFFIX: &str = ".lifecal-tmp";

/// A directory-backed document store.
///
/// The version token is the content hash, so an edit made by any other
/// program between a read and a write is detected. Writes from this process
/// are serialised; writes are a temp-file-and-rename, so readers never see a
/// half-written document.
#[derive(Clone)]
pub struct FileStore {
  root:  PathBuf,
  write: Arc<Mutex<()>>,
}

impl FileStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root:  root.into(),
      write: Arc::new(Mutex::new(())),
    }
  }

  fn resolve(&self, path: &str) -> PathBuf {
    self.root.join(path.trim_start_matches('/'))
  }

  async fn read(&self, path: &str) -> Result<String, StoreError> {
    match tokio::fs::read_to_string(self.resolve(path)).await {
      Ok(text) => Ok(text),
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        Err(StoreError::NotFound { path: path.to_string() })
      }
      Err(e) => Err(Error::Io(e).into()),
    }
  }
}

impl DocumentStore for FileStore {
  async fn get_file(&self, path: &str) -> Result<Snapshot, StoreError> {
    let text = self.read(path).await?;
    let version = content_version(&text);
    Ok(Snapshot { text, version })
  }

  async fn update_file(
    &self,
    path: &str,
    commit: Commit,
  ) -> Result<VersionToken, StoreError> {
    let _guard = self.write.lock().await;

    let current = self.read(path).await?;
    if content_version(&current) != commit.version {
      return Err(StoreError::Conflict { path: path.to_string() });
    }

    replace_file(&self.resolve(path), commit.text.as_bytes())
      .await
      .map_err(Error::from)?;

    tracing::info!(path, message = %commit.message, "document written");
    Ok(content_version(&commit.text))
  }
}

/// Stage `bytes` next to `target`, then rename them into place. A failed
/// rename takes the staging file with it.
async fn replace_file(target: &Path, bytes: &[u8]) -> io::Result<()> {
  let mut staging = target.as_os_str().to_owned();
  staging.push(STAGING_SUFFIX);

  tokio::fs::write(&staging, bytes).await?;
  if let Err(e) = tokio::fs::rename(&staging, target).await {
    if let Err(cleanup) = tokio::fs::remove_file(&staging).await {
      tracing::warn!(error = %cleanup, "staging file left behind");
    }
    return Err(e);
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
      .join(format!("lifecal-file-store-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
  }

  #[tokio::test]
  async fn round_trips_through_disk() {
    let dir = scratch_dir("roundtrip");
    std::fs::write(dir.join("events.html"), "<div></div>").unwrap();
    let store = FileStore::new(&dir);

    let snap = store.get_file("events.html").await.unwrap();
    let next = store
      .update_file("events.html", Commit {
        message: "m".into(),
        text:    "<div>x</div>".into(),
        version: snap.version.clone(),
      })
      .await
      .unwrap();

    let again = store.get_file("events.html").await.unwrap();
    assert_eq!(again.text, "<div>x</div>");
    assert_eq!(again.version, next);
    assert_ne!(again.version, snap.version);
  }

  #[tokio::test]
  async fn external_edit_is_a_conflict() {
    let dir = scratch_dir("conflict");
    std::fs::write(dir.join("events.html"), "a").unwrap();
    let store = FileStore::new(&dir);

    let snap = store.get_file("events.html").await.unwrap();
    std::fs::write(dir.join("events.html"), "edited elsewhere").unwrap();

    let err = store
      .update_file("events.html", Commit {
        message: "m".into(),
        text:    "b".into(),
        version: snap.version,
      })
      .await
      .unwrap_err();
    assert!(matches!(err, StoreError::Conflict { .. }));
    assert_eq!(
      std::fs::read_to_string(dir.join("events.html")).unwrap(),
      "edited elsewhere"
    );
  }

  #[tokio::test]
  async fn missing_file_is_not_found() {
    let store = FileStore::new(scratch_dir("missing"));
    let err = store.get_file("absent.html").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
  }

  #[tokio::test]
  async fn failed_rename_removes_the_staging_file() {
    let dir = scratch_dir("rename");
    // A non-empty directory cannot be replaced by a file.
    let target = dir.join("events.html");
    std::fs::create_dir_all(target.join("inner")).unwrap();

    let err = replace_file(&target, b"new").await.unwrap_err();
    assert_ne!(err.kind(), io::ErrorKind::NotFound);
    assert!(!dir.join(format!("events.html{STAGING_SUFFIX}")).exists());
    assert!(target.is_dir());
  }
}
