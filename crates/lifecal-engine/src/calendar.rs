//! The document store adapter.
//!
//! A [`Calendar`] is one document at one path in a [`DocumentStore`]. Edits
//! follow a checkout cycle: [`Calendar::read`] parses the current text into a
//! [`Document`] and remembers the version it came from, the caller patches
//! the document, and [`Calendar::write`] renders it and commits against that
//! version. A write racing an external edit fails with
//! [`Error::Conflict`](crate::Error::Conflict) and is never retried.

use std::sync::Arc;

use lifecal_core::store::{Commit, DocumentStore, VersionToken};
use lifecal_markup::Document;

use crate::Result;

/// A parsed document plus the version it was read at.
#[derive(Debug, Clone)]
pub struct Checkout {
  pub document: Document,
  pub version:  VersionToken,
}

pub struct Calendar<S> {
  store: Arc<S>,
  path:  String,
}

impl<S> Clone for Calendar<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      path:  self.path.clone(),
    }
  }
}

impl<S: DocumentStore> Calendar<S> {
  pub fn new(store: Arc<S>, path: impl Into<String>) -> Self {
    Self { store, path: path.into() }
  }

  pub async fn read(&self) -> Result<Checkout> {
    let snapshot = self.store.get_file(&self.path).await?;
    let document = Document::parse(&snapshot.text);
    for skipped in document.skipped() {
      tracing::warn!(
        path = %self.path,
        offset = skipped.offset,
        reason = %skipped.reason,
        "unreadable fragment kept as text"
      );
    }
    tracing::debug!(
      path = %self.path,
      version = %snapshot.version,
      events = document.events().len(),
      periods = document.periods().len(),
      "calendar read"
    );
    Ok(Checkout { document, version: snapshot.version })
  }

  pub async fn write(&self, checkout: Checkout, message: &str) -> Result<VersionToken> {
    let commit = Commit {
      message: message.to_string(),
      text:    checkout.document.render(),
      version: checkout.version,
    };
    let version = self.store.update_file(&self.path, commit).await?;
    tracing::info!(path = %self.path, %message, %version, "calendar committed");
    Ok(version)
  }
}
