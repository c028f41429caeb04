//! The `DocumentStore` trait and the types that cross it.
//!
//! The store is a version-controlled file host (a GitHub repository, a local
//! directory, an in-memory map in tests). Higher layers depend on this
//! abstraction, not on any concrete backend.

use std::{fmt, future::Future};

use thiserror::Error;

// ─── Version token ───────────────────────────────────────────────────────────

/// Opaque identifier of the document state that was read.
///
/// Every write carries the token of the read it is based on; the store refuses
/// the write if the document has moved on since.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionToken(String);

impl VersionToken {
  pub fn new(token: impl Into<String>) -> Self { Self(token.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for VersionToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Read / write payloads ───────────────────────────────────────────────────

/// The full text of a document together with the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
  pub text:    String,
  pub version: VersionToken,
}

/// Input to [`DocumentStore::update_file`].
#[derive(Debug, Clone)]
pub struct Commit {
  /// Change description recorded by the store (a commit message).
  pub message: String,
  /// The complete new document text.
  pub text:    String,
  /// The version the new text was derived from.
  pub version: VersionToken,
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("document not found: {path}")]
  NotFound { path: String },

  /// The version token of a write no longer matches the stored document.
  #[error("document {path} changed since it was read")]
  Conflict { path: String },

  #[error("store transport error: {0}")]
  Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a versioned document host.
///
/// A write either replaces the whole document or fails; there are no partial
/// writes. No merge or retry happens on conflict.
pub trait DocumentStore: Send + Sync {
  /// Fetch the current text and version of `path`.
  ///
  /// Fails with [`StoreError::NotFound`] if nothing exists at `path`.
  fn get_file<'a>(
    &'a self,
    path: &'a str,
  ) -> impl Future<Output = Result<Snapshot, StoreError>> + Send + 'a;

  /// Replace the document at `path`, returning the new version.
  ///
  /// Fails with [`StoreError::Conflict`] if `commit.version` is stale.
  fn update_file<'a>(
    &'a self,
    path: &'a str,
    commit: Commit,
  ) -> impl Future<Output = Result<VersionToken, StoreError>> + Send + 'a;
}
