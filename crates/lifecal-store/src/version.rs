//! Version tokens for backends without native revision ids.
//!
//! The token is the SHA-256 of the document text: the same text always maps to
//! the same token, and any edit, however small, changes it.

use lifecal_core::store::VersionToken;
use sha2::{Digest, Sha256};

/// Compute the version token of `text`.
pub fn content_version(text: &str) -> VersionToken {
  let hash = Sha256::digest(text.as_bytes());
  VersionToken::new(hex::encode(hash))
}
