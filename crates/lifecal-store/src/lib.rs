//! Document store backends for the life calendar.
//!
//! Each backend implements [`lifecal_core::store::DocumentStore`]:
//!
//! - [`GithubStore`]: a file in a GitHub repository, via the contents API.
//!   The blob SHA is the version token.
//! - [`FileStore`]: a file under a local directory. The SHA-256 of the text
//!   is the version token.
//! - [`MemoryStore`]: an in-process map that records every commit; useful
//!   for testing.

mod file;
mod github;
mod memory;
mod version;

pub mod error;

pub use error::{Error, Result};
pub use file::FileStore;
pub use github::{GithubConfig, GithubStore};
pub use memory::{MemoryStore, RecordedCommit};
pub use version::content_version;
