//! Error type for `lifecal-store`.

use lifecal_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("unexpected status {status} from {url}")]
  Status {
    status: reqwest::StatusCode,
    url:    String,
  },

  #[error("invalid base64 content: {0}")]
  Base64(#[from] base64::DecodeError),

  #[error("document is not valid UTF-8: {0}")]
  Utf8(#[from] std::string::FromUtf8Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for StoreError {
  fn from(e: Error) -> Self { StoreError::Transport(Box::new(e)) }
}
