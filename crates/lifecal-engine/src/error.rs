//! Error type for `lifecal-engine`.
//!
//! Malformed operator input never shows up here: validators recover from it
//! by re-prompting. A missing record is a dialog branch, not an error. What
//! remains either ends the current command (and is reported to the operator)
//! or ends the session.

use lifecal_core::{conversation::ConversationError, store::StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The session was torn down while a dialog waited for input.
  #[error("the conversation ended before the dialog finished")]
  SessionClosed,

  #[error("channel error: {0}")]
  Channel(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("the calendar document {0} does not exist")]
  DocumentNotFound(String),

  /// The document changed between the read and the write.
  #[error("the calendar changed while we were talking, please run the command again")]
  Conflict,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("markup error: {0}")]
  Markup(#[from] lifecal_markup::Error),

  #[error(transparent)]
  Record(#[from] lifecal_core::Error),
}

impl Error {
  /// Whether the operator can still be told about this error. False when the
  /// channel itself is gone.
  pub fn is_reportable(&self) -> bool {
    !matches!(self, Self::SessionClosed | Self::Channel(_))
  }
}

impl From<ConversationError> for Error {
  fn from(e: ConversationError) -> Self {
    match e {
      ConversationError::Closed => Self::SessionClosed,
      ConversationError::Transport(inner) => Self::Channel(inner),
    }
  }
}

impl From<StoreError> for Error {
  fn from(e: StoreError) -> Self {
    match e {
      StoreError::NotFound { path } => Self::DocumentNotFound(path),
      StoreError::Conflict { .. } => Self::Conflict,
      StoreError::Transport(inner) => Self::Store(inner),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
