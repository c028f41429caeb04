//! Error types for the lifecal-markup codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("not a calendar fragment: {0}")]
  NotAFragment(String),

  #[error("fragment has no closing </div>")]
  Unclosed,

  #[error("fragment is missing the {0} attribute")]
  MissingAttribute(&'static str),

  #[error("invalid {name} attribute: {value:?}")]
  InvalidAttribute { name: &'static str, value: String },

  #[error("no fragment with id {0}")]
  UnknownFragment(usize),

  #[error(transparent)]
  Record(#[from] lifecal_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
