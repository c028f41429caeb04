//! Error types for `lifecal-core`.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("invalid date {0:?}, expected mm/dd/yyyy")]
  InvalidDate(String),

  #[error("rating {0} is outside 0..=100")]
  RatingOutOfRange(i64),

  #[error("hue {0} is outside 0..=360")]
  HueOutOfRange(i64),

  #[error("invalid color {0:?}, expected #RGB or #RRGGBB")]
  InvalidColor(String),

  #[error("an event needs at least one line")]
  EmptyEvent,

  #[error("period ends ({end}) before it starts ({start})")]
  InvertedPeriod { start: NaiveDate, end: NaiveDate },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
