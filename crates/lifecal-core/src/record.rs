//! Calendar records: the chronological entries a life calendar holds.
//!
//! A record is a plain value. It is assembled from validated conversational
//! input, rendered to markup by `lifecal-markup`, and knows nothing about
//! where it sits inside a document.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;

use crate::{Error, Result};

// ─── Dates ───────────────────────────────────────────────────────────────────

/// The `chrono` format of every date in the document: `mm/dd/yyyy`.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Render a date the way the document stores it, zero-padded.
pub fn format_date(date: NaiveDate) -> String {
  date.format(DATE_FORMAT).to_string()
}

/// Parse a `mm/dd/yyyy` date.
///
/// Month and day may omit their leading zero (older fragments were written
/// that way); the year must have exactly four digits. The three fields must
/// form a real calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
  let invalid = || Error::InvalidDate(s.to_string());
  let trimmed = s.trim();

  let mut parts = trimmed.split('/');
  let (Some(month), Some(day), Some(year), None) =
    (parts.next(), parts.next(), parts.next(), parts.next())
  else {
    return Err(invalid());
  };

  let digits = |f: &str, min: usize, max: usize| {
    (min..=max).contains(&f.len()) && f.bytes().all(|b| b.is_ascii_digit())
  };
  if !digits(month, 1, 2) || !digits(day, 1, 2) || !digits(year, 4, 4) {
    return Err(invalid());
  }

  NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| invalid())
}

// ─── Scalars ─────────────────────────────────────────────────────────────────

/// How good a day (or a base period) was, `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
  pub const MAX: i64 = 100;

  pub fn new(value: i64) -> Result<Self> {
    if (0..=Self::MAX).contains(&value) {
      Ok(Self(value as u8))
    } else {
      Err(Error::RatingOutOfRange(value))
    }
  }

  pub fn get(self) -> u8 { self.0 }
}

impl fmt::Display for Rating {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Display hue of a base period, in degrees `0..=360`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hue(u16);

impl Hue {
  pub const MAX: i64 = 360;

  pub fn new(value: i64) -> Result<Self> {
    if (0..=Self::MAX).contains(&value) {
      Ok(Self(value as u16))
    } else {
      Err(Error::HueOutOfRange(value))
    }
  }

  pub fn get(self) -> u16 { self.0 }
}

impl fmt::Display for Hue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// A CSS hex color, `#RGB` or `#RRGGBB`. Stored exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(String);

impl Color {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl FromStr for Color {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let valid = s
      .strip_prefix('#')
      .filter(|hex| matches!(hex.len(), 3 | 6))
      .is_some_and(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()));
    if valid {
      Ok(Self(s.to_string()))
    } else {
      Err(Error::InvalidColor(s.to_string()))
    }
  }
}

impl fmt::Display for Color {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Event ───────────────────────────────────────────────────────────────────

/// Everything that happened on one day, with a rating for the day.
///
/// Keyed by `date`; a document holds at most one event per date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
  pub date:   NaiveDate,
  pub rating: Rating,
  /// One entry per thing that happened, rendered joined by `<br> `.
  /// Never empty.
  pub lines:  Vec<String>,
}

impl Event {
  pub fn new(date: NaiveDate, rating: Rating, lines: Vec<String>) -> Result<Self> {
    if lines.is_empty() {
      return Err(Error::EmptyEvent);
    }
    Ok(Self { date, rating, lines })
  }
}

// ─── Period ──────────────────────────────────────────────────────────────────

/// How a period is classified and styled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodStyle {
  /// An ordinary period drawn in a fixed color.
  Plain { color: Color },
  /// A base period: rated like a day and drawn with a hue.
  Base { rating: Rating, hue: Hue },
}

impl PeriodStyle {
  pub fn is_base(&self) -> bool { matches!(self, Self::Base { .. }) }
}

/// A stretch of days sharing one description. Keyed by `(start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
  pub start:       NaiveDate,
  pub end:         NaiveDate,
  pub description: String,
  pub style:       PeriodStyle,
}

impl Period {
  pub fn new(
    start: NaiveDate,
    end: NaiveDate,
    description: String,
    style: PeriodStyle,
  ) -> Result<Self> {
    if end < start {
      return Err(Error::InvertedPeriod { start, end });
    }
    Ok(Self { start, end, description, style })
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// Which list of the document a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
  Event,
  Period,
}

/// Either kind of calendar record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
  Event(Event),
  Period(Period),
}

impl Record {
  pub fn kind(&self) -> RecordKind {
    match self {
      Self::Event(_) => RecordKind::Event,
      Self::Period(_) => RecordKind::Period,
    }
  }

  /// The date records of the same kind are ordered by: an event's date, a
  /// period's start.
  pub fn sort_key(&self) -> NaiveDate {
    match self {
      Self::Event(e) => e.date,
      Self::Period(p) => p.start,
    }
  }

  pub fn as_event(&self) -> Option<&Event> {
    match self {
      Self::Event(e) => Some(e),
      Self::Period(_) => None,
    }
  }

  pub fn as_period(&self) -> Option<&Period> {
    match self {
      Self::Period(p) => Some(p),
      Self::Event(_) => None,
    }
  }
}

impl From<Event> for Record {
  fn from(event: Event) -> Self { Self::Event(event) }
}

impl From<Period> for Record {
  fn from(period: Period) -> Self { Self::Period(period) }
}
