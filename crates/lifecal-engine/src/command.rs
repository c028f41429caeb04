//! The operator-facing command surface.

use std::str::FromStr;

use chrono::NaiveDate;
use lifecal_core::record::parse_date;
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// One verb per command, spelled the way the operator types it.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Verb {
  NewEvent,
  ReviseEvent,
  DeleteEvent,
  NewPeriod,
  RevisePeriod,
  DeletePeriod,
  Help,
}

impl Verb {
  pub fn name(self) -> &'static str { self.into() }

  pub fn summary(self) -> &'static str {
    match self {
      Self::NewEvent => "add the events of a day (defaults to today, or give mm/dd/yyyy)",
      Self::ReviseEvent => "rewrite the events of a day",
      Self::DeleteEvent => "remove the events of a day",
      Self::NewPeriod => "add a period between two dates",
      Self::RevisePeriod => "rewrite a period",
      Self::DeletePeriod => "remove a period",
      Self::Help => "list these commands",
    }
  }
}

/// Which day `new_event` should record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDay {
  Today,
  On(NaiveDate),
  /// An argument was given but was not a date; ask for one.
  Ask,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  NewEvent(EventDay),
  ReviseEvent,
  DeleteEvent,
  NewPeriod,
  RevisePeriod,
  DeletePeriod,
  Help,
  /// A prefixed message naming no known verb.
  Unknown(String),
}

impl Command {
  /// Interpret `message` as a command introduced by `prefix`. Messages
  /// without the prefix are not commands at all.
  pub fn parse(prefix: &str, message: &str) -> Option<Self> {
    let rest = message.trim().strip_prefix(prefix)?;
    let mut words = rest.split_whitespace();
    let word = words.next().unwrap_or_default();
    let argument = words.next();

    let Ok(verb) = Verb::from_str(word) else {
      return Some(Self::Unknown(word.to_string()));
    };
    Some(match verb {
      Verb::NewEvent => Self::NewEvent(match argument {
        None => EventDay::Today,
        Some(arg) => parse_date(arg).map_or(EventDay::Ask, EventDay::On),
      }),
      Verb::ReviseEvent => Self::ReviseEvent,
      Verb::DeleteEvent => Self::DeleteEvent,
      Verb::NewPeriod => Self::NewPeriod,
      Verb::RevisePeriod => Self::RevisePeriod,
      Verb::DeletePeriod => Self::DeletePeriod,
      Verb::Help => Self::Help,
    })
  }

  /// Verb name for logging.
  pub fn name(&self) -> &str {
    match self {
      Self::NewEvent(_) => Verb::NewEvent.name(),
      Self::ReviseEvent => Verb::ReviseEvent.name(),
      Self::DeleteEvent => Verb::DeleteEvent.name(),
      Self::NewPeriod => Verb::NewPeriod.name(),
      Self::RevisePeriod => Verb::RevisePeriod.name(),
      Self::DeletePeriod => Verb::DeletePeriod.name(),
      Self::Help => Verb::Help.name(),
      Self::Unknown(word) => word,
    }
  }
}

/// The reply to `help`.
pub fn help_text(prefix: &str) -> String {
  let mut text = String::from("Here is what I can do:\n");
  for verb in Verb::iter() {
    text.push_str(&format!("\n{prefix}{} - {}", verb.name(), verb.summary()));
  }
  text
}
