//! The conversational edit engine for the life calendar.
//!
//! Turns a single free-text channel into validated calendar edits:
//!
//! - [`prompt`]: input validators that re-ask until a reply parses.
//! - [`builder`]: multi-turn dialogs that assemble an event or a period.
//! - [`calendar`]: reads the document, hands out a patchable [`Document`],
//!   and commits it back against the version it was read at.
//! - [`handlers`]: one dialog per command, from key collection to commit.
//! - [`session`]: the per-conversation context every dialog runs in.
//!
//! Every dialog is an `async fn` over [`Conversation`]; each
//! `next_message().await` is a suspension point, so a host drives a session by
//! delivering the operator's next message (see [`channel`]).
//!
//! [`Document`]: lifecal_markup::Document
//! [`Conversation`]: lifecal_core::conversation::Conversation

pub mod builder;
pub mod calendar;
pub mod channel;
pub mod command;
pub mod error;
pub mod handlers;
pub mod prompt;
pub mod session;

pub use calendar::{Calendar, Checkout};
pub use command::Command;
pub use error::{Error, Result};
pub use session::{Outcome, Session};

#[cfg(test)]
pub(crate) mod test_helpers;

#[cfg(test)]
mod tests;
