//! The per-conversation context every dialog runs in.
//!
//! A [`Session`] owns the conversation with one operator and the calendar
//! they edit. It keeps no state between commands; each command reads the
//! calendar afresh.

use chrono::NaiveDate;
use lifecal_core::{
  conversation::Conversation,
  store::{DocumentStore, VersionToken},
};

use crate::{
  Calendar, Result,
  command::{Command, help_text},
  handlers,
};

pub const COMMAND_NOT_FOUND: &str = "Command not found.";

/// How a command ended, when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  /// The calendar was written.
  Committed { version: VersionToken },
  /// The operator said no; the calendar is untouched.
  Declined,
  /// The command only answered (help, unknown verbs).
  Answered,
}

pub struct Session<S, C> {
  pub(crate) calendar:     Calendar<S>,
  pub(crate) conversation: C,
  prefix:                  String,
}

impl<S, C> Session<S, C>
where
  S: DocumentStore,
  C: Conversation,
{
  pub fn new(calendar: Calendar<S>, conversation: C, prefix: impl Into<String>) -> Self {
    Self { calendar, conversation, prefix: prefix.into() }
  }

  pub fn conversation_mut(&mut self) -> &mut C { &mut self.conversation }

  /// Run one command to completion.
  ///
  /// A failure the operator can still be told about is reported on the
  /// conversation before it is returned.
  pub async fn run(&mut self, command: Command, today: NaiveDate) -> Result<Outcome> {
    let name = command.name().to_string();
    tracing::info!(command = %name, "command started");

    let result = self.dispatch(command, today).await;
    match &result {
      Ok(outcome) => tracing::info!(command = %name, ?outcome, "command finished"),
      Err(e) if e.is_reportable() => {
        tracing::warn!(command = %name, error = %e, "command failed");
        let report = format!("Something went wrong, nothing was saved: {e}");
        self.conversation.send(&report).await?;
      }
      Err(e) => tracing::info!(command = %name, error = %e, "conversation ended mid-command"),
    }
    result
  }

  async fn dispatch(&mut self, command: Command, today: NaiveDate) -> Result<Outcome> {
    match command {
      Command::NewEvent(day) => handlers::event::new_event(self, day, today).await,
      Command::ReviseEvent => handlers::event::revise_event(self).await,
      Command::DeleteEvent => handlers::event::delete_event(self).await,
      Command::NewPeriod => handlers::period::new_period(self).await,
      Command::RevisePeriod => handlers::period::revise_period(self).await,
      Command::DeletePeriod => handlers::period::delete_period(self).await,
      Command::Help => {
        let help = help_text(&self.prefix);
        self.conversation.send(&help).await?;
        Ok(Outcome::Answered)
      }
      Command::Unknown(_) => {
        self.conversation.send(COMMAND_NOT_FOUND).await?;
        Ok(Outcome::Answered)
      }
    }
  }

  /// Wait for the next message that is a command, answering everything else
  /// with silence. `None` once the conversation closes.
  pub async fn next_command(&mut self) -> Option<Command> {
    loop {
      let message = self.conversation.next_message().await.ok()?;
      if let Some(command) = Command::parse(&self.prefix, &message) {
        return Some(command);
      }
      tracing::trace!("ignoring message outside a command");
    }
  }

  /// Serve commands until the conversation closes. Failed commands have
  /// already been reported to the operator and do not end the loop.
  pub async fn serve(mut self, today: impl Fn() -> NaiveDate + Send) {
    loop {
      if self.conversation.idle().await.is_err() {
        break;
      }
      let Some(command) = self.next_command().await else {
        break;
      };
      if let Err(e) = self.run(command, today()).await
        && !e.is_reportable()
      {
        break;
      }
    }
  }
}
