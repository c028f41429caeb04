//! The `Conversation` trait: one operator, one channel, one message at a
//! time.
//!
//! Every dialog in the engine is written against this trait. A transport
//! implements it by forwarding `send` to the operator and resolving
//! `next_message` when the operator's next message arrives on the channel.

use std::future::Future;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConversationError {
  /// The session was torn down while a dialog was waiting for input.
  #[error("conversation closed")]
  Closed,

  #[error("conversation transport error: {0}")]
  Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A suspended-until-input text channel to a single operator.
///
/// At most one `next_message` call is outstanding at a time; messages arrive
/// in the order the operator sent them.
pub trait Conversation: Send {
  /// Send `text` to the operator.
  fn send<'a>(
    &'a mut self,
    text: &'a str,
  ) -> impl Future<Output = Result<(), ConversationError>> + Send + 'a;

  /// Wait for the operator's next message.
  fn next_message(
    &mut self,
  ) -> impl Future<Output = Result<String, ConversationError>> + Send + '_;

  /// Called when no command is in progress, right before the next message
  /// is read as a new command.
  fn idle(&mut self) -> impl Future<Output = Result<(), ConversationError>> + Send + '_ {
    async { Ok(()) }
  }
}
