//! An in-process [`Conversation`] over tokio channels.
//!
//! The host keeps the [`ChannelEnds`]: it pushes operator messages into
//! `inbound` and drains replies from `outbound`. Whenever the dialog
//! suspends to wait for input, an [`Outbound::AwaitingInput`] marker is sent,
//! so a request/response host knows when to stop draining and answer.
//! [`Outbound::Idle`] marks the end of a command.

use lifecal_core::conversation::{Conversation, ConversationError};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
  Reply(String),
  /// No command is in progress.
  Idle,
  /// The dialog is suspended until the next inbound message.
  AwaitingInput,
}

/// The engine's side of the channel pair.
pub struct ChannelConversation {
  inbound:  mpsc::UnboundedReceiver<String>,
  outbound: mpsc::UnboundedSender<Outbound>,
}

/// The host's side of the channel pair.
pub struct ChannelEnds {
  pub inbound:  mpsc::UnboundedSender<String>,
  pub outbound: mpsc::UnboundedReceiver<Outbound>,
}

pub fn channel() -> (ChannelConversation, ChannelEnds) {
  let (in_tx, in_rx) = mpsc::unbounded_channel();
  let (out_tx, out_rx) = mpsc::unbounded_channel();
  (
    ChannelConversation { inbound: in_rx, outbound: out_tx },
    ChannelEnds { inbound: in_tx, outbound: out_rx },
  )
}

impl ChannelConversation {
  fn push(&self, item: Outbound) -> Result<(), ConversationError> {
    self.outbound.send(item).map_err(|_| ConversationError::Closed)
  }
}

impl Conversation for ChannelConversation {
  async fn send(&mut self, text: &str) -> Result<(), ConversationError> {
    self.push(Outbound::Reply(text.to_string()))
  }

  async fn next_message(&mut self) -> Result<String, ConversationError> {
    self.push(Outbound::AwaitingInput)?;
    self.inbound.recv().await.ok_or(ConversationError::Closed)
  }

  async fn idle(&mut self) -> Result<(), ConversationError> {
    self.push(Outbound::Idle)
  }
}
