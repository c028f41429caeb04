//! A scripted operator for driving dialogs in tests.

use std::collections::VecDeque;

use lifecal_core::conversation::{Conversation, ConversationError};
use lifecal_store::MemoryStore;

/// Replays canned replies and records everything the engine sends. Running
/// out of replies closes the conversation.
pub(crate) struct Script {
  replies:      VecDeque<String>,
  pub sent:     Vec<String>,
  read:         usize,
  interference: Option<Interference>,
}

/// An edit made to the store by someone else mid-dialog.
struct Interference {
  after: usize,
  store: MemoryStore,
  path:  String,
  text:  String,
}

impl Script {
  pub fn new<I, S>(replies: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      replies:      replies.into_iter().map(Into::into).collect(),
      sent:         Vec::new(),
      read:         0,
      interference: None,
    }
  }

  /// Overwrite `path` in `store` with `text` once the `after`th reply has
  /// been read.
  pub fn interfere(mut self, after: usize, store: &MemoryStore, path: &str, text: &str) -> Self {
    self.interference = Some(Interference {
      after,
      store: store.clone(),
      path: path.to_string(),
      text: text.to_string(),
    });
    self
  }

  pub fn last_sent(&self) -> &str {
    self.sent.last().map(String::as_str).unwrap_or_default()
  }

  pub fn saw(&self, needle: &str) -> bool {
    self.sent.iter().any(|m| m.contains(needle))
  }
}

impl Conversation for Script {
  async fn send(&mut self, text: &str) -> Result<(), ConversationError> {
    self.sent.push(text.to_string());
    Ok(())
  }

  async fn next_message(&mut self) -> Result<String, ConversationError> {
    let reply = self.replies.pop_front().ok_or(ConversationError::Closed)?;
    self.read += 1;
    if let Some(edit) = &self.interference
      && edit.after == self.read
    {
      edit.store.insert(&edit.path, &edit.text).await;
    }
    Ok(reply)
  }
}
