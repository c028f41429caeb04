//! One long-lived session per channel, driven one message at a time.
//!
//! Each channel gets its own [`Session`] running on a tokio task, connected
//! by a [`ChannelConversation`]. Delivering a message pushes it into the
//! session and collects replies until the session suspends again, which
//! turns the engine's suspended dialogs into plain request/response calls.

use std::{collections::HashMap, sync::Arc};

use lifecal_core::store::DocumentStore;
use lifecal_engine::{
  Calendar, Session,
  channel::{self as transport, ChannelEnds, Outbound},
};
use serde::Serialize;
use tokio::sync::Mutex;

/// What one inbound message produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Exchange {
  pub replies:        Vec<String>,
  /// True while a command is waiting for the operator's answer.
  pub awaiting_input: bool,
}

struct Link {
  ends: ChannelEnds,
  /// No command is in progress.
  idle: bool,
}

impl Link {
  /// Drain the session's output up to its next suspension. `None` once the
  /// session has ended.
  async fn drain(&mut self, replies: &mut Vec<String>) -> Option<()> {
    loop {
      match self.ends.outbound.recv().await? {
        Outbound::Reply(text) => {
          self.idle = false;
          replies.push(text);
        }
        Outbound::Idle => self.idle = true,
        Outbound::AwaitingInput => return Some(()),
      }
    }
  }
}

pub struct Dispatcher<S> {
  calendar: Calendar<S>,
  prefix:   String,
  links:    Mutex<HashMap<String, Arc<Mutex<Link>>>>,
}

impl<S> Dispatcher<S>
where
  S: DocumentStore + 'static,
{
  pub fn new(calendar: Calendar<S>, prefix: impl Into<String>) -> Self {
    Self {
      calendar,
      prefix: prefix.into(),
      links: Mutex::new(HashMap::new()),
    }
  }

  /// Deliver `text` from `channel` and wait for the session to answer.
  ///
  /// Messages on one channel are handled strictly in order; channels do not
  /// wait on each other.
  pub async fn deliver(&self, channel: &str, text: &str) -> Exchange {
    let link = self.link(channel).await;
    let mut link = link.lock().await;

    let mut exchange = Exchange::default();
    let delivered = link.ends.inbound.send(text.to_string()).is_ok();
    if delivered && link.drain(&mut exchange.replies).await.is_some() {
      exchange.awaiting_input = !link.idle;
    } else {
      tracing::info!(channel, "session ended");
      self.links.lock().await.remove(channel);
    }
    exchange
  }

  /// The link for `channel`, starting a session if there is none.
  async fn link(&self, channel: &str) -> Arc<Mutex<Link>> {
    let mut links = self.links.lock().await;
    if let Some(link) = links.get(channel) {
      return Arc::clone(link);
    }

    let (conversation, ends) = transport::channel();
    let session = Session::new(self.calendar.clone(), conversation, self.prefix.clone());
    tokio::spawn(session.serve(|| chrono::Local::now().date_naive()));
    tracing::info!(channel, "session started");

    // Wait for the session to ask for its first command so that every later
    // suspension marker answers exactly one delivered message.
    let mut link = Link { ends, idle: true };
    link.drain(&mut Vec::new()).await;

    let link = Arc::new(Mutex::new(link));
    links.insert(channel.to_string(), Arc::clone(&link));
    link
  }
}
