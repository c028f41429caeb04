//! Terminal transport: one operator on stdin/stdout.

use lifecal_core::conversation::{Conversation, ConversationError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

pub struct Console<R, W> {
  lines:  Lines<R>,
  output: W,
}

impl<R, W> Console<R, W>
where
  R: AsyncBufRead + Unpin + Send,
  W: AsyncWrite + Unpin + Send,
{
  pub fn new(input: R, output: W) -> Self {
    Self { lines: input.lines(), output }
  }

  async fn write(&mut self, text: &str) -> Result<(), ConversationError> {
    self.output.write_all(text.as_bytes()).await.map_err(transport)?;
    self.output.flush().await.map_err(transport)
  }
}

fn transport(e: std::io::Error) -> ConversationError {
  ConversationError::Transport(Box::new(e))
}

impl<R, W> Conversation for Console<R, W>
where
  R: AsyncBufRead + Unpin + Send,
  W: AsyncWrite + Unpin + Send,
{
  async fn send(&mut self, text: &str) -> Result<(), ConversationError> {
    self.write(&format!("{text}\n")).await
  }

  async fn next_message(&mut self) -> Result<String, ConversationError> {
    self.write("> ").await?;
    match self.lines.next_line().await.map_err(transport)? {
      Some(line) => Ok(line),
      None => Err(ConversationError::Closed),
    }
  }
}
