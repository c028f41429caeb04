//! Command handlers, one per operator verb.
//!
//! Every handler walks the same shape: collect the key, look it up, then
//! either build a new record or offer to revise/delete the one found, and
//! finally commit or decline. Nothing is written until the last confirmation.

pub mod event;
pub mod period;

use lifecal_core::{conversation::Conversation, store::DocumentStore};
use lifecal_markup::FragmentId;

use crate::{Checkout, Outcome, Result, Session};

/// Write `checkout` back with `message` and tell the operator `success`.
async fn commit<S, C>(
  session: &mut Session<S, C>,
  checkout: Checkout,
  message: &str,
  success: &str,
) -> Result<Outcome>
where
  S: DocumentStore,
  C: Conversation,
{
  let version = session.calendar.write(checkout, message).await?;
  session.conversation.send(success).await?;
  Ok(Outcome::Committed { version })
}

/// Tell the operator nothing will change.
async fn decline<C: Conversation>(conv: &mut C, reply: &str) -> Result<Outcome> {
  conv.send(reply).await?;
  Ok(Outcome::Declined)
}

/// The markup of the fragment at `id`, as the operator last saw it.
fn shown(checkout: &Checkout, id: FragmentId) -> String {
  checkout
    .document
    .fragment(id)
    .map(|f| f.markup().to_string())
    .unwrap_or_default()
}
