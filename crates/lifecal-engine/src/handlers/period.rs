//! `new_period`, `revise_period`, `delete_period`.

use chrono::NaiveDate;
use lifecal_core::{
  conversation::Conversation,
  record::format_date,
  store::DocumentStore,
};
use lifecal_markup::FragmentId;

use super::{commit, decline, shown};
use crate::{
  Checkout, Outcome, Result, Session,
  builder::{self, WONT_ADD},
  prompt,
};

pub const TELL_ME: &str = "Sure. Tell me about this period.";
pub const OFFER_ADD: &str =
  "No period found for those dates. Do you want to add a new period for them? (yes/no)";
pub const CONFIRM_ADD: &str = "Do you want to add this period to the calendar? (yes/no)";
pub const CONFIRM_REVISE: &str = "Do you want to revise this period? (yes/no)";
pub const CONFIRM_SAVE: &str = "Do you want to save this period to the calendar? (yes/no)";
pub const CONFIRM_DELETE: &str = "Do you want to delete this period? (yes/no)";

pub const ADDED: &str = "Successfully added the period!";
pub const REVISED: &str = "Successfully revised the period!";
pub const DELETED: &str = "Successfully deleted the period!";

/// Dates as they appear in commit messages: `03/01/2024 - 03/10/2024`.
fn span(start: NaiveDate, end: NaiveDate) -> String {
  format!("{} - {}", format_date(start), format_date(end))
}

/// Ask for a start date, then an end date no earlier than it.
async fn read_range<C: Conversation>(
  conv: &mut C,
  purpose: &str,
) -> Result<(NaiveDate, NaiveDate)> {
  let ask_start =
    format!("Please enter the start date of the period {purpose} (format: mm/dd/yyyy):");
  let start = prompt::read_date(conv, Some(&ask_start)).await?;
  let end = prompt::read_date_not_before(
    conv,
    Some("Please enter the end date of the period (format: mm/dd/yyyy):"),
    start,
  )
  .await?;
  Ok((start, end))
}

/// Record a period. A range that already has one is offered for revision.
pub async fn new_period<S, C>(session: &mut Session<S, C>) -> Result<Outcome>
where
  S: DocumentStore,
  C: Conversation,
{
  let (start, end) = read_range(&mut session.conversation, "to be added").await?;
  let checkout = session.calendar.read().await?;

  match checkout.document.find_period(start, end) {
    Some(id) => {
      let existing = format!(
        "A period for {} already exists:\n\n{}",
        span(start, end),
        shown(&checkout, id),
      );
      session.conversation.send(&existing).await?;
      revise_found(session, checkout, id, (start, end)).await
    }
    None => {
      let message = format!("Update periods for {}", span(start, end));
      create(session, checkout, (start, end), &message).await
    }
  }
}

pub async fn revise_period<S, C>(session: &mut Session<S, C>) -> Result<Outcome>
where
  S: DocumentStore,
  C: Conversation,
{
  let (start, end) = read_range(&mut session.conversation, "to be revised").await?;
  let checkout = session.calendar.read().await?;

  let Some(id) = checkout.document.find_period(start, end) else {
    if prompt::confirm(&mut session.conversation, OFFER_ADD).await? {
      let message = format!("Revise periods for {}", span(start, end));
      return create(session, checkout, (start, end), &message).await;
    }
    return decline(&mut session.conversation, WONT_ADD).await;
  };

  let found = format!(
    "The following period was found for {}:\n\n{}",
    span(start, end),
    shown(&checkout, id),
  );
  session.conversation.send(&found).await?;
  revise_found(session, checkout, id, (start, end)).await
}

pub async fn delete_period<S, C>(session: &mut Session<S, C>) -> Result<Outcome>
where
  S: DocumentStore,
  C: Conversation,
{
  let (start, end) = read_range(&mut session.conversation, "to be deleted").await?;
  let mut checkout = session.calendar.read().await?;

  let Some(id) = checkout.document.find_period(start, end) else {
    return decline(&mut session.conversation, "No period found for those dates. Bye!").await;
  };

  let found = format!(
    "The following period was found for {}:\n\n{}",
    span(start, end),
    shown(&checkout, id),
  );
  session.conversation.send(&found).await?;
  if !prompt::confirm(&mut session.conversation, CONFIRM_DELETE).await? {
    return decline(&mut session.conversation, "Okay, I won't delete it. Bye!").await;
  }

  checkout.document.remove(id)?;
  let message = format!("Delete periods for {}", span(start, end));
  commit(session, checkout, &message, DELETED).await
}

// ─── Shared steps ────────────────────────────────────────────────────────────

async fn create<S, C>(
  session: &mut Session<S, C>,
  mut checkout: Checkout,
  (start, end): (NaiveDate, NaiveDate),
  message: &str,
) -> Result<Outcome>
where
  S: DocumentStore,
  C: Conversation,
{
  let conv = &mut session.conversation;
  conv.send(TELL_ME).await?;
  let period = builder::build_period(conv, start, end).await?;
  let heading = "Here is the new period you added:";
  if !builder::confirm_period(conv, &period, heading, CONFIRM_ADD).await? {
    return decline(conv, WONT_ADD).await;
  }

  checkout.document.insert_period(period);
  commit(session, checkout, message, ADDED).await
}

async fn revise_found<S, C>(
  session: &mut Session<S, C>,
  mut checkout: Checkout,
  id: FragmentId,
  (start, end): (NaiveDate, NaiveDate),
) -> Result<Outcome>
where
  S: DocumentStore,
  C: Conversation,
{
  let conv = &mut session.conversation;
  if !prompt::confirm(conv, CONFIRM_REVISE).await? {
    return decline(conv, "Okay, I won't revise it. Bye!").await;
  }

  conv.send(super::event::CHANGE_TO).await?;
  let period = builder::build_period(conv, start, end).await?;
  let heading = "Here is the revised period:";
  if !builder::confirm_period(conv, &period, heading, CONFIRM_SAVE).await? {
    return decline(conv, "Okay, I won't revise it. Bye!").await;
  }

  checkout.document.replace(id, period)?;
  let message = format!("Revise periods for {}", span(start, end));
  commit(session, checkout, &message, REVISED).await
}
