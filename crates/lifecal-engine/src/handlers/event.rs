//! `new_event`, `revise_event`, `delete_event`.

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
  command::EventDay,
  prompt,
};

pub const WHAT_EVENTS: &str = "Sure. So what events do you want to add?";
pub const ASK_NEW_DATE: &str = "Please enter the date of the new event (format: mm/dd/yyyy):";
pub const ASK_REVISE_DATE: &str =
  "Please enter the date of the event to be revised (format: mm/dd/yyyy):";
pub const ASK_DELETE_DATE: &str =
  "Please enter the date of the event to be deleted (format: mm/dd/yyyy):";
pub const OFFER_ADD: &str =
  "No events found for that date. Do you want to add a new event for that date? (yes/no)";
pub const CONFIRM_REVISE: &str = "Do you want to revise this event? (yes/no)";
pub const CONFIRM_DELETE: &str = "Do you want to delete this event? (yes/no)";
pub const CHANGE_TO: &str = "Okay, what do you want to change it to?";

pub const ADDED: &str = "Successfully added events for the date!";
pub const REVISED: &str = "Successfully revised events for the date!";
pub const DELETED: &str = "Successfully deleted events for the date!";

/// Record the events of one day. A day that already has events is offered
/// for revision instead of getting a second fragment.
pub async fn new_event<S, C>(
  session: &mut Session<S, C>,
  day: EventDay,
  today: NaiveDate,
) -> Result<Outcome>
where
  S: DocumentStore,
  C: Conversation,
{
  let date = match day {
    EventDay::Today => today,
    EventDay::On(date) => date,
    EventDay::Ask => prompt::read_date(&mut session.conversation, Some(ASK_NEW_DATE)).await?,
  };

  let checkout = session.calendar.read().await?;
  match checkout.document.find_event(date) {
    Some(id) => {
      let existing = format!(
        "You already have events for {}:\n\n{}",
        format_date(date),
        shown(&checkout, id),
      );
      session.conversation.send(&existing).await?;
      revise_found(session, checkout, id, date).await
    }
    None => {
      let message = format!("Update events for {}", format_date(date));
      create(session, checkout, date, &message).await
    }
  }
}

pub async fn revise_event<S, C>(session: &mut Session<S, C>) -> Result<Outcome>
where
  S: DocumentStore,
  C: Conversation,
{
  let date = prompt::read_date(&mut session.conversation, Some(ASK_REVISE_DATE)).await?;
  let checkout = session.calendar.read().await?;

  let Some(id) = checkout.document.find_event(date) else {
    if prompt::confirm(&mut session.conversation, OFFER_ADD).await? {
      let message = format!("Revise events for {}", format_date(date));
      return create(session, checkout, date, &message).await;
    }
    return decline(&mut session.conversation, WONT_ADD).await;
  };

  let found = format!(
    "The following events were found for {}:\n\n{}",
    format_date(date),
    shown(&checkout, id),
  );
  session.conversation.send(&found).await?;
  revise_found(session, checkout, id, date).await
}

pub async fn delete_event<S, C>(session: &mut Session<S, C>) -> Result<Outcome>
where
  S: DocumentStore,
  C: Conversation,
{
  let date = prompt::read_date(&mut session.conversation, Some(ASK_DELETE_DATE)).await?;
  let mut checkout = session.calendar.read().await?;

  let Some(id) = checkout.document.find_event(date) else {
    return decline(&mut session.conversation, "No events found for that date. Bye!").await;
  };

  let found = format!(
    "The following events were found for {}:\n\n{}",
    format_date(date),
    shown(&checkout, id),
  );
  session.conversation.send(&found).await?;
  if !prompt::confirm(&mut session.conversation, CONFIRM_DELETE).await? {
    return decline(&mut session.conversation, "Okay, I won't delete it. Bye!").await;
  }

  checkout.document.remove(id)?;
  let message = format!("Delete events for {}", format_date(date));
  commit(session, checkout, &message, DELETED).await
}

// ─── Shared steps ────────────────────────────────────────────────────────────

/// Build a fresh event for `date` and insert it in date order.
async fn create<S, C>(
  session: &mut Session<S, C>,
  mut checkout: Checkout,
  date: NaiveDate,
  message: &str,
) -> Result<Outcome>
where
  S: DocumentStore,
  C: Conversation,
{
  session.conversation.send(WHAT_EVENTS).await?;
  let Some(event) = builder::build_event(&mut session.conversation, date).await? else {
    return Ok(Outcome::Declined);
  };
  checkout.document.insert_event(event);
  commit(session, checkout, message, ADDED).await
}

/// Offer to rebuild the event at `id` from scratch and swap it in place.
async fn revise_found<S, C>(
  session: &mut Session<S, C>,
  mut checkout: Checkout,
  id: FragmentId,
  date: NaiveDate,
) -> Result<Outcome>
where
  S: DocumentStore,
  C: Conversation,
{
  if !prompt::confirm(&mut session.conversation, CONFIRM_REVISE).await? {
    return decline(&mut session.conversation, "Okay, I won't revise it. Bye!").await;
  }

  session.conversation.send(CHANGE_TO).await?;
  let Some(event) = builder::build_event(&mut session.conversation, date).await? else {
    return Ok(Outcome::Declined);
  };
  checkout.document.replace(id, event)?;
  let message = format!("Revise events for {}", format_date(date));
  commit(session, checkout, &message, REVISED).await
}
