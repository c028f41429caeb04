//! Record builders: the dialogs that assemble one event or one period.
//!
//! Builders only talk to the operator. They never read or write the
//! calendar; the caller decides what happens to the record they return.

use chrono::NaiveDate;
use lifecal_core::{
  conversation::Conversation,
  record::{Event, Hue, Period, PeriodStyle, Rating},
};
use lifecal_markup::{render_event, render_period};

use crate::{
  Result,
  prompt::{self, Decision},
};

/// Reply that ends the "add another line" loop.
pub const NO_MORE_LINES: &str = "no";
/// Reply that ends the line revision loop.
pub const DONE_REVISING: &str = "done";

/// Options of the "is this a base period?" question, in prompt order.
pub const BASE_PERIOD_OPTIONS: [&str; 2] = ["yes", "no"];
/// The [`BASE_PERIOD_OPTIONS`] index that selects a base period.
pub const BASE_PERIOD_CHOICE: usize = 0;

pub const ANOTHER_LINE: &str =
  r#"Do you want to add another event? If so, what is it? If not, type "No""#;
pub const RATE_DAY: &str = "On a scale from 0 to 100, how would you rate your day?";
pub const ADD_EVENT: &str = "Do you want to add this event to the calendar? (yes/no/revise)";
pub const WHICH_LINE: &str =
  r#"Which event do you want to revise (enter the number)? (or type "done" to finish)"#;
pub const WONT_ADD: &str = "Okay, I won't add it. Bye!";

pub const DESCRIBE_PERIOD: &str = "How would you describe this period in one sentence?";
pub const IS_BASE: &str = "Is this a base period? (yes/no)";
pub const RATE_PERIOD: &str = "On a scale from 0 to 100, how would you rate this period?";
pub const PICK_HUE: &str = "What hue should it be drawn with (0 to 360)?";
pub const PICK_COLOR: &str = "What color should it be drawn with (hex, e.g. #1a2b3c)?";

// ─── Events ──────────────────────────────────────────────────────────────────

/// Collect the lines and rating of an event on `date`, then let the operator
/// accept it, drop it, or revise individual lines.
///
/// The caller has already asked for the first line. Returns `None` when the
/// operator declines.
pub async fn build_event<C: Conversation>(
  conv: &mut C,
  date: NaiveDate,
) -> Result<Option<Event>> {
  let mut lines = vec![prompt::read_text(conv, None).await?];
  loop {
    let line = prompt::read_text(conv, Some(ANOTHER_LINE)).await?;
    if line.eq_ignore_ascii_case(NO_MORE_LINES) {
      break;
    }
    lines.push(line);
  }

  let rating = prompt::read_int(conv, Some(RATE_DAY), Some(0..=Rating::MAX)).await?;
  let mut event = Event::new(date, Rating::new(rating)?, lines)?;

  loop {
    let shown = format!("Here is the new event you added:\n\n{}", render_event(&event));
    conv.send(&shown).await?;
    match prompt::choose_variant::<_, Decision>(conv, Some(ADD_EVENT)).await? {
      Decision::Yes => return Ok(Some(event)),
      Decision::No => {
        conv.send(WONT_ADD).await?;
        return Ok(None);
      }
      Decision::Revise => revise_lines(conv, &mut event.lines).await?,
    }
  }
}

/// Replace lines by 1-based index until the operator says they are done.
async fn revise_lines<C: Conversation>(conv: &mut C, lines: &mut [String]) -> Result<()> {
  let count = lines.len() as i64;
  loop {
    conv.send(WHICH_LINE).await?;
    let reply = conv.next_message().await?;
    if reply.trim().eq_ignore_ascii_case(DONE_REVISING) {
      return Ok(());
    }

    let Some(index) = prompt::parse_int(&reply, Some(&(1..=count))) else {
      let invalid =
        format!("Invalid event number. Please enter a number between 1 and {count}.");
      conv.send(&invalid).await?;
      continue;
    };

    let ask = format!("Okay, what do you want to change event {index} to?");
    let replacement = prompt::read_text(conv, Some(&ask)).await?;
    lines[(index - 1) as usize] = replacement;
  }
}

// ─── Periods ─────────────────────────────────────────────────────────────────

/// Collect the description and style of a period spanning `start..=end`.
///
/// There is no confirmation step here; callers show the result and ask.
pub async fn build_period<C: Conversation>(
  conv: &mut C,
  start: NaiveDate,
  end: NaiveDate,
) -> Result<Period> {
  let description = prompt::read_text(conv, Some(DESCRIBE_PERIOD)).await?;

  let choice = prompt::choose(conv, Some(IS_BASE), &BASE_PERIOD_OPTIONS).await?;
  let style = if choice == BASE_PERIOD_CHOICE {
    let rating = prompt::read_int(conv, Some(RATE_PERIOD), Some(0..=Rating::MAX)).await?;
    let hue = prompt::read_int(conv, Some(PICK_HUE), Some(0..=Hue::MAX)).await?;
    PeriodStyle::Base {
      rating: Rating::new(rating)?,
      hue:    Hue::new(hue)?,
    }
  } else {
    PeriodStyle::Plain {
      color: prompt::read_color(conv, Some(PICK_COLOR)).await?,
    }
  };

  Ok(Period::new(start, end, description, style)?)
}

/// Show `period` under `heading`, then ask the yes/no `question`.
pub async fn confirm_period<C: Conversation>(
  conv: &mut C,
  period: &Period,
  heading: &str,
  question: &str,
) -> Result<bool> {
  conv.send(&format!("{heading}\n\n{}", render_period(period))).await?;
  prompt::confirm(conv, question).await
}
