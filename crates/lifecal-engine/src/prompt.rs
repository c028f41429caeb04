//! Input validators.
//!
//! Each reader optionally sends a prompt, then reads replies until one
//! parses, sending a guidance message after every rejected reply. Invalid
//! input is therefore never an error here; only a closed channel is.

use std::ops::RangeInclusive;

use chrono::NaiveDate;
use lifecal_core::{
  conversation::Conversation,
  record::{Color, format_date, parse_date},
};
use lifecal_markup::is_embeddable;
use strum::{IntoEnumIterator, VariantNames};

use crate::Result;

pub const DATE_GUIDANCE: &str =
  "Please enter a valid date in the format mm/dd/yyyy.";
pub const COLOR_GUIDANCE: &str =
  "Please enter a hex color such as #1a2b3c or #abc.";
pub const TEXT_GUIDANCE: &str =
  "That would break the calendar. Please leave out <div>, <br> and comments, and write &lt; for a lone <.";
pub const BLANK_GUIDANCE: &str = "Please enter some text.";

// ─── Choices ─────────────────────────────────────────────────────────────────

/// A plain yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter, strum::VariantNames)]
#[strum(serialize_all = "lowercase")]
pub enum Confirm {
  Yes,
  No,
}

impl Confirm {
  pub fn is_yes(self) -> bool { self == Self::Yes }
}

/// The answer to "add this event?", which can also send the operator back
/// to edit individual lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter, strum::VariantNames)]
#[strum(serialize_all = "lowercase")]
pub enum Decision {
  Yes,
  No,
  Revise,
}

// ─── Pure parsers ────────────────────────────────────────────────────────────

/// An integer, optionally restricted to `range`. Surrounding whitespace is
/// ignored; fractions and signs other than a leading `-` are not.
pub fn parse_int(reply: &str, range: Option<&RangeInclusive<i64>>) -> Option<i64> {
  let n: i64 = reply.trim().parse().ok()?;
  match range {
    Some(r) if !r.contains(&n) => None,
    _ => Some(n),
  }
}

/// Index of the option `reply` names, case-insensitively.
pub fn match_option(reply: &str, options: &[&str]) -> Option<usize> {
  let reply = reply.trim();
  options.iter().position(|o| o.eq_ignore_ascii_case(reply))
}

/// `"yes or no"`, `"yes, no or revise"`.
pub fn list_options(options: &[&str]) -> String {
  match options {
    [] => String::new(),
    [only] => (*only).to_string(),
    [init @ .., last] => format!("{} or {last}", init.join(", ")),
  }
}

fn range_guidance(range: Option<&RangeInclusive<i64>>) -> String {
  match range {
    Some(r) => format!("Please enter a number between {} and {}.", r.start(), r.end()),
    None => "Please enter a whole number.".to_string(),
  }
}

// ─── Readers ─────────────────────────────────────────────────────────────────

/// Send `prompt` (if any), then read until `parse` accepts a reply. A
/// rejected reply is answered with the guidance `parse` returns.
pub async fn ask<C, T, F>(conv: &mut C, prompt: Option<&str>, mut parse: F) -> Result<T>
where
  C: Conversation,
  F: FnMut(&str) -> Result<T, String> + Send,
{
  if let Some(prompt) = prompt {
    conv.send(prompt).await?;
  }
  loop {
    let reply = conv.next_message().await?;
    match parse(&reply) {
      Ok(value) => return Ok(value),
      Err(guidance) => {
        tracing::debug!(reply = %reply, "rejected reply");
        conv.send(&guidance).await?;
      }
    }
  }
}

/// Non-blank free text that is safe to embed in a fragment.
pub async fn read_text<C: Conversation>(conv: &mut C, prompt: Option<&str>) -> Result<String> {
  ask(conv, prompt, |reply| {
    let text = reply.trim();
    if text.is_empty() {
      Err(BLANK_GUIDANCE.to_string())
    } else if !is_embeddable(text) {
      Err(TEXT_GUIDANCE.to_string())
    } else {
      Ok(text.to_string())
    }
  })
  .await
}

pub async fn read_date<C: Conversation>(conv: &mut C, prompt: Option<&str>) -> Result<NaiveDate> {
  ask(conv, prompt, |reply| parse_date(reply).map_err(|_| DATE_GUIDANCE.to_string())).await
}

/// A date no earlier than `earliest`, for the end of a period.
pub async fn read_date_not_before<C: Conversation>(
  conv: &mut C,
  prompt: Option<&str>,
  earliest: NaiveDate,
) -> Result<NaiveDate> {
  ask(conv, prompt, |reply| {
    let date = parse_date(reply).map_err(|_| DATE_GUIDANCE.to_string())?;
    if date < earliest {
      return Err(format!(
        "The end date can't be before the start date ({}). Please enter another date.",
        format_date(earliest),
      ));
    }
    Ok(date)
  })
  .await
}

pub async fn read_color<C: Conversation>(conv: &mut C, prompt: Option<&str>) -> Result<Color> {
  ask(conv, prompt, |reply| {
    reply.trim().parse::<Color>().map_err(|_| COLOR_GUIDANCE.to_string())
  })
  .await
}

pub async fn read_int<C: Conversation>(
  conv: &mut C,
  prompt: Option<&str>,
  range: Option<RangeInclusive<i64>>,
) -> Result<i64> {
  let guidance = range_guidance(range.as_ref());
  ask(conv, prompt, |reply| {
    parse_int(reply, range.as_ref()).ok_or_else(|| guidance.clone())
  })
  .await
}

/// The index into `options` of the option the operator picked.
pub async fn choose<C: Conversation>(
  conv: &mut C,
  prompt: Option<&str>,
  options: &[&str],
) -> Result<usize> {
  let guidance = format!("Please enter {}.", list_options(options));
  ask(conv, prompt, |reply| {
    match_option(reply, options).ok_or_else(|| guidance.clone())
  })
  .await
}

/// [`choose`] over the variants of an enum, named by their `strum`
/// serialization.
pub async fn choose_variant<C, T>(conv: &mut C, prompt: Option<&str>) -> Result<T>
where
  C: Conversation,
  T: IntoEnumIterator + VariantNames,
{
  let guidance = format!("Please enter {}.", list_options(T::VARIANTS));
  ask(conv, prompt, |reply| {
    match_option(reply, T::VARIANTS)
      .and_then(|index| T::iter().nth(index))
      .ok_or_else(|| guidance.clone())
  })
  .await
}

/// A yes/no question.
pub async fn confirm<C: Conversation>(conv: &mut C, prompt: &str) -> Result<bool> {
  Ok(choose_variant::<_, Confirm>(conv, Some(prompt)).await?.is_yes())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_helpers::Script;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn parse_int_honours_range() {
    let r = 0..=100;
    assert_eq!(parse_int(" 75 ", Some(&r)), Some(75));
    assert_eq!(parse_int("100", Some(&r)), Some(100));
    assert_eq!(parse_int("101", Some(&r)), None);
    assert_eq!(parse_int("7.5", Some(&r)), None);
    assert_eq!(parse_int("-3", None), Some(-3));
  }

  #[test]
  fn options_match_case_insensitively() {
    assert_eq!(match_option("YES", &["yes", "no"]), Some(0));
    assert_eq!(match_option("Revise", &["yes", "no", "revise"]), Some(2));
    assert_eq!(match_option("yep", &["yes", "no"]), None);
  }

  #[test]
  fn lists_options_in_prose() {
    assert_eq!(list_options(&["yes", "no"]), "yes or no");
    assert_eq!(list_options(&["yes", "no", "revise"]), "yes, no or revise");
  }

  #[tokio::test]
  async fn date_reader_retries_until_valid() {
    let mut conv = Script::new(["tomorrow", "02/30/2024", "02/29/2024"]);
    let got = read_date(&mut conv, Some("When?")).await.unwrap();
    assert_eq!(got, date(2024, 2, 29));
    assert_eq!(conv.sent, ["When?", DATE_GUIDANCE, DATE_GUIDANCE]);
  }

  #[tokio::test]
  async fn end_date_before_start_is_reprompted() {
    let mut conv = Script::new(["02/01/2024", "03/10/2024"]);
    let got = read_date_not_before(&mut conv, None, date(2024, 3, 1))
      .await
      .unwrap();
    assert_eq!(got, date(2024, 3, 10));
    assert_eq!(conv.sent.len(), 1);
    assert!(conv.sent[0].contains("03/01/2024"));
  }

  #[tokio::test]
  async fn int_reader_reports_its_range() {
    let mut conv = Script::new(["150", "abc", "42"]);
    let got = read_int(&mut conv, None, Some(0..=100)).await.unwrap();
    assert_eq!(got, 42);
    assert_eq!(conv.sent, [
      "Please enter a number between 0 and 100.",
      "Please enter a number between 0 and 100.",
    ]);
  }

  #[tokio::test]
  async fn choose_returns_position_of_option() {
    let mut conv = Script::new(["maybe", "No"]);
    let got = choose(&mut conv, None, &["yes", "no"]).await.unwrap();
    assert_eq!(got, 1);
    assert_eq!(conv.sent, ["Please enter yes or no."]);
  }

  #[tokio::test]
  async fn choose_variant_maps_names_to_variants() {
    let mut conv = Script::new(["revise"]);
    let got = choose_variant::<_, Decision>(&mut conv, None).await.unwrap();
    assert_eq!(got, Decision::Revise);
  }

  #[tokio::test]
  async fn color_reader_rejects_non_hex() {
    let mut conv = Script::new(["red", "#ABC"]);
    let got = read_color(&mut conv, None).await.unwrap();
    assert_eq!(got.as_str(), "#ABC");
    assert_eq!(conv.sent, [COLOR_GUIDANCE]);
  }

  #[tokio::test]
  async fn text_reader_rejects_div_markup() {
    let mut conv = Script::new(["<div>sneaky</div>", "  fine <i>text</i> "]);
    let got = read_text(&mut conv, None).await.unwrap();
    assert_eq!(got, "fine <i>text</i>");
    assert_eq!(conv.sent, [TEXT_GUIDANCE]);
  }

  #[tokio::test]
  async fn text_reader_rejects_an_unterminated_comment() {
    let mut conv = Script::new(["I <3 html <!-- wow", "I love html"]);
    let got = read_text(&mut conv, None).await.unwrap();
    assert_eq!(got, "I love html");
    assert_eq!(conv.sent, [TEXT_GUIDANCE]);
  }

  #[tokio::test]
  async fn text_reader_rejects_blank_replies() {
    let mut conv = Script::new(["", "   ", "b"]);
    let got = read_text(&mut conv, None).await.unwrap();
    assert_eq!(got, "b");
    assert_eq!(conv.sent, [BLANK_GUIDANCE, BLANK_GUIDANCE]);
  }

  #[tokio::test]
  async fn closed_channel_ends_the_read() {
    let mut conv = Script::new(["nope"]);
    let err = read_date(&mut conv, None).await.unwrap_err();
    assert!(matches!(err, crate::Error::SessionClosed));
  }
}
