//! Fragment grammar: one calendar record as one `<div>`.
//!
//! ```text
//! <div date="mm/dd/yyyy" credit="R">line1<br> line2</div>
//! <div start="mm/dd/yyyy" end="mm/dd/yyyy" color="#RRGGBB">description</div>
//! <div class="base" credit="R" start="mm/dd/yyyy" end="mm/dd/yyyy" hue="H"><i>description</i></div>
//! ```
//!
//! Rendering always produces exactly these shapes. Decoding is lenient about
//! attribute order, quoting, whitespace, and `<br/>` spellings so that
//! documents reformatted by other tools still parse.

use lifecal_core::record::{
  Color, Event, Hue, Period, PeriodStyle, Rating, Record, RecordKind,
  format_date, parse_date,
};

use crate::{
  error::{Error, Result},
  tags::{Tag, TagKind, is_well_formed, matching_close, tags},
};

// ─── Rendering ───────────────────────────────────────────────────────────────

/// Separator between the lines of an event.
pub const LINE_BREAK: &str = "<br> ";

/// Render `record` in its canonical fragment form.
pub fn render(record: &Record) -> String {
  match record {
    Record::Event(e) => render_event(e),
    Record::Period(p) => render_period(p),
  }
}

pub fn render_event(event: &Event) -> String {
  format!(
    r#"<div date="{}" credit="{}">{}</div>"#,
    format_date(event.date),
    event.rating,
    event.lines.join(LINE_BREAK),
  )
}

pub fn render_period(period: &Period) -> String {
  let start = format_date(period.start);
  let end = format_date(period.end);
  match &period.style {
    PeriodStyle::Plain { color } => format!(
      r#"<div start="{start}" end="{end}" color="{color}">{}</div>"#,
      period.description,
    ),
    PeriodStyle::Base { rating, hue } => format!(
      r#"<div class="base" credit="{rating}" start="{start}" end="{end}" hue="{hue}"><i>{}</i></div>"#,
      period.description,
    ),
  }
}

/// Whether `text` can go inside a fragment as written and decode back
/// unchanged. Inline markup such as `<b>` is fine. A `<div>` or `<br>`, a
/// comment, or a `<` that opens no complete tag is not.
pub fn is_embeddable(text: &str) -> bool {
  is_well_formed(text)
    && !tags(text)
      .iter()
      .any(|tag| tag.name.eq_ignore_ascii_case("div") || tag.name.eq_ignore_ascii_case("br"))
}

// ─── Decoding ────────────────────────────────────────────────────────────────

/// Which kind of record an opening `<div>` introduces, if any.
///
/// Events carry `date` and `credit`; periods carry `start` and `end`.
pub(crate) fn classify(tag: &Tag) -> Option<RecordKind> {
  if !tag.is(TagKind::Open, "div") {
    return None;
  }
  if tag.has_attr("date") && tag.has_attr("credit") {
    Some(RecordKind::Event)
  } else if tag.has_attr("start") && tag.has_attr("end") {
    Some(RecordKind::Period)
  } else {
    None
  }
}

/// Index of the `</div>` closing the fragment that opens at `tags[open]`.
///
/// A fragment never contains another fragment, so meeting one first means
/// this fragment's own close tag is missing.
pub(crate) fn fragment_close(tags: &[Tag], open: usize) -> Option<usize> {
  matching_close(tags, open, |inner| classify(inner).is_some())
}

/// Decode the record introduced by `tag` whose inner markup is `inner`.
pub(crate) fn decode(kind: RecordKind, tag: &Tag, inner: &str) -> Result<Record> {
  match kind {
    RecordKind::Event => decode_event(tag, inner).map(Record::Event),
    RecordKind::Period => decode_period(tag, inner).map(Record::Period),
  }
}

fn decode_event(tag: &Tag, inner: &str) -> Result<Event> {
  let date = date_attr(tag, "date")?;
  let rating = Rating::new(int_attr(tag, "credit")?)?;

  let mut lines = split_lines(inner);
  if lines.is_empty() {
    // An event with an empty body is still an event for its date.
    lines.push(String::new());
  }
  Ok(Event { date, rating, lines })
}

fn decode_period(tag: &Tag, inner: &str) -> Result<Period> {
  let start = date_attr(tag, "start")?;
  let end = date_attr(tag, "end")?;

  let is_base = tag
    .attr("class")
    .is_some_and(|c| c.split_ascii_whitespace().any(|c| c == "base"));

  let body = inner.trim();
  let (style, description) = if is_base {
    let style = PeriodStyle::Base {
      rating: Rating::new(int_attr(tag, "credit")?)?,
      hue:    Hue::new(int_attr(tag, "hue")?)?,
    };
    (style, unwrap_italics(body))
  } else {
    let raw = tag.attr("color").ok_or(Error::MissingAttribute("color"))?;
    let color: Color = raw.trim().parse()?;
    (PeriodStyle::Plain { color }, body)
  };

  Ok(Period::new(start, end, description.to_string(), style)?)
}

fn date_attr(tag: &Tag, name: &'static str) -> Result<chrono::NaiveDate> {
  let raw = tag.attr(name).ok_or(Error::MissingAttribute(name))?;
  parse_date(raw).map_err(|_| Error::InvalidAttribute {
    name,
    value: raw.to_string(),
  })
}

fn int_attr(tag: &Tag, name: &'static str) -> Result<i64> {
  let raw = tag.attr(name).ok_or(Error::MissingAttribute(name))?;
  raw.trim().parse().map_err(|_| Error::InvalidAttribute {
    name,
    value: raw.to_string(),
  })
}

/// Split an event body on `<br>` (any spelling), trimming each line and
/// dropping empty ones.
fn split_lines(inner: &str) -> Vec<String> {
  let mut lines = Vec::new();
  let mut line_start = 0;

  for tag in tags(inner) {
    let is_break = tag.name.eq_ignore_ascii_case("br")
      && matches!(tag.kind, TagKind::Open | TagKind::SelfClosing);
    if is_break {
      lines.push(&inner[line_start..tag.start]);
      line_start = tag.end;
    }
  }
  lines.push(&inner[line_start..]);

  lines
    .into_iter()
    .map(str::trim)
    .filter(|l| !l.is_empty())
    .map(str::to_string)
    .collect()
}

/// `<i>text</i>` → `text`, when that one `<i>` encloses the whole body.
/// Anything else is returned unchanged.
fn unwrap_italics(body: &str) -> &str {
  let tags = tags(body);
  let Some(open) = tags.first() else { return body };
  if open.start != 0 || !open.is(TagKind::Open, "i") {
    return body;
  }
  match matching_close(&tags, 0, |_| false) {
    Some(close) if tags[close].end == body.len() => {
      body[open.end..tags[close].start].trim()
    }
    _ => body,
  }
}

// ─── Standalone parsing ──────────────────────────────────────────────────────

/// Parse a single fragment, e.g. one produced by [`render`].
///
/// Leading and trailing whitespace is ignored; anything else around the
/// fragment is an error.
pub fn parse_fragment(markup: &str) -> Result<Record> {
  let trimmed = markup.trim();
  let not_a_fragment = || Error::NotAFragment(trimmed.to_string());

  let tags = tags(trimmed);
  let tag = tags.first().ok_or_else(not_a_fragment)?;
  if tag.start != 0 {
    return Err(not_a_fragment());
  }
  let kind = classify(tag).ok_or_else(not_a_fragment)?;
  let close = &tags[fragment_close(&tags, 0).ok_or(Error::Unclosed)?];
  if close.end != trimmed.len() {
    return Err(not_a_fragment());
  }
  decode(kind, tag, &trimmed[tag.end..close.start])
}
