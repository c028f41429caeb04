//! The calendar document: calendar fragments embedded in arbitrary HTML.
//!
//! Pipeline:
//!   raw &str
//!     └─ Document::parse()   → segments (opaque text | decoded fragment)
//!          └─ find / insert_ordered / replace / remove
//!               └─ Document::render() → String
//!
//! Text between fragments is kept byte for byte, and so is the markup of every
//! fragment that was not touched. `parse(text).render() == text` for any
//! input.

use chrono::NaiveDate;
use lifecal_core::record::{Event, Period, Record, RecordKind};

use crate::{
  error::{Error, Result},
  fragment::{classify, decode, fragment_close, render},
  tags::{TagKind, matching_close, tags},
};

/// Indentation added inside a container that had no fragments yet.
const NESTED_INDENT: &str = "  ";

// ─── Fragments ───────────────────────────────────────────────────────────────

/// Position of a fragment inside a [`Document`].
///
/// Ids are invalidated by any mutation of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FragmentId(usize);

/// A decoded record together with the exact markup it occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
  record: Record,
  markup: String,
}

impl Fragment {
  /// A fresh fragment in canonical form.
  pub fn new(record: impl Into<Record>) -> Self {
    let record = record.into();
    let markup = render(&record);
    Self { record, markup }
  }

  pub fn record(&self) -> &Record { &self.record }

  pub fn markup(&self) -> &str { &self.markup }
}

/// A `<div>` that looked like a fragment but could not be decoded. It stays in
/// the document as plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFragment {
  /// Byte offset of the `<div` in the parsed text.
  pub offset: usize,
  pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
  Text(String),
  Fragment(Fragment),
}

// ─── Document ────────────────────────────────────────────────────────────────

/// A parsed calendar document.
///
/// Segments alternate: no two text segments are adjacent and none is empty.
#[derive(Debug, Clone, Default)]
pub struct Document {
  segments: Vec<Segment>,
  skipped:  Vec<SkippedFragment>,
}

impl Document {
  pub fn parse(text: &str) -> Self {
    let tags = tags(text);
    let mut doc = Self::default();
    let mut text_start = 0;
    let mut next = 0;

    while let Some(tag) = tags.get(next) {
      let open = next;
      next += 1;
      let Some(kind) = classify(tag) else { continue };

      let decoded = fragment_close(&tags, open)
        .ok_or(Error::Unclosed)
        .and_then(|close| {
          decode(kind, tag, &text[tag.end..tags[close].start]).map(|record| (record, close))
        });

      match decoded {
        Ok((record, close)) => {
          let close_end = tags[close].end;
          doc.push_text(&text[text_start..tag.start]);
          doc.segments.push(Segment::Fragment(Fragment {
            record,
            markup: text[tag.start..close_end].to_string(),
          }));
          text_start = close_end;
          next = close + 1;
        }
        Err(e) => doc.skipped.push(SkippedFragment {
          offset: tag.start,
          reason: e.to_string(),
        }),
      }
    }
    doc.push_text(&text[text_start..]);
    doc
  }

  pub fn render(&self) -> String {
    let mut out = String::new();
    for segment in &self.segments {
      match segment {
        Segment::Text(t) => out.push_str(t),
        Segment::Fragment(f) => out.push_str(&f.markup),
      }
    }
    out
  }

  /// Fragment-shaped `<div>`s that failed to decode during [`Self::parse`].
  pub fn skipped(&self) -> &[SkippedFragment] { &self.skipped }

  // ── Lookup ──────────────────────────────────────────────────────────────

  /// Every fragment in document order.
  pub fn fragments(&self) -> impl Iterator<Item = (FragmentId, &Fragment)> {
    self.segments.iter().enumerate().filter_map(|(i, s)| match s {
      Segment::Fragment(f) => Some((FragmentId(i), f)),
      Segment::Text(_) => None,
    })
  }

  pub fn fragment(&self, id: FragmentId) -> Option<&Fragment> {
    match self.segments.get(id.0) {
      Some(Segment::Fragment(f)) => Some(f),
      _ => None,
    }
  }

  /// All events in document order, which is ascending by date for any
  /// document maintained through [`Self::insert_ordered`].
  pub fn events(&self) -> Vec<(FragmentId, &Event)> {
    self
      .fragments()
      .filter_map(|(id, f)| f.record.as_event().map(|e| (id, e)))
      .collect()
  }

  /// All periods in document order.
  pub fn periods(&self) -> Vec<(FragmentId, &Period)> {
    self
      .fragments()
      .filter_map(|(id, f)| f.record.as_period().map(|p| (id, p)))
      .collect()
  }

  /// The first event on `date`, if any.
  pub fn find_event(&self, date: NaiveDate) -> Option<FragmentId> {
    self
      .events()
      .into_iter()
      .find(|(_, e)| e.date == date)
      .map(|(id, _)| id)
  }

  /// The first period spanning exactly `start..=end`, if any.
  pub fn find_period(&self, start: NaiveDate, end: NaiveDate) -> Option<FragmentId> {
    self
      .periods()
      .into_iter()
      .find(|(_, p)| p.start == start && p.end == end)
      .map(|(id, _)| id)
  }

  // ── Mutation ────────────────────────────────────────────────────────────

  /// Insert `fragment` among the fragments of its own kind, before the first
  /// one whose [`Record::sort_key`] is greater.
  ///
  /// With no greater key the fragment goes right after the last fragment of
  /// its kind. The first fragment of a kind goes into the container named for
  /// it (`id="events"` or `id="periods"`) when there is one.
  pub fn insert_ordered(&mut self, fragment: Fragment) -> FragmentId {
    let kind = fragment.record.kind();
    let key = fragment.record.sort_key();

    let mut first_greater = None;
    let mut last_of_kind = None;
    for (id, existing) in self.fragments() {
      if existing.record.kind() != kind {
        continue;
      }
      if existing.record.sort_key() > key {
        first_greater = Some(id.0);
        break;
      }
      last_of_kind = Some(id.0);
    }

    match (first_greater, last_of_kind) {
      (Some(index), _) => self.insert_before(index, fragment),
      (None, Some(index)) => self.insert_after(index, fragment),
      (None, None) => self.insert_first_of_kind(fragment),
    }
  }

  pub fn insert_event(&mut self, event: Event) -> FragmentId {
    self.insert_ordered(Fragment::new(event))
  }

  pub fn insert_period(&mut self, period: Period) -> FragmentId {
    self.insert_ordered(Fragment::new(period))
  }

  /// Swap the fragment at `id` for `record`, in place. The ordering key is
  /// not re-checked.
  pub fn replace(&mut self, id: FragmentId, record: impl Into<Record>) -> Result<()> {
    match self.segments.get_mut(id.0) {
      Some(Segment::Fragment(f)) => {
        *f = Fragment::new(record);
        Ok(())
      }
      _ => Err(Error::UnknownFragment(id.0)),
    }
  }

  /// Delete the fragment at `id` along with the whitespace that led up to it.
  pub fn remove(&mut self, id: FragmentId) -> Result<Fragment> {
    let removed = match self.segments.get(id.0) {
      Some(Segment::Fragment(f)) => f.clone(),
      _ => return Err(Error::UnknownFragment(id.0)),
    };
    self.segments.remove(id.0);

    if let Some(Segment::Text(before)) =
      id.0.checked_sub(1).and_then(|i| self.segments.get_mut(i))
    {
      let kept = before.trim_end().len();
      before.truncate(kept);
    }
    self.normalize();
    Ok(removed)
  }

  // ── Internals ───────────────────────────────────────────────────────────

  fn push_text(&mut self, text: &str) {
    if text.is_empty() {
      return;
    }
    if let Some(Segment::Text(last)) = self.segments.last_mut() {
      last.push_str(text);
    } else {
      self.segments.push(Segment::Text(text.to_string()));
    }
  }

  /// The whitespace run that immediately precedes segment `index`.
  fn leading_whitespace(&self, index: usize) -> String {
    match index.checked_sub(1).and_then(|i| self.segments.get(i)) {
      Some(Segment::Text(t)) => {
        let kept = t.trim_end().len();
        t[kept..].to_string()
      }
      _ => String::new(),
    }
  }

  fn insert_before(&mut self, index: usize, fragment: Fragment) -> FragmentId {
    let indent = self.leading_whitespace(index);
    if !indent.is_empty() {
      self.segments.insert(index, Segment::Text(indent));
    }
    self.segments.insert(index, Segment::Fragment(fragment));
    FragmentId(index)
  }

  fn insert_after(&mut self, index: usize, fragment: Fragment) -> FragmentId {
    let indent = self.leading_whitespace(index);
    let mut at = index + 1;
    if !indent.is_empty() {
      self.segments.insert(at, Segment::Text(indent));
      at += 1;
    }
    self.segments.insert(at, Segment::Fragment(fragment));
    self.normalize_from(at + 1);
    FragmentId(at)
  }

  /// Where the first fragment of a kind goes, in order of preference:
  ///
  /// 1. inside the `<div id="events">` or `<div id="periods">` container,
  ///    before its closing tag;
  /// 2. next to the other kind: a period before the first event, an event
  ///    after the last period;
  /// 3. before the last `</div>` of the document, or at its end.
  fn insert_first_of_kind(&mut self, fragment: Fragment) -> FragmentId {
    let kind = fragment.record.kind();
    if let Some((index, at)) = self.container_close(kind) {
      return self.insert_into_text(index, at, fragment);
    }

    let others: Vec<usize> = self.fragments().map(|(id, _)| id.0).collect();
    match (kind, others.first(), others.last()) {
      (RecordKind::Period, Some(&first), _) => return self.insert_before(first, fragment),
      (RecordKind::Event, _, Some(&last)) => return self.insert_after(last, fragment),
      _ => {}
    }

    let last_close = match self.segments.first() {
      Some(Segment::Text(t)) => tags(t)
        .into_iter()
        .rev()
        .find(|tag| tag.is(TagKind::Close, "div"))
        .map(|tag| tag.start),
      _ => None,
    };
    match last_close {
      Some(at) => self.insert_into_text(0, at, fragment),
      None => {
        self.segments.push(Segment::Fragment(fragment));
        FragmentId(self.segments.len() - 1)
      }
    }
  }

  /// Segment index and offset within it of the closing tag of the container
  /// named for `kind`.
  fn container_close(&self, kind: RecordKind) -> Option<(usize, usize)> {
    let id = match kind {
      RecordKind::Event => "events",
      RecordKind::Period => "periods",
    };
    let text = self.render();
    let tags = tags(&text);
    let open = tags.iter().position(|tag| {
      tag.is(TagKind::Open, "div")
        && tag.attr("id").is_some_and(|v| v.trim().eq_ignore_ascii_case(id))
    })?;
    let at = tags[matching_close(&tags, open, |_| false)?].start;

    let mut offset = 0;
    for (index, segment) in self.segments.iter().enumerate() {
      let len = match segment {
        Segment::Text(t) => t.len(),
        Segment::Fragment(f) => f.markup.len(),
      };
      if at < offset + len {
        return match segment {
          Segment::Text(_) => Some((index, at - offset)),
          Segment::Fragment(_) => None,
        };
      }
      offset += len;
    }
    None
  }

  /// Split text segment `index` at byte `at` (a closing tag) and put
  /// `fragment` there, indented one level deeper than the closing tag.
  fn insert_into_text(&mut self, index: usize, at: usize, fragment: Fragment) -> FragmentId {
    let Some(Segment::Text(text)) = self.segments.get(index) else {
      self.segments.push(Segment::Fragment(fragment));
      return FragmentId(self.segments.len() - 1);
    };

    let (before, after) = text.split_at(at);
    let (prefix, suffix) = match before.rfind('\n') {
      Some(nl) if before[nl + 1..].trim().is_empty() => {
        let indent = &before[nl + 1..];
        (
          format!("{}{indent}{NESTED_INDENT}", &before[..=nl]),
          format!("\n{indent}{after}"),
        )
      }
      _ => (before.to_string(), after.to_string()),
    };

    let mut replacement = Vec::with_capacity(3);
    if !prefix.is_empty() {
      replacement.push(Segment::Text(prefix));
    }
    let id = FragmentId(index + replacement.len());
    replacement.push(Segment::Fragment(fragment));
    replacement.push(Segment::Text(suffix));
    self.segments.splice(index..=index, replacement);
    id
  }

  pub fn kinds(&self) -> Vec<RecordKind> {
    self.fragments().map(|(_, f)| f.record.kind()).collect()
  }

  fn normalize(&mut self) { self.normalize_from(0) }

  /// Drop empty text segments and merge adjacent ones, from `start` onward.
  fn normalize_from(&mut self, start: usize) {
    let mut i = start.saturating_sub(1);
    while i < self.segments.len() {
      let merge = matches!(
        (self.segments.get(i), self.segments.get(i + 1)),
        (Some(Segment::Text(_)), Some(Segment::Text(_)))
      );
      if merge {
        if let Segment::Text(next) = self.segments.remove(i + 1)
          && let Some(Segment::Text(current)) = self.segments.get_mut(i)
        {
          current.push_str(&next);
        }
        continue;
      }
      if matches!(&self.segments[i], Segment::Text(t) if t.is_empty()) {
        self.segments.remove(i);
        i = i.saturating_sub(1);
        continue;
      }
      i += 1;
    }
  }
}
