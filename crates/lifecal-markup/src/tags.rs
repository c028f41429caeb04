//! Tag tokenizer over `quick-xml`.
//!
//! The calendar is HTML rather than XML, so the reader runs with end-name
//! checks off and HTML attribute rules. Markup the reader cannot make sense
//! of (an unterminated comment, a `<` that starts no tag) counts as text: the
//! tokenizer restarts one byte past the offending `<`, which is how browsers
//! recover too. A stray `<!--` therefore never hides the rest of a document.

use std::borrow::Cow;

use quick_xml::{
  Reader,
  events::{BytesStart, Event},
};

// ─── Tag representation ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagKind {
  /// `<name ...>`
  Open,
  /// `<name ... />`
  SelfClosing,
  /// `</name>`
  Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tag {
  pub kind:  TagKind,
  pub name:  String,
  /// Raw attribute values; `""` for a bare attribute such as `hidden`.
  pub attrs: Vec<(String, String)>,
  /// Byte offset of the opening `<`.
  pub start: usize,
  /// Byte offset one past the closing `>`.
  pub end:   usize,
}

impl Tag {
  pub fn is(&self, kind: TagKind, name: &str) -> bool {
    self.kind == kind && self.name.eq_ignore_ascii_case(name)
  }

  pub fn has_attr(&self, name: &str) -> bool { self.attr(name).is_some() }

  /// The value of the first attribute called `name`.
  pub fn attr(&self, name: &str) -> Option<&str> {
    self
      .attrs
      .iter()
      .find(|(key, _)| key.eq_ignore_ascii_case(name))
      .map(|(_, value)| value.as_str())
  }
}

// ─── Tokenizer ───────────────────────────────────────────────────────────────

/// Every element tag in `src`, in document order. Comments, doctypes and
/// processing instructions are skipped, and so is anything inside them.
pub(crate) fn tags(src: &str) -> Vec<Tag> {
  let mut tags = Vec::new();
  let mut from = 0;
  while let Some(bad) = scan(src, from, &mut tags) {
    from = bad + 1;
  }
  tags
}

/// Tokenize `src[from..]` into `tags`. Returns the offset of the `<` that
/// stopped the reader, or `None` once the input is exhausted.
fn scan(src: &str, from: usize, tags: &mut Vec<Tag>) -> Option<usize> {
  let rest = src.get(from..)?;
  let mut reader = Reader::from_str(rest);
  let config = reader.config_mut();
  config.check_end_names = false;
  config.allow_unmatched_ends = true;

  // End of the last markup event. Text holds no `<`, so the next markup
  // starts at the first `<` from here.
  let mut cursor = 0;
  loop {
    let event = reader.read_event();
    let start = rest[cursor..].find('<').map(|i| from + cursor + i);
    let end = from + reader.buffer_position() as usize;

    let tag = match event {
      Ok(Event::Eof) => return None,
      Ok(Event::Text(_)) => continue,
      Ok(Event::Start(open)) => element(TagKind::Open, &open, start?, end),
      Ok(Event::Empty(open)) => element(TagKind::SelfClosing, &open, start?, end),
      Ok(Event::End(close)) => Tag {
        kind:  TagKind::Close,
        name:  lossy(close.name().as_ref()).into_owned(),
        attrs: Vec::new(),
        start: start?,
        end,
      },
      Ok(_) => {
        cursor = end - from;
        continue;
      }
      Err(_) => return start,
    };

    if !is_name(&tag.name) {
      // `<3` or `< 2`: not a tag, restart past the `<`.
      return start;
    }
    tags.push(tag);
    cursor = end - from;
  }
}

/// Whether `src` is text and element tags only, each of which the reader
/// takes exactly as written. Comments, doctypes and any `<` that opens no
/// complete tag all fail.
pub(crate) fn is_well_formed(src: &str) -> bool {
  let mut reader = Reader::from_str(src);
  let config = reader.config_mut();
  config.check_end_names = false;
  config.allow_unmatched_ends = true;

  loop {
    match reader.read_event() {
      Ok(Event::Eof) => return true,
      Ok(Event::Text(_)) => {}
      Ok(Event::Start(tag) | Event::Empty(tag)) => {
        if !is_name(&lossy(tag.name().as_ref())) {
          return false;
        }
      }
      Ok(Event::End(tag)) => {
        if !is_name(&lossy(tag.name().as_ref())) {
          return false;
        }
      }
      _ => return false,
    }
  }
}

fn element(kind: TagKind, open: &BytesStart<'_>, start: usize, end: usize) -> Tag {
  let mut attributes = open.html_attributes();
  attributes.with_checks(false);
  let attrs = attributes
    .flatten()
    .map(|attr| {
      (
        lossy(attr.key.as_ref()).into_owned(),
        lossy(&attr.value).into_owned(),
      )
    })
    .collect();

  Tag {
    kind,
    name: lossy(open.name().as_ref()).into_owned(),
    attrs,
    start,
    end,
  }
}

fn lossy(bytes: &[u8]) -> Cow<'_, str> { String::from_utf8_lossy(bytes) }

fn is_name(name: &str) -> bool {
  name.as_bytes().first().is_some_and(u8::is_ascii_alphabetic)
}

/// Index of the tag that closes the `<name>` at `open`, counting nested
/// elements of the same name. The search gives up at any inner opening tag
/// `interrupts` accepts.
pub(crate) fn matching_close(
  tags: &[Tag],
  open: usize,
  interrupts: impl Fn(&Tag) -> bool,
) -> Option<usize> {
  let name = &tags.get(open)?.name;
  let mut depth = 1usize;
  for (index, tag) in tags.iter().enumerate().skip(open + 1) {
    if tag.is(TagKind::Open, name) {
      if interrupts(tag) {
        return None;
      }
      depth += 1;
    } else if tag.is(TagKind::Close, name) {
      depth -= 1;
      if depth == 0 {
        return Some(index);
      }
    }
  }
  None
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reads_quoted_unquoted_and_bare_attributes() {
    let src = r#"<div date="06/15/2024" credit=80 hidden data-x='a>b'>"#;
    let tags = tags(src);
    assert_eq!(tags.len(), 1);
    let tag = &tags[0];
    assert_eq!(tag.kind, TagKind::Open);
    assert_eq!(tag.name, "div");
    assert_eq!(tag.attr("DATE"), Some("06/15/2024"));
    assert_eq!(tag.attr("credit"), Some("80"));
    assert_eq!(tag.attr("hidden"), Some(""));
    assert_eq!(tag.attr("data-x"), Some("a>b"));
    assert_eq!((tag.start, tag.end), (0, src.len()));
  }

  #[test]
  fn offsets_cover_each_tag() {
    let src = "a<br/>b </DIV><i>c</i>";
    let tags = tags(src);
    let spans: Vec<&str> = tags.iter().map(|t| &src[t.start..t.end]).collect();
    assert_eq!(spans, ["<br/>", "</DIV>", "<i>", "</i>"]);
    assert!(tags[0].is(TagKind::SelfClosing, "br"));
    assert!(tags[1].is(TagKind::Close, "div"));
  }

  #[test]
  fn tags_inside_comments_are_ignored() {
    let src = "<!-- <div date=\"x\"> --><b>";
    let tags = tags(src);
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "b");
    assert_eq!(tags[0].start, src.len() - 3);
  }

  #[test]
  fn a_lone_angle_bracket_is_text() {
    let src = "1 < 2 and I <3 you <b>";
    let tags = tags(src);
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "b");
    assert_eq!(tags[0].start, src.len() - 3);
  }

  #[test]
  fn unterminated_comment_does_not_hide_later_tags() {
    let src = "x <!-- wow</div><div id=\"a\">";
    let spans: Vec<&str> = tags(src).iter().map(|t| &src[t.start..t.end]).collect();
    assert_eq!(spans, ["</div>", "<div id=\"a\">"]);
  }

  #[test]
  fn unterminated_tag_yields_nothing() {
    assert!(tags("<div date=\"1").is_empty());
  }

  #[test]
  fn well_formed_means_nothing_to_recover_from() {
    assert!(is_well_formed("went to <b>the beach</b> &amp; back"));
    assert!(is_well_formed("no markup at all"));
    assert!(!is_well_formed("I <3 html"));
    assert!(!is_well_formed("1 < 2"));
    assert!(!is_well_formed("a <!-- b"));
    assert!(!is_well_formed("a <!-- b -->"));
    assert!(!is_well_formed("<a href=\"x>"));
  }

  #[test]
  fn matches_nested_elements() {
    let src = "<div><div>x</div><i>y</i></div>tail";
    let tags = tags(src);
    let close = matching_close(&tags, 0, |_| false).unwrap();
    assert_eq!(&src[tags[close].start..tags[close].end], "</div>");
    assert_eq!(&src[tags[close].end..], "tail");
    assert!(matching_close(&tags, 0, |t| t.is(TagKind::Open, "div")).is_none());
  }
}
