//! Life-calendar markup codec.
//!
//! Converts between calendar records and the `<div>` fragments that hold them
//! inside an HTML document, and patches those fragments in place. Pure
//! synchronous; no I/O.
//!
//! # Quick start
//!
//! ```no_run
//! use lifecal_markup::Document;
//!
//! let html = r#"<div id="events"><div date="01/01/2024" credit="60">New year</div></div>"#;
//! let doc = Document::parse(html);
//! println!("{} events", doc.events().len());
//! assert_eq!(doc.render(), html);
//! ```

mod document;
pub mod error;
mod fragment;
mod tags;

pub use document::{Document, Fragment, FragmentId, SkippedFragment};
pub use error::{Error, Result};
pub use fragment::{
  LINE_BREAK, is_embeddable, parse_fragment, render, render_event, render_period,
};
