//! Core types and trait definitions for the life calendar.
//!
//! Free of HTTP and markup code; every other crate depends on this one.

pub mod conversation;
pub mod error;
pub mod record;
pub mod store;

pub use error::{Error, Result};
