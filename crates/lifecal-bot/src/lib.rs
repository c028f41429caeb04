//! Chat front ends for the life calendar.
//!
//! Exposes an axum [`Router`](axum::Router) that drives one calendar
//! session per channel over HTTP, plus a console transport for a single
//! local operator.

pub mod config;
pub mod console;
pub mod dispatch;
pub mod error;
pub mod webhook;

pub use config::{BotConfig, StoreConfig};
pub use dispatch::{Dispatcher, Exchange};
pub use error::ApiError;
pub use webhook::router;
