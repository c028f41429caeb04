//! HTTP transport.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/channels/{channel}/messages` | Body: `{"text":"!new_event"}` |
//! | `GET`  | `/health` | Liveness probe |
//!
//! A message answers with every reply its session produced before it
//! suspended again: `{"replies":[...],"awaiting_input":true}`.

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::{Path, State},
  routing::{get, post},
};
use lifecal_core::store::DocumentStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::{
  dispatch::{Dispatcher, Exchange},
  error::ApiError,
};

#[derive(Debug, Deserialize)]
pub struct MessageBody {
  pub text: String,
}

pub fn router<S>(dispatcher: Arc<Dispatcher<S>>) -> Router
where
  S: DocumentStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .route("/channels/{channel}/messages", post(message::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(dispatcher)
}

async fn health() -> &'static str { "ok" }

/// `POST /channels/{channel}/messages`
async fn message<S>(
  State(dispatcher): State<Arc<Dispatcher<S>>>,
  Path(channel): Path<String>,
  Json(body): Json<MessageBody>,
) -> Result<Json<Exchange>, ApiError>
where
  S: DocumentStore + 'static,
{
  if body.text.trim().is_empty() {
    return Err(ApiError::BadRequest("message text is empty".to_string()));
  }
  Ok(Json(dispatcher.deliver(&channel, &body.text).await))
}
