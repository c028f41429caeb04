//! [`GithubStore`]: a document kept in a GitHub repository.
//!
//! Reads and writes go through the REST contents API
//! (`/repos/{owner}/{repo}/contents/{path}`). The blob SHA returned by GitHub
//! is the version token; GitHub itself rejects a write whose SHA is stale with
//! `409 Conflict`.

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use lifecal_core::store::{Commit, DocumentStore, Snapshot, StoreError, VersionToken};
use reqwest::{Client, Method, RequestBuilder, StatusCode, header};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const USER_AGENT: &str = concat!("lifecal/", env!("CARGO_PKG_VERSION"));

/// Connection settings for one repository branch.
#[derive(Debug, Clone)]
pub struct GithubConfig {
  /// API root, `https://api.github.com` unless using GitHub Enterprise.
  pub api_base: String,
  /// `owner/name`.
  pub repo:     String,
  /// Personal access token with contents read/write permission.
  pub token:    String,
  pub branch:   String,
}

/// A GitHub-backed document store.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GithubStore {
  client: Client,
  config: GithubConfig,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ContentsResponse {
  /// Base64, wrapped with newlines every 60 characters.
  content: String,
  sha:     String,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
  message: &'a str,
  content: String,
  sha:     &'a str,
  branch:  &'a str,
}

#[derive(Deserialize)]
struct UpdateResponse {
  content: UpdatedContent,
}

#[derive(Deserialize)]
struct UpdatedContent {
  sha: String,
}

// ─── Client ──────────────────────────────────────────────────────────────────

impl GithubStore {
  pub fn new(config: GithubConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .user_agent(USER_AGENT)
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/repos/{}/contents/{}",
      self.config.api_base.trim_end_matches('/'),
      self.config.repo,
      path.trim_start_matches('/'),
    )
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    let req = self
      .client
      .request(method, self.url(path))
      .header(header::ACCEPT, "application/vnd.github+json")
      .header("X-GitHub-Api-Version", "2022-11-28");
    if self.config.token.is_empty() {
      req
    } else {
      req.bearer_auth(&self.config.token)
    }
  }

  fn unexpected(&self, status: StatusCode, path: &str) -> StoreError {
    Error::Status {
      status,
      url: self.url(path),
    }
    .into()
  }
}

impl DocumentStore for GithubStore {
  async fn get_file(&self, path: &str) -> Result<Snapshot, StoreError> {
    let resp = self
      .request(Method::GET, path)
      .query(&[("ref", self.config.branch.as_str())])
      .send()
      .await
      .map_err(Error::from)?;

    match resp.status() {
      StatusCode::NOT_FOUND => {
        return Err(StoreError::NotFound { path: path.to_string() });
      }
      status if !status.is_success() => return Err(self.unexpected(status, path)),
      _ => {}
    }

    let body: ContentsResponse = resp.json().await.map_err(Error::from)?;
    let packed: String = body
      .content
      .chars()
      .filter(|c| !c.is_ascii_whitespace())
      .collect();
    let bytes = B64.decode(packed).map_err(Error::from)?;
    let text = String::from_utf8(bytes).map_err(Error::from)?;

    Ok(Snapshot {
      text,
      version: VersionToken::new(body.sha),
    })
  }

  async fn update_file(
    &self,
    path: &str,
    commit: Commit,
  ) -> Result<VersionToken, StoreError> {
    let body = UpdateRequest {
      message: &commit.message,
      content: B64.encode(commit.text.as_bytes()),
      sha:     commit.version.as_str(),
      branch:  &self.config.branch,
    };

    let resp = self
      .request(Method::PUT, path)
      .json(&body)
      .send()
      .await
      .map_err(Error::from)?;

    match resp.status() {
      StatusCode::CONFLICT => {
        return Err(StoreError::Conflict { path: path.to_string() });
      }
      StatusCode::NOT_FOUND => {
        return Err(StoreError::NotFound { path: path.to_string() });
      }
      status if !status.is_success() => return Err(self.unexpected(status, path)),
      _ => {}
    }

    let updated: UpdateResponse = resp.json().await.map_err(Error::from)?;
    Ok(VersionToken::new(updated.content.sha))
  }
}
