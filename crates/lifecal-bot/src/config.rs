//! Runtime configuration.
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `LIFECAL_`-prefixed environment variables (`__` separates
//! nested keys, e.g. `LIFECAL_STORE__TOKEN`).

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const ENV_PREFIX: &str = "LIFECAL";

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
  pub host:           String,
  pub port:           u16,
  /// Introduces a command, e.g. `!` in `!new_event`.
  pub command_prefix: String,
  /// Path of the calendar document inside the store.
  pub document_path:  String,
  pub store:          StoreConfig,
}

/// Where the calendar document lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
  Github {
    /// `owner/name`.
    repo:     String,
    #[serde(default)]
    token:    String,
    #[serde(default = "default_branch")]
    branch:   String,
    #[serde(default = "default_api_base")]
    api_base: String,
  },
  File {
    root: PathBuf,
  },
}

fn default_branch() -> String { "master".to_string() }

fn default_api_base() -> String { "https://api.github.com".to_string() }

impl BotConfig {
  /// Load from `file` (skipped when absent) and the environment.
  pub fn load(file: &Path) -> Result<Self, config::ConfigError> {
    Self::builder()?
      .add_source(config::File::from(file).required(false))
      .add_source(
        config::Environment::with_prefix(ENV_PREFIX)
          .prefix_separator("_")
          .separator("__"),
      )
      .build()?
      .try_deserialize()
  }

  fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080)?
      .set_default("command_prefix", "!")?
      .set_default("document_path", "events.html")
  }
}
