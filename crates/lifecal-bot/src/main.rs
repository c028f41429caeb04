//! lifecal bot binary.
//!
//! Reads `lifecal.toml` (or the path given with `--config`) plus `LIFECAL_*`
//! environment variables, opens the configured document store, and either
//! serves the HTTP webhook or chats on the terminal.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use lifecal_bot::{BotConfig, Dispatcher, StoreConfig, console::Console};
use lifecal_core::{conversation::Conversation as _, store::DocumentStore};
use lifecal_engine::{Calendar, Session};
use lifecal_store::{FileStore, GithubConfig, GithubStore};
use tokio::{io::BufReader, net::TcpListener};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Life calendar chat bot")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "lifecal.toml")]
  config: PathBuf,

  #[command(subcommand)]
  mode: Option<Mode>,
}

#[derive(Subcommand, Clone, Copy)]
enum Mode {
  /// Serve the HTTP webhook (the default).
  Serve,
  /// Talk to the calendar from this terminal.
  Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  let mode = cli.mode.unwrap_or(Mode::Serve);

  // Logs go to stderr so they stay out of a terminal conversation.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(match mode {
          Mode::Serve => LevelFilter::INFO.into(),
          Mode::Chat => LevelFilter::WARN.into(),
        })
        .from_env_lossy(),
    )
    .init();

  let cfg = BotConfig::load(&cli.config).context("failed to load configuration")?;

  match cfg.store.clone() {
    StoreConfig::Github { repo, token, branch, api_base } => {
      let store = GithubStore::new(GithubConfig { api_base, repo, token, branch })
        .context("failed to build GitHub client")?;
      run(mode, &cfg, store).await
    }
    StoreConfig::File { root } => run(mode, &cfg, FileStore::new(root)).await,
  }
}

async fn run<S>(mode: Mode, cfg: &BotConfig, store: S) -> anyhow::Result<()>
where
  S: DocumentStore + 'static,
{
  let calendar = Calendar::new(Arc::new(store), cfg.document_path.clone());
  // Fail at startup, not in the middle of the first dialog.
  calendar
    .read()
    .await
    .with_context(|| format!("failed to read {}", cfg.document_path))?;

  match mode {
    Mode::Serve => {
      let dispatcher = Arc::new(Dispatcher::new(calendar, cfg.command_prefix.clone()));
      let app = lifecal_bot::router(dispatcher);
      let address = format!("{}:{}", cfg.host, cfg.port);

      tracing::info!("Listening on http://{address}");
      let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
      axum::serve(listener, app).await.context("server error")?;
    }
    Mode::Chat => {
      let console = Console::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
      let mut session = Session::new(calendar, console, cfg.command_prefix.clone());
      let greeting = format!("Type {}help to see what I can do.", cfg.command_prefix);
      session
        .conversation_mut()
        .send(&greeting)
        .await
        .context("failed to write to the terminal")?;
      session.serve(|| chrono::Local::now().date_naive()).await;
    }
  }

  Ok(())
}
