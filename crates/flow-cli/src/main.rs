//! `feedbackflow` — terminal client for FeedbackFlow.
//!
//! # Usage
//!
//! ```
//! feedbackflow --auth-url http://localhost:8000 --data ~/.local/share/feedbackflow.db
//! feedbackflow --config ~/.config/feedbackflow/config.toml
//! ```

mod app;
mod client;
mod ui;

use std::{
  io,
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::HttpAuthenticator;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use flow_core::{fixture::Fixture, record_store::RecordStore, session::SessionHolder};
use flow_store_sqlite::SqliteSlots;
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_AUTH_URL: &str = "http://localhost:8000";
const DEFAULT_DATA: &str = "feedbackflow.db";
const DEFAULT_LOG: &str = "feedbackflow.log";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "feedbackflow", about = "Terminal client for FeedbackFlow")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the authentication service.
  #[arg(long, env = "FLOW_AUTH_URL")]
  auth_url: Option<String>,

  /// SQLite file holding feedback and the cached session.
  #[arg(long, env = "FLOW_DATA", value_name = "FILE")]
  data: Option<PathBuf>,

  /// JSON fixture with the roster and seed feedback.
  #[arg(long, env = "FLOW_FIXTURE", value_name = "FILE")]
  fixture: Option<PathBuf>,

  /// Where to write the log; the terminal belongs to the UI.
  #[arg(long, env = "FLOW_LOG", value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  auth_url: Option<String>,
  data:     Option<PathBuf>,
  fixture:  Option<PathBuf>,
  log_file: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let auth_url = args
    .auth_url
    .or(file_cfg.auth_url)
    .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string());
  let data = args
    .data
    .or(file_cfg.data)
    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA));
  let log_file = args
    .log_file
    .or(file_cfg.log_file)
    .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG));
  let fixture = match args.fixture.or(file_cfg.fixture) {
    Some(path) => load_fixture(&path)?,
    None => Fixture::sample(),
  };

  init_logging(&log_file)?;
  tracing::info!(auth_url = %auth_url, data = %data.display(), "starting");

  let slots = SqliteSlots::open(&data)
    .await
    .with_context(|| format!("failed to open data file {}", data.display()))?;
  let client = HttpAuthenticator::new(auth_url)?;

  let mut app = App::new(
    SessionHolder::new(slots.clone(), client.clone()),
    RecordStore::new(slots, fixture.feedback),
    fixture.roster,
    client,
  );

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  if let Err(e) = &run_result {
    tracing::error!(error = %e, "exiting with error");
  }
  run_result
}

fn load_fixture(path: &Path) -> Result<Fixture> {
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading fixture {}", path.display()))?;
  Fixture::from_json(&raw).with_context(|| format!("parsing fixture {}", path.display()))
}

fn init_logging(path: &Path) -> Result<()> {
  let file = std::fs::OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("opening log file {}", path.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_ansi(false)
    .with_writer(Mutex::new(file))
    .init();
  Ok(())
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  // First frame shows the loading view while storage is read.
  terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;
  app.initialize().await.context("loading local data")?;

  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key).await?
    {
      break;
    }
  }

  Ok(())
}
