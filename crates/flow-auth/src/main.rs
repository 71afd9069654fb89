//! flow-auth server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), layers
//! `FLOW_`-prefixed environment variables on top, and serves the
//! authentication endpoints over HTTP.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for a user's `password_hash`:
//!
//! ```
//! cargo run -p flow-auth -- --hash-password
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use flow_auth::{
  AppState, ServerConfig,
  users::{DEMO_PASSWORD, UserDirectory},
};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "FeedbackFlow authentication server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,

  /// Serve the built-in sample users instead of the configured ones.
  #[arg(long)]
  demo_users: bool,

  /// Print the direct reports of the manager with this username and exit.
  #[arg(long, value_name = "USERNAME")]
  check_team: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_password()?;
    println!("{}", flow_auth::users::hash_password(&password)?);
    return Ok(());
  }

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("FLOW"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let users = if cli.demo_users {
    tracing::warn!("serving demo users, password {DEMO_PASSWORD:?}");
    UserDirectory::demo()?
  } else {
    UserDirectory::from_entries(server_cfg.users.clone())
      .context("invalid [[users]] configuration")?
  };

  if let Some(username) = cli.check_team {
    return check_team(&users, &username);
  }

  let state = AppState::new(&server_cfg, users);
  spawn_purger(state.clone());

  let app = flow_auth::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// List a manager's team the way `/auth/team/` would.
fn check_team(users: &UserDirectory, username: &str) -> anyhow::Result<()> {
  let manager = users
    .by_username(username)
    .with_context(|| format!("user {username} not found"))?;
  if !manager.is_manager() {
    anyhow::bail!("{username} is not a manager");
  }

  println!("Manager: {username} (ID: {})", manager.id);
  println!("Team Members:");
  let mut any = false;
  for member in users.roster().team_of(&manager.id) {
    any = true;
    println!("  - {} (ID: {}) - {}", member.name, member.id, member.email);
  }
  if !any {
    println!("  No team members found");
  }
  Ok(())
}

/// Periodically drop expired tokens so the table does not grow unbounded.
fn spawn_purger(state: AppState) {
  tokio::spawn(async move {
    let mut tick = tokio::time::interval(std::time::Duration::from_secs(60));
    loop {
      tick.tick().await;
      let removed = state.tokens.purge_expired();
      if removed > 0 {
        tracing::debug!(removed, "purged expired tokens");
      }
    }
  });
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}
