//! Campus server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`, with
//! `CAMPUS_*` environment overrides), opens an in-process SQLite store, and
//! serves the JSON API over HTTP.
//!
//! # Password hash generation
//!
//! To generate an argon2 PHC string (e.g. for seeding an account directly in
//! the database):
//!
//! ```
//! cargo run -p campus-server -- --hash-password
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use campus_api::{ApiConfig, AppState, TokenKeys};
use campus_store_sqlite::SqliteStore;
use clap::Parser;
use rand_core::OsRng;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
struct ServerConfig {
  host:                String,
  port:                u16,
  /// External base URL, embedded in diploma QR codes.
  base_url:            String,
  db_path:             PathBuf,
  artifact_dir:        PathBuf,
  jwt_secret:          String,
  /// Blank disables diploma signing (sign requests fail).
  #[serde(default)]
  signing_secret:      String,
  #[serde(default = "default_access_ttl")]
  access_ttl_minutes:  i64,
  #[serde(default = "default_refresh_ttl")]
  refresh_ttl_minutes: i64,
}

fn default_access_ttl() -> i64 { 60 }

fn default_refresh_ttl() -> i64 { 60 * 24 }

#[derive(Parser)]
#[command(author, version, about = "Campus Q&A and diploma server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = read_password()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("CAMPUS"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  if server_cfg.jwt_secret.is_empty() {
    anyhow::bail!("jwt_secret must not be empty");
  }
  if server_cfg.signing_secret.is_empty() {
    tracing::warn!("signing_secret is empty; diploma signing is disabled");
  }

  // Expand `~` in filesystem paths.
  let db_path = expand_tilde(&server_cfg.db_path);
  let artifact_dir = expand_tilde(&server_cfg.artifact_dir);

  // Open SQLite store.
  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("failed to open store at {db_path:?}"))?;

  // Build application state.
  let state = AppState {
    store:  Arc::new(store),
    config: Arc::new(ApiConfig {
      base_url: server_cfg.base_url.clone(),
      artifact_dir,
      signing_secret: server_cfg.signing_secret.clone(),
    }),
    tokens: Arc::new(TokenKeys::new(
      server_cfg.jwt_secret.as_bytes(),
      server_cfg.access_ttl_minutes,
      server_cfg.refresh_ttl_minutes,
    )),
  };

  let app = campus_api::router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
