//! repairs-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered under
//! `REPAIRS_*` environment variables, opens the SQLite store, and serves the
//! JSON API over HTTP.
//!
//! # Provisioning accounts
//!
//! ```text
//! repairs-server add-customer --username ada --first-name Ada --last-name Lovelace --address "1 Main St"
//! repairs-server add-employee --username bob --first-name Bob --last-name Ross --specialty plumbing
//! ```
//!
//! Both read the new account's password from stdin.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use repairs_server::{
  ServerConfig,
  admin::{self, NewAccount},
  auth::hash_password,
};
use repairs_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Repair-ticket API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the API (default).
  Serve,
  /// Print the argon2 hash for a password entered on stdin and exit.
  HashPassword,
  /// Create a customer account.
  AddCustomer {
    #[command(flatten)]
    account: AccountArgs,
    #[arg(long)]
    address: String,
  },
  /// Create a staff account with an employee profile.
  AddEmployee {
    #[command(flatten)]
    account: AccountArgs,
    #[arg(long)]
    specialty: String,
  },
}

#[derive(Args)]
struct AccountArgs {
  #[arg(long)]
  username:   String,
  #[arg(long)]
  first_name: String,
  #[arg(long)]
  last_name:  String,
}

impl AccountArgs {
  fn into_account(self, password: String) -> NewAccount {
    NewAccount {
      username: self.username,
      given_name: self.first_name,
      family_name: self.last_name,
      password,
    }
  }
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

  match cli.command.unwrap_or(Command::Serve) {
    // Helper mode: hash a password and exit.
    Command::HashPassword => {
      let password = rpassword_or_stdin()?;
      let hash = hash_password(&password).map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
      println!("{hash}");
    }
    Command::AddCustomer { account, address } => {
      let (_, store) = open_store(cli.config).await?;
      let password = rpassword_or_stdin()?;
      let customer = admin::add_customer(&store, account.into_account(password), address).await?;
      println!("customer {} created", customer.id);
    }
    Command::AddEmployee { account, specialty } => {
      let (_, store) = open_store(cli.config).await?;
      let password = rpassword_or_stdin()?;
      let employee = admin::add_employee(&store, account.into_account(password), specialty).await?;
      println!("employee {} created", employee.id);
    }
    Command::Serve => {
      let (server_cfg, store) = open_store(cli.config).await?;
      serve(store, &server_cfg).await?;
    }
  }

  Ok(())
}

/// Load configuration and open the store it points at.
async fn open_store(config_path: PathBuf) -> anyhow::Result<(ServerConfig, SqliteStore)> {
  let settings = config::Config::builder()
    .add_source(config::File::from(config_path).required(false))
    .add_source(config::Environment::with_prefix("REPAIRS"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  Ok((server_cfg, store))
}

async fn serve(store: SqliteStore, server_cfg: &ServerConfig) -> anyhow::Result<()> {
  let app = repairs_server::router(Arc::new(store));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}

/// Read a single line from stdin as the password.
fn rpassword_or_stdin() -> anyhow::Result<String> {
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
