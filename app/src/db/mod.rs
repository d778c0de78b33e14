// shopkeep/src/db/mod.rs

//! SQLite access. Functions taking `&mut SqliteConnection` are meant to run
//! inside a transaction opened through [`TxSlot`]; the rest accept any executor.

pub mod carts;
pub mod catalog;
pub mod orders;
pub mod seed;
pub mod tx;
pub mod users;

pub use tx::TxSlot;

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the pool described by `config`, creating the database file if needed.
///
/// An in-memory database lives only as long as its single connection, so the
/// pool is pinned to one connection that is never recycled.
#[instrument(skip(config), fields(database_url = %config.database_url))]
pub async fn connect(config: &AppConfig) -> Result<SqlitePool> {
  let mut options = SqliteConnectOptions::from_str(&config.database_url)
    .map_err(|e| AppError::Config(format!("Invalid DATABASE_URL '{}': {}", config.database_url, e)))?
    .create_if_missing(true)
    .foreign_keys(true)
    .busy_timeout(BUSY_TIMEOUT);

  let pool_options = if config.is_in_memory() {
    SqlitePoolOptions::new()
      .max_connections(1)
      .min_connections(1)
      .idle_timeout(None)
      .max_lifetime(None)
  } else {
    options = options.journal_mode(SqliteJournalMode::Wal);
    SqlitePoolOptions::new().max_connections(config.db_max_connections)
  };

  let pool = pool_options.connect_with(options).await?;
  info!("Database pool ready.");
  Ok(pool)
}

/// Applies the embedded migrations in `./migrations`.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
  sqlx::migrate!("./migrations").run(pool).await?;
  info!("Database migrations applied.");
  Ok(())
}

/// Wall-clock milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
  chrono::Utc::now().timestamp_millis()
}
