// shopkeep/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://online_shopping.db";

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub database_url: String,
  pub db_max_connections: u32,

  /// Cart lines older than this are returned to stock by the reservation sweep.
  pub reservation_ttl_minutes: i64,

  /// Row cap for the popular-products report.
  pub popular_products_limit: i64,

  /// Insert a demo catalog on startup when the products table is empty.
  pub seed_db: bool,

  /// Emit log lines as JSON instead of the human-readable format.
  pub log_json: bool,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DATABASE_URL.to_string(),
      db_max_connections: 5,
      reservation_ttl_minutes: 24 * 60,
      popular_products_limit: 5,
      seed_db: false,
      log_json: false,
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let defaults = Self::default();
    let get_env = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());

    let database_url = get_env("DATABASE_URL").unwrap_or(defaults.database_url);
    let db_max_connections = parse_var("DB_MAX_CONNECTIONS", get_env("DB_MAX_CONNECTIONS"), defaults.db_max_connections)?;
    let reservation_ttl_minutes = parse_var(
      "RESERVATION_TTL_MINUTES",
      get_env("RESERVATION_TTL_MINUTES"),
      defaults.reservation_ttl_minutes,
    )?;
    let popular_products_limit = parse_var(
      "POPULAR_PRODUCTS_LIMIT",
      get_env("POPULAR_PRODUCTS_LIMIT"),
      defaults.popular_products_limit,
    )?;
    let seed_db = parse_var("SEED_DB", get_env("SEED_DB"), defaults.seed_db)?;
    let log_json = parse_var("LOG_JSON", get_env("LOG_JSON"), defaults.log_json)?;

    if db_max_connections == 0 {
      return Err(AppError::Config("DB_MAX_CONNECTIONS must be at least 1".to_string()));
    }
    let config = Self {
      database_url,
      db_max_connections,
      reservation_ttl_minutes,
      popular_products_limit,
      seed_db,
      log_json,
    };
    config.reservation_lease()?;
    Ok(config)
  }

  /// The reservation lease as a duration. Fails for non-positive lengths and
  /// lengths too large to represent.
  pub fn reservation_lease(&self) -> Result<chrono::Duration> {
    let minutes = self.reservation_ttl_minutes;
    if minutes <= 0 {
      return Err(AppError::Config("RESERVATION_TTL_MINUTES must be positive".to_string()));
    }
    chrono::Duration::try_minutes(minutes)
      .ok_or_else(|| AppError::Config(format!("RESERVATION_TTL_MINUTES is out of range: {}", minutes)))
  }

  /// Configuration for a private in-memory database; used by tests and `--memory` runs.
  pub fn in_memory() -> Self {
    Self {
      database_url: "sqlite::memory:".to_string(),
      db_max_connections: 1,
      ..Self::default()
    }
  }

  pub fn is_in_memory(&self) -> bool {
    self.database_url.contains(":memory:")
  }
}

fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
  T: std::str::FromStr,
  T::Err: std::fmt::Display,
{
  match raw {
    None => Ok(default),
    Some(value) => value
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_var_falls_back_to_default() {
    assert_eq!(parse_var::<u32>("X", None, 7).unwrap(), 7);
    assert_eq!(parse_var::<u32>("X", Some(" 12 ".to_string()), 7).unwrap(), 12);
  }

  #[test]
  fn parse_var_reports_variable_name() {
    let err = parse_var::<bool>("SEED_DB", Some("maybe".to_string()), false).unwrap_err();
    assert!(err.to_string().contains("SEED_DB"));
  }

  #[test]
  fn reservation_lease_is_bounded() {
    let cfg = AppConfig::default();
    assert_eq!(cfg.reservation_lease().unwrap(), chrono::Duration::hours(24));

    for minutes in [0, -5, 1_000_000_000_000_000] {
      let cfg = AppConfig {
        reservation_ttl_minutes: minutes,
        ..AppConfig::default()
      };
      assert!(matches!(cfg.reservation_lease(), Err(AppError::Config(_))), "{minutes}");
    }
  }

  #[test]
  fn in_memory_config_uses_single_connection() {
    let cfg = AppConfig::in_memory();
    assert!(cfg.is_in_memory());
    assert_eq!(cfg.db_max_connections, 1);
  }
}
