// shopkeep/src/services/reservations.rs

//! Lease expiry for cart reservations.
//!
//! Stock leaves the shelf when a line is added to a cart. A line left in a
//! cart longer than the reservation lease is dropped and its units go back.

use crate::db::{self, carts, catalog};
use crate::errors::{AppError, Result};
use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReleaseReport {
  pub lines_released: usize,
  pub units_returned: i64,
}

/// Converts a lease length in minutes, rejecting negatives and lengths chrono cannot represent.
pub fn lease_from_minutes(minutes: i64) -> Result<chrono::Duration> {
  if minutes < 0 {
    return Err(AppError::Validation("Lease length cannot be negative.".to_string()));
  }
  chrono::Duration::try_minutes(minutes)
    .ok_or_else(|| AppError::Validation(format!("Lease of {} minutes is too long.", minutes)))
}

/// Releases every reservation older than `lease`.
pub async fn release_expired(pool: &SqlitePool, lease: chrono::Duration) -> Result<ReleaseReport> {
  release_reserved_before(pool, db::now_ms().saturating_sub(lease.num_milliseconds())).await
}

/// Releases every line reserved strictly before `cutoff_ms`, in one transaction.
#[instrument(skip(pool))]
pub async fn release_reserved_before(pool: &SqlitePool, cutoff_ms: i64) -> Result<ReleaseReport> {
  let mut tx = pool.begin().await?;
  let stale = carts::take_stale_lines(&mut *tx, cutoff_ms).await?;

  let mut report = ReleaseReport::default();
  for line in &stale {
    catalog::restore_stock(&mut *tx, line.product_id, line.quantity).await?;
    report.lines_released += 1;
    report.units_returned += line.quantity;
  }
  tx.commit().await?;

  if report.lines_released > 0 {
    info!(
      lines = report.lines_released,
      units = report.units_returned,
      "Released expired cart reservations."
    );
  }
  Ok(report)
}

/// Runs [`release_expired`] every `every` until the returned task is aborted.
pub fn spawn_sweeper(pool: SqlitePool, lease: chrono::Duration, every: Duration) -> JoinHandle<()> {
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval(every);
    loop {
      ticker.tick().await;
      if let Err(e) = release_expired(&pool, lease).await {
        error!(error = %e, "Reservation sweep failed.");
      }
    }
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lease_lengths_are_bounded() {
    assert_eq!(lease_from_minutes(90).unwrap(), chrono::Duration::minutes(90));
    assert!(matches!(lease_from_minutes(-1), Err(AppError::Validation(_))));
    assert!(matches!(
      lease_from_minutes(1_000_000_000_000_000),
      Err(AppError::Validation(_))
    ));
  }
}
