// shopkeep/src/db/tx.rs

use crate::errors::{AppError, Result};
use sqlx::sqlite::{Sqlite, SqliteConnection, SqlitePool};
use sqlx::Transaction;
use std::sync::Arc;
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tracing::{debug, warn};

/// A transaction shared by the steps of one pipeline run.
///
/// Pipeline contexts are cloned into every handler, so the transaction sits
/// behind an async mutex: one step opens it, later steps borrow the connection,
/// and the last step commits. Dropping an uncommitted slot rolls back.
#[derive(Clone, Default)]
pub struct TxSlot {
  inner: Arc<Mutex<Option<Transaction<'static, Sqlite>>>>,
}

impl TxSlot {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn begin(&self, pool: &SqlitePool) -> Result<()> {
    let mut slot = self.inner.lock().await;
    if slot.is_some() {
      return Err(AppError::Internal("transaction already open for this run".to_string()));
    }
    *slot = Some(pool.begin().await?);
    debug!("Transaction opened.");
    Ok(())
  }

  /// Borrows the open transaction's connection until the guard is dropped.
  pub async fn conn(&self) -> Result<MappedMutexGuard<'_, SqliteConnection>> {
    let guard = self.inner.lock().await;
    MutexGuard::try_map(guard, |slot| slot.as_deref_mut())
      .map_err(|_| AppError::Internal("no open transaction".to_string()))
  }

  pub async fn commit(&self) -> Result<()> {
    let tx = self
      .inner
      .lock()
      .await
      .take()
      .ok_or_else(|| AppError::Internal("commit without an open transaction".to_string()))?;
    tx.commit().await?;
    debug!("Transaction committed.");
    Ok(())
  }

  /// Rolls back if a transaction is still open; a no-op otherwise.
  pub async fn rollback(&self) {
    let Some(tx) = self.inner.lock().await.take() else {
      return;
    };
    match tx.rollback().await {
      Ok(()) => debug!("Transaction rolled back."),
      Err(e) => warn!(error = %e, "Rollback failed; the connection will discard the transaction."),
    }
  }
}
