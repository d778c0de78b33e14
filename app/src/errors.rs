// shopkeep/src/errors.rs

use shopkeep_flow::FlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  /// Recoverable: the caller asked for more units than are on hand.
  #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
  InsufficientStock {
    product_id: i64,
    requested: i64,
    available: i64,
  },

  /// Recoverable: checkout was attempted with nothing in the cart.
  #[error("Shopping cart for user {user_id} is empty; add products before checking out")]
  EmptyCart { user_id: i64 },

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  /// The store rejected a read or write. Any transaction in flight is rolled back.
  #[error("Persistence Failure: {0}")]
  Persistence(#[from] sqlx::Error),

  #[error("Migration Error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Console I/O Error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Internal Error: {0}")]
  Internal(String),
}

impl AppError {
  /// Errors the user can fix by changing their input; the menu loop reports
  /// them and carries on.
  pub fn is_recoverable(&self) -> bool {
    matches!(
      self,
      AppError::Validation(_)
        | AppError::Auth(_)
        | AppError::NotFound(_)
        | AppError::InsufficientStock { .. }
        | AppError::EmptyCart { .. }
        | AppError::Conflict(_)
    )
  }

  /// True when the underlying store error is a UNIQUE constraint violation.
  pub fn is_unique_violation(&self) -> bool {
    match self {
      AppError::Persistence(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
      _ => false,
    }
  }

  /// True when the underlying store error is a FOREIGN KEY violation.
  pub fn is_foreign_key_violation(&self) -> bool {
    match self {
      AppError::Persistence(sqlx::Error::Database(db_err)) => db_err.is_foreign_key_violation(),
      _ => false,
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Persistence(sqlx_err),
      Err(other) => AppError::Internal(other.to_string()),
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn domain_errors_are_recoverable() {
    assert!(AppError::EmptyCart { user_id: 1 }.is_recoverable());
    assert!(AppError::InsufficientStock {
      product_id: 1,
      requested: 7,
      available: 6
    }
    .is_recoverable());
    assert!(!AppError::Persistence(sqlx::Error::RowNotFound).is_recoverable());
  }

  #[test]
  fn insufficient_stock_message_names_quantities() {
    let msg = AppError::InsufficientStock {
      product_id: 3,
      requested: 7,
      available: 6,
    }
    .to_string();
    assert!(msg.contains("requested 7"));
    assert!(msg.contains("available 6"));
  }

  #[test]
  fn anyhow_wrapping_sqlx_maps_to_persistence() {
    let err: AppError = anyhow::Error::new(sqlx::Error::RowNotFound).into();
    assert!(matches!(err, AppError::Persistence(_)));
    let err: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(err, AppError::Internal(_)));
  }
}
