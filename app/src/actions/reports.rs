// shopkeep/src/actions/reports.rs

use crate::db::orders;
use crate::errors::{AppError, Result};
use crate::models::{PopularProduct, SalesSummary};
use crate::services::reservations::{self, ReleaseReport};
use crate::state::AppState;

pub async fn sales_summary(state: &AppState) -> Result<SalesSummary> {
  orders::sales_summary(&state.db_pool).await
}

/// Top products by order count; `limit` defaults to the configured size.
pub async fn popular_products(state: &AppState, limit: Option<i64>) -> Result<Vec<PopularProduct>> {
  let limit = limit.unwrap_or(state.config.popular_products_limit);
  if limit <= 0 {
    return Err(AppError::Validation("Report size must be positive.".to_string()));
  }
  orders::popular_products(&state.db_pool, limit).await
}

/// Returns stock held by cart lines older than `older_than_minutes`
/// (default: the configured reservation lease).
pub async fn release_expired_reservations(state: &AppState, older_than_minutes: Option<i64>) -> Result<ReleaseReport> {
  let lease = match older_than_minutes {
    Some(minutes) => reservations::lease_from_minutes(minutes)?,
    None => state.config.reservation_lease()?,
  };
  reservations::release_expired(&state.db_pool, lease).await
}
