// shopkeep/src/actions/checkout.rs

use crate::db::{orders, users};
use crate::errors::{AppError, Result};
use crate::models::{Order, OrderLine, Receipt, TrackingId};
use crate::pipelines::contexts::CheckoutCtxData;
use crate::state::AppState;
use serde::Serialize;
use shopkeep_flow::{ContextData, PipelineResult};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutOutcome {
  pub order: Order,
  /// Present when this call built the order; absent when it found the cart already ordered.
  pub receipt: Option<Receipt>,
  /// True when an earlier, interrupted checkout had already ordered the cart.
  pub resumed: bool,
}

impl CheckoutOutcome {
  pub fn tracking_id(&self) -> TrackingId {
    self.order.tracking_id
  }

  pub fn receipt_text(&self) -> &str {
    &self.order.receipt_text
  }
}

/// Turns the user's cart into an order shipped via `courier_info`.
///
/// A blank `courier_info` falls back to the user's saved shipping address.
/// Fails with `EmptyCart` when there is nothing to order; on any failure the
/// cart is left intact and no order is recorded.
#[instrument(name = "action::checkout", skip(state, courier_info), err(Display))]
pub async fn checkout(state: &AppState, user_id: i64, courier_info: &str) -> Result<CheckoutOutcome> {
  let courier_info = resolve_courier_info(state, user_id, courier_info).await?;
  let ctx_data = ContextData::new(CheckoutCtxData::new(state.clone(), user_id, courier_info));
  let tx = { ctx_data.read().tx.clone() };

  let run = state.workflows.run(ctx_data.clone()).await;
  tx.rollback().await;

  match run? {
    PipelineResult::Completed => {}
    PipelineResult::Stopped => {
      warn!("Checkout pipeline was stopped by a handler.");
      return Err(AppError::Internal("Checkout was halted.".to_string()));
    }
  }

  let (receipt, resumed_order) = {
    let guard = ctx_data.read();
    (guard.receipt.clone(), guard.resumed_order)
  };
  let tracking_id = receipt
    .as_ref()
    .map(|r| r.tracking_id)
    .or(resumed_order)
    .ok_or_else(|| AppError::Internal("Checkout finished without an order.".to_string()))?;

  let order = orders::find_order(&state.db_pool, tracking_id)
    .await?
    .ok_or_else(|| AppError::Internal(format!("Order {} missing after checkout.", tracking_id)))?;

  info!(%tracking_id, total = %order.total_cost, resumed = receipt.is_none(), "Checkout done.");
  Ok(CheckoutOutcome {
    order,
    resumed: receipt.is_none(),
    receipt,
  })
}

async fn resolve_courier_info(state: &AppState, user_id: i64, courier_info: &str) -> Result<String> {
  let given = courier_info.trim();
  if !given.is_empty() {
    return Ok(given.to_string());
  }
  let user = users::find_user(&state.db_pool, user_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User {} not found.", user_id)))?;
  Ok(user.shipping_address.unwrap_or_default())
}

pub async fn order_history(state: &AppState, user_id: i64) -> Result<Vec<Order>> {
  orders::orders_for_user(&state.db_pool, user_id).await
}

/// An order and its lines, visible only to the user who placed it.
pub async fn order_details(state: &AppState, user_id: i64, tracking_id: TrackingId) -> Result<(Order, Vec<OrderLine>)> {
  let order = orders::find_order(&state.db_pool, tracking_id)
    .await?
    .filter(|o| o.user_id == user_id)
    .ok_or_else(|| AppError::NotFound(format!("Order {} not found.", tracking_id)))?;
  let lines = orders::order_lines(&state.db_pool, tracking_id).await?;
  Ok((order, lines))
}
